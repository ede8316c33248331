//! Geomentor: a mode-driven HPSC geography mentor.
//!
//! A user signs in, picks a preparation mode, and exchanges turns with a
//! generative model whose system instruction is shaped by the mode and the
//! user's profile. The crate owns the session/mode state machine and the
//! prompt pipeline; the terminal REPL in `main.rs` is a thin view over it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;

pub mod auth;
pub mod dispatcher;
pub mod prompts;
pub mod session;

pub mod app;
pub mod evaluation;
pub mod view;
