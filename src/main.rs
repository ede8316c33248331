//! Geomentor CLI entry point.
//!
//! Provides `start`, `status`, and `evaluate` subcommands for running the
//! interactive mentor, reporting the resolved configuration, or grading a
//! single answer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::Write as _;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, info};

use geomentor::app::App;
use geomentor::config::{load_config, runtime_paths, Config, RuntimePaths};
use geomentor::credentials::{load_optional_credentials, resolve_api_key, Credentials};
use geomentor::dispatcher::{IgnoreReason, TurnOutcome};
use geomentor::evaluation::{self, EvaluationModule, EvaluationRequest};
use geomentor::providers::gemini::GeminiProvider;
use geomentor::session::{Mode, ModeChange, Profile, Role};
use geomentor::view;

/// Geomentor: HPSC geography interview mentor.
#[derive(Parser)]
#[command(name = "geomentor", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the interactive mentor session.
    Start,
    /// Print the resolved configuration and exit.
    Status,
    /// Grade one answer and print the score card.
    Evaluate {
        /// Grading framework: interview, teaching, or research.
        #[arg(long, default_value = "interview")]
        module: EvaluationModule,
        /// Syllabus topic.
        #[arg(long)]
        topic: String,
        /// The question that was answered.
        #[arg(long)]
        question: String,
        /// The answer to grade.
        #[arg(long)]
        answer: String,
        /// Profile used to pitch the feedback.
        #[arg(long, default_value = "General")]
        profile: Profile,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Start => handle_start().await,
        Command::Status => handle_status(),
        Command::Evaluate {
            module,
            topic,
            question,
            answer,
            profile,
        } => {
            handle_evaluate(EvaluationRequest {
                module,
                topic,
                question,
                answer,
                profile,
            })
            .await
        }
    }
}

/// Resolved paths, config, and `.env` credentials.
struct Runtime {
    paths: RuntimePaths,
    config: Config,
    credentials: Credentials,
}

fn load_runtime() -> anyhow::Result<Runtime> {
    let paths = runtime_paths()?;
    let mut config = load_config(&paths.config_file)
        .with_context(|| format!("failed to load {}", paths.config_file.display()))?;
    config.apply_overrides(|key| std::env::var(key).ok());
    let credentials = load_optional_credentials(&paths.env_file)
        .with_context(|| format!("failed to load {}", paths.env_file.display()))?;
    Ok(Runtime {
        paths,
        config,
        credentials,
    })
}

// ---------------------------------------------------------------------------
// start
// ---------------------------------------------------------------------------

/// Run the interactive mentor until `/quit` or end of input.
async fn handle_start() -> anyhow::Result<()> {
    let runtime = load_runtime()?;

    let logs_dir = runtime
        .config
        .logging
        .dir
        .clone()
        .unwrap_or_else(|| runtime.paths.logs_dir.clone());
    let _logging_guard = geomentor::logging::init_production(&logs_dir)?;

    let mut app = App::from_config(
        &runtime.config,
        &runtime.credentials,
        |key| std::env::var(key).ok(),
        &runtime.paths.env_file,
    )?;

    if let Some(missing) = app.configuration_error() {
        println!("{}", view::render_missing_configuration(missing));
        return Ok(());
    }

    info!(model = %runtime.config.backend.model, "geomentor started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if !app.session().is_signed_in() {
            println!("{}", view::render_login_banner());
            let Some(username) = prompt(&mut lines, "username: ").await? else {
                break;
            };
            let Some(password) = prompt(&mut lines, "password: ").await? else {
                break;
            };
            match app.login(username.trim(), password.trim()) {
                Ok(_) => println!(
                    "{}",
                    view::render_session(app.session(), app.evaluation_log())
                ),
                Err(e) => println!("Login failed: {e}"),
            }
            continue;
        }

        let Some(line) = prompt(&mut lines, "> ").await? else {
            break;
        };
        match ReplCommand::parse(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Help => println!("{}", REPL_HELP),
            ReplCommand::Logout => {
                app.logout();
                println!("Signed out.");
            }
            ReplCommand::Modes => {
                if let Some(identity) = app.session().identity() {
                    println!(
                        "{}",
                        view::render_mode_menu(identity.role, app.session().mode())
                    );
                }
            }
            ReplCommand::Mode(name) => handle_mode(&mut app, name)?,
            ReplCommand::Trend(name) => handle_trend(&app, name),
            ReplCommand::Eval(args) => handle_eval(&mut app, args).await,
            ReplCommand::Say(text) => handle_say(&mut app, text).await?,
        }
    }

    info!("geomentor stopped");
    Ok(())
}

const REPL_HELP: &str = "\
/modes                   list the modes you can use
/mode <name>             switch mode (clears the conversation)
/eval c | m | t | q | a  grade candidate c's answer (evaluation lab)
/trend [candidate]       recent evaluation scores (admins may name a candidate)
/logout                  sign out
/quit                    exit
anything else            talk to the mentor";

/// One parsed REPL line.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Quit,
    Help,
    Logout,
    Modes,
    Mode(&'a str),
    Trend(&'a str),
    Eval(&'a str),
    Say(&'a str),
}

impl<'a> ReplCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(h, r)| (h, r.trim()));
        match head {
            "/quit" | "/exit" => Self::Quit,
            "/help" => Self::Help,
            "/logout" => Self::Logout,
            "/modes" => Self::Modes,
            "/mode" => Self::Mode(rest),
            "/trend" => Self::Trend(rest),
            "/eval" => Self::Eval(rest),
            _ => Self::Say(line),
        }
    }
}

/// Print `label`, then read one line. `None` at end of input.
async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{label}");
    std::io::stdout().flush().context("failed to flush stdout")?;
    lines.next_line().await.context("failed to read stdin")
}

fn handle_mode(app: &mut App, name: &str) -> anyhow::Result<()> {
    let mode: Mode = match name.parse() {
        Ok(mode) => mode,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };
    match app.switch_mode(mode)? {
        ModeChange::Switched => println!(
            "{}",
            view::render_session(app.session(), app.evaluation_log())
        ),
        ModeChange::Unchanged => println!("Already in {mode}."),
        ModeChange::Rejected(e) => println!("{e}"),
        ModeChange::Busy => println!("Wait for the current reply first."),
    }
    Ok(())
}

async fn handle_say(app: &mut App, text: &str) -> anyhow::Result<()> {
    match app.submit_turn(text).await? {
        TurnOutcome::Replied | TurnOutcome::Failed(_) => {
            if let Some(reply) = app.session().history().last() {
                println!("Mentor: {}", reply.text);
            }
        }
        TurnOutcome::Ignored(IgnoreReason::NotConversational) => {
            println!("This mode has no chat. Use /modes to pick a conversational mode.");
        }
        TurnOutcome::Ignored(reason) => debug!(?reason, "input ignored"),
        TurnOutcome::Busy => println!("Wait for the current reply first."),
    }
    Ok(())
}

/// Scores of the signed-in student, or of `name` when an admin asks.
fn handle_trend(app: &App, name: &str) {
    let Some(identity) = app.session().identity() else {
        return;
    };
    let subject = match (identity.role, name) {
        (Role::Admin, name) if !name.is_empty() => name,
        _ => identity.username.as_str(),
    };
    let log = app.evaluation_log();
    println!("{}", view::render_trend(&log.trend(subject)));
    if let Some(average) = log.average(subject) {
        println!("Average: {average:.1}");
    }
}

/// Split `/eval` arguments into candidate, module, topic, question, answer.
fn split_eval_args(args: &str) -> Option<[&str; 5]> {
    let parts: Vec<&str> = args.splitn(5, '|').map(str::trim).collect();
    parts.try_into().ok()
}

async fn handle_eval(app: &mut App, args: &str) {
    let Some([candidate, module, topic, question, answer]) = split_eval_args(args) else {
        println!("{}", view::render_lab_help());
        return;
    };
    let module: EvaluationModule = match module.parse() {
        Ok(m) => m,
        Err(e) => {
            println!("{e}");
            return;
        }
    };
    let profile = app
        .session()
        .identity()
        .map_or(Profile::General, |i| i.profile);
    let request = EvaluationRequest {
        module,
        topic: topic.to_owned(),
        question: question.to_owned(),
        answer: answer.to_owned(),
        profile,
    };
    match app.evaluate(candidate, &request).await {
        Ok(result) => println!("{}", view::render_evaluation(module, &result)),
        Err(e) => println!("Evaluation failed: {e}"),
    }
}

// ---------------------------------------------------------------------------
// status / evaluate
// ---------------------------------------------------------------------------

/// Print the resolved configuration. The API key itself is never printed.
fn handle_status() -> anyhow::Result<()> {
    geomentor::logging::init_cli();
    let runtime = load_runtime()?;
    let backend = &runtime.config.backend;

    let key_state = match resolve_api_key(
        &backend.api_key_env,
        |key| std::env::var(key).ok(),
        &runtime.credentials,
        &runtime.paths.env_file,
    ) {
        Ok(_) => "present".to_owned(),
        Err(missing) => format!("missing ({missing})"),
    };
    let users = if runtime.config.users.is_empty() {
        "built-in".to_owned()
    } else {
        runtime.config.users.len().to_string()
    };

    println!("config file: {}", runtime.paths.config_file.display());
    println!("env file:    {}", runtime.paths.env_file.display());
    println!("model:       {}", backend.model);
    println!("base url:    {}", backend.base_url);
    println!("timeout:     {}s", backend.timeout_secs);
    println!("api key:     {} via {}", key_state, backend.api_key_env);
    println!("users:       {users}");
    Ok(())
}

/// Grade one answer outside of a session.
async fn handle_evaluate(request: EvaluationRequest) -> anyhow::Result<()> {
    geomentor::logging::init_cli();
    let runtime = load_runtime()?;
    let key = resolve_api_key(
        &runtime.config.backend.api_key_env,
        |key| std::env::var(key).ok(),
        &runtime.credentials,
        &runtime.paths.env_file,
    )?;
    let provider = GeminiProvider::new(&runtime.config.backend, key)
        .context("failed to build backend client")?;

    let result = evaluation::evaluate(&provider, &request)
        .await
        .context("evaluation failed")?;
    println!("{}", view::render_evaluation(request.module, &result));
    Ok(())
}
