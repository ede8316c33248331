//! Application facade: owns the [`Session`] and routes presentation events.
//!
//! The presentation layer calls exactly four session events (`login`,
//! `submit_turn`, `switch_mode`, `logout`) plus the admin-only evaluation
//! lab. Every event takes `&mut self`, so at most one turn is ever in
//! flight.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::{AuthError, CredentialRegistry};
use crate::config::Config;
use crate::credentials::{resolve_api_key, Credentials, MissingConfiguration};
use crate::dispatcher::{dispatch_turn, TurnOutcome};
use crate::evaluation::{self, EvaluationError, EvaluationLog, EvaluationRequest, EvaluationResult};
use crate::providers::gemini::GeminiProvider;
use crate::providers::GenerativeBackend;
use crate::session::{self, Identity, Mode, ModeChange, Role, Session};

/// An event the facade refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// No API key; every event is refused until the operator fixes it.
    #[error(transparent)]
    NotConfigured(#[from] MissingConfiguration),
    /// Login failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The event needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,
    /// The evaluation lab needs an admin in the lab mode.
    #[error("the evaluation lab is only available to admins in lab mode")]
    LabUnavailable,
    /// Grading failed.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Owner of the single session and its backend.
pub struct App {
    registry: CredentialRegistry,
    backend: Result<Arc<dyn GenerativeBackend>, MissingConfiguration>,
    session: Session,
    evaluations: EvaluationLog,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("registry", &self.registry)
            .field(
                "backend",
                &self.backend.as_ref().map(|b| b.model_id().to_owned()),
            )
            .field("session", &self.session)
            .field("evaluations", &self.evaluations.len())
            .finish()
    }
}

impl App {
    /// A configured app with a signed-out session.
    pub fn new(registry: CredentialRegistry, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            registry,
            backend: Ok(backend),
            session: Session::new(),
            evaluations: EvaluationLog::new(),
        }
    }

    /// An app stuck in the missing-configuration state.
    pub fn unconfigured(registry: CredentialRegistry, missing: MissingConfiguration) -> Self {
        Self {
            registry,
            backend: Err(missing),
            session: Session::new(),
            evaluations: EvaluationLog::new(),
        }
    }

    /// Build the app from loaded configuration.
    ///
    /// A missing API key is not an error here: the app comes up in the
    /// missing-configuration state instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        env: impl Fn(&str) -> Option<String>,
        env_file: &Path,
    ) -> anyhow::Result<Self> {
        let registry = CredentialRegistry::from_users(&config.users);
        match resolve_api_key(&config.backend.api_key_env, env, credentials, env_file) {
            Ok(key) => {
                let provider = GeminiProvider::new(&config.backend, key)
                    .map_err(|e| anyhow::anyhow!("failed to build backend client: {e}"))?;
                info!(model = %config.backend.model, users = registry.len(), "backend configured");
                Ok(Self::new(registry, Arc::new(provider)))
            }
            Err(missing) => {
                warn!(env_var = %missing.env_var, "backend API key missing");
                Ok(Self::unconfigured(registry, missing))
            }
        }
    }

    /// Current session state, for rendering.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The configuration problem blocking every event, if any.
    pub fn configuration_error(&self) -> Option<&MissingConfiguration> {
        self.backend.as_ref().err()
    }

    /// Recorded evaluation results.
    pub fn evaluation_log(&self) -> &EvaluationLog {
        &self.evaluations
    }

    fn backend(&self) -> Result<Arc<dyn GenerativeBackend>, AppError> {
        self.backend.clone().map_err(AppError::from)
    }

    /// Authenticate and start a fresh session in the role's initial mode.
    ///
    /// Signing in while already signed in discards the previous session.
    ///
    /// # Errors
    ///
    /// [`AppError::NotConfigured`] without a backend, [`AppError::Auth`] on
    /// bad credentials. The session is untouched in both cases.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&Identity, AppError> {
        self.backend()?;
        let identity = self.registry.authenticate(username, password)?;
        self.session.sign_in(identity);
        info!(mode = %self.session.mode(), "session started");
        self.session.identity().ok_or(AppError::NotSignedIn)
    }

    /// Send one chat message.
    ///
    /// # Errors
    ///
    /// [`AppError::NotConfigured`] without a backend. Backend failures are
    /// not errors here; they come back as [`TurnOutcome::Failed`].
    pub async fn submit_turn(&mut self, text: &str) -> Result<TurnOutcome, AppError> {
        let backend = self.backend()?;
        Ok(dispatch_turn(&mut self.session, backend.as_ref(), text).await)
    }

    /// Request a mode change.
    ///
    /// # Errors
    ///
    /// [`AppError::NotConfigured`] without a backend.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<ModeChange, AppError> {
        self.backend()?;
        Ok(session::switch_mode(&mut self.session, mode))
    }

    /// Sign out. Always succeeds, even without a backend.
    pub fn logout(&mut self) {
        if let Some(identity) = self.session.identity() {
            info!(username = %identity.username, "signed out");
        } else {
            debug!("logout without identity");
        }
        self.session.reset();
    }

    /// Grade one answer in the evaluation lab and record the result under
    /// `candidate`, the student whose answer it is. A blank `candidate`
    /// records under the signed-in admin.
    ///
    /// # Errors
    ///
    /// [`AppError::NotSignedIn`], [`AppError::LabUnavailable`] unless an
    /// admin is in [`Mode::EvaluationLab`], or the grading failure.
    pub async fn evaluate(
        &mut self,
        candidate: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, AppError> {
        let backend = self.backend()?;
        let identity = self.session.identity().ok_or(AppError::NotSignedIn)?;
        if identity.role != Role::Admin || self.session.mode() != Mode::EvaluationLab {
            debug!(role = %identity.role, mode = %self.session.mode(), "lab request refused");
            return Err(AppError::LabUnavailable);
        }
        let student = match candidate.trim() {
            "" => identity.username.clone(),
            name => name.to_owned(),
        };

        let result = evaluation::evaluate(backend.as_ref(), request).await?;
        self.evaluations
            .record(&student, request.module, &request.topic, result.clone());
        Ok(result)
    }
}
