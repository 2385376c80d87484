//! Report lifecycle and view controller: an explicit application-state object
//! with reducer-style transitions instead of ambient mutable flags.
//!
//! Generation is split at the network boundary: `begin_generate` validates and
//! moves the pipeline to `Loading`, returning the inert payload for the caller
//! to dispatch; `finish_generate` folds the outcome back in, persisting a
//! report snapshot on success. The controller itself never touches the
//! network.

use crate::gemini::LlmError;
use crate::prompt::{self, PromptPayload};
use crate::shared::{SavedReport, SearchParams, User, ValidationError};
use crate::store::{AssistantStore, KvPort};

/// Guest identity used when no one is logged in (second app variant).
pub const GUEST_EMAIL: &str = "local-user";
pub const GUEST_NAME: &str = "Inspector";

/// Fallback report body when the model call succeeds but carries no text.
pub const NO_RESPONSE_FALLBACK: &str = "No response generated.";

/// Generic connectivity message when a service failure has no better wording.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to generate report. Please check your connection and API key.";

/// Top-level view the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Search form plus (when loaded) the result, chat, and NTC generator.
    Main,
    /// Saved-report history list.
    History,
}

/// Generation pipeline sub-state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPhase {
    Idle,
    Loading,
    /// Result markdown on display.
    Loaded(String),
    /// User-visible failure message.
    Failed(String),
}

/// Session/auth gate state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn(User),
}

/// Auth failures surfaced inline by the forms. No side effects were performed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Email already registered.")]
    AlreadyRegistered,
}

/// Why a generation request was refused locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("A report is already being generated.")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Snapshot of the whole application state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub view: View,
    pub auth: AuthState,
    pub params: SearchParams,
    pub generation: GenerationPhase,
}

/// Orchestrates generate -> display -> save -> revisit over the store, and
/// switches between the main and history views.
pub struct Controller<K: KvPort> {
    store: AssistantStore<K>,
    state: AppState,
}

impl<K: KvPort> Controller<K> {
    /// Initial auth state is resolved from the store's session marker: if a
    /// current user is present, start logged in.
    pub fn new(store: AssistantStore<K>) -> Self {
        let auth = match store.current_user() {
            Some(user) => AuthState::LoggedIn(user),
            None => AuthState::LoggedOut,
        };
        Self {
            store,
            state: AppState {
                view: View::Main,
                auth,
                params: SearchParams::default(),
                generation: GenerationPhase::Idle,
            },
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &AssistantStore<K> {
        &self.store
    }

    /// Email the current identity's reports are filed under.
    pub fn active_email(&self) -> &str {
        match &self.state.auth {
            AuthState::LoggedIn(user) => &user.email,
            AuthState::LoggedOut => GUEST_EMAIL,
        }
    }

    // -- Session/auth gate ----------------------------------------------------

    /// Non-empty fields, then exact-match lookup. The failure message never
    /// reveals which field was wrong.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        match self.store.login(email.trim(), password) {
            Some(user) => {
                self.state.auth = AuthState::LoggedIn(user.clone());
                Ok(user)
            }
            None => Err(AuthError::InvalidCredentials),
        }
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if self.store.register(&User::new(email.trim(), name.trim(), password)) {
            Ok(())
        } else {
            Err(AuthError::AlreadyRegistered)
        }
    }

    pub fn logout(&mut self) {
        self.store.logout();
        self.state.auth = AuthState::LoggedOut;
    }

    /// Recovery flow: produces the scripted confirmation only. No mutation is
    /// performed and no mail is sent.
    pub fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::MissingFields);
        }
        Ok(format!(
            "If an account exists for {}, a reset link has been sent.",
            email.trim()
        ))
    }

    // -- Report lifecycle -----------------------------------------------------

    pub fn set_params(&mut self, params: SearchParams) {
        self.state.params = params;
    }

    /// `Idle|Loaded|Failed -> Loading`: clears any prior result or error and
    /// returns the payload for the caller to dispatch. Refused while a
    /// generation is already in flight, and on incomplete params (no side
    /// effects in either case).
    pub fn begin_generate(&mut self) -> Result<PromptPayload, GenerateError> {
        if self.state.generation == GenerationPhase::Loading {
            return Err(GenerateError::InFlight);
        }
        self.state.params.validate()?;
        self.state.generation = GenerationPhase::Loading;
        Ok(prompt::report_payload(&self.state.params))
    }

    /// `Loading -> Loaded|Failed`. On success the result is stored, a snapshot
    /// (value copy of the live params) is persisted under the active identity,
    /// and the new report is returned. On failure the error message is
    /// surfaced verbatim — every [`LlmError`] is user-recognizable — except
    /// that an empty model response degrades to a placeholder result, matching
    /// the display path.
    pub fn finish_generate(&mut self, outcome: Result<String, LlmError>) -> Option<SavedReport> {
        match outcome {
            Ok(markdown) => Some(self.load_result(markdown)),
            Err(LlmError::EmptyResponse) => Some(self.load_result(NO_RESPONSE_FALLBACK.to_string())),
            Err(e) => {
                let message = if e.is_config() {
                    e.to_string()
                } else {
                    tracing::warn!(error = %e, "report generation failed");
                    CONNECTIVITY_MESSAGE.to_string()
                };
                self.state.generation = GenerationPhase::Failed(message);
                None
            }
        }
    }

    fn load_result(&mut self, markdown: String) -> SavedReport {
        let report = SavedReport::snapshot(&self.state.params, markdown.clone());
        self.store.save_report(self.active_email(), &report);
        self.state.generation = GenerationPhase::Loaded(markdown);
        report
    }

    // -- Views and history ----------------------------------------------------

    pub fn open_history(&mut self) {
        self.state.view = View::History;
    }

    /// Pure read of the active identity's saved reports, newest first.
    pub fn history(&self) -> Vec<SavedReport> {
        self.store.reports(self.active_email())
    }

    /// Replays a stored entry: its params and result become the live state and
    /// the view returns to the main screen.
    pub fn select_history(&mut self, report: &SavedReport) {
        self.state.params = report.params.clone();
        self.state.generation = GenerationPhase::Loaded(report.result.clone());
        self.state.view = View::Main;
    }

    /// Home action: resets params and result unconditionally, discarding any
    /// unsaved in-progress state.
    pub fn go_home(&mut self) {
        self.state.view = View::Main;
        self.state.params = SearchParams::default();
        self.state.generation = GenerationPhase::Idle;
    }

    // -- NTC generator ----------------------------------------------------------

    /// Composes the defect-to-citation request from the checklist selection
    /// plus free-text observations. Rejected locally when both are empty.
    pub fn begin_ntc(
        &self,
        selected: &[String],
        other_observations: &str,
    ) -> Result<PromptPayload, ValidationError> {
        let violations = prompt::compose_violations(selected, other_observations);
        prompt::ntc_payload(&self.state.params, &violations)
    }
}
