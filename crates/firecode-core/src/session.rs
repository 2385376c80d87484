//! Conversation sessions: one grounding context per session, with a locally
//! mirrored append-only transcript.
//!
//! `send` runs in two named phases: the user turn is staged into the
//! transcript first (optimistic, independent of network outcome), then the
//! model turn is resolved — reply on success, scripted apology on failure.
//! Transcript order is therefore stable even when calls fail: after N sends
//! the transcript holds exactly 1 seed greeting + 2N messages.

use crate::gemini::LlmClient;
use crate::prompt::{self, SessionInstruction};
use crate::shared::ChatMessage;
use std::sync::Arc;

/// Greeting seeded into a report-grounded chat. Local only; never sent upstream.
pub const REPORT_CHAT_GREETING: &str =
    "I can help clarify details about this report. What would you like to know?";

/// Greeting seeded into the expert assistant. Local only; never sent upstream.
pub const EXPERT_GREETING: &str = "# Welcome to Super FC AI Expert Mode\nI am your advanced assistant for RA 9514. You can ask me anything about the Fire Code of the Philippines, specific occupancy requirements, or technical safety standards.\n\nHow can I help your inspection today?";

/// Fallback model turn when a call succeeds but carries no text.
pub const EMPTY_REPLY_FALLBACK: &str = "I couldn't generate a response.";

/// Kind of dialog, which fixes the greeting and the apology wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Follow-up Q&A grounded on one generated report.
    ReportChat,
    /// General Fire Code expert Q&A.
    Expert,
}

impl SessionKind {
    fn greeting(&self) -> &'static str {
        match self {
            Self::ReportChat => REPORT_CHAT_GREETING,
            Self::Expert => EXPERT_GREETING,
        }
    }

    fn apology(&self) -> &'static str {
        match self {
            Self::ReportChat => "Sorry, I encountered an error connecting to the assistant.",
            Self::Expert => "Sorry, I encountered an error connecting to the expert assistant.",
        }
    }
}

/// One open dialog: a grounding instruction, the shared model client, and the
/// locally mirrored transcript. Changing grounding context means opening a new
/// session; transcripts never carry over.
pub struct ChatSession<C: LlmClient> {
    client: Arc<C>,
    kind: SessionKind,
    instruction: SessionInstruction,
    transcript: Vec<ChatMessage>,
}

impl<C: LlmClient> ChatSession<C> {
    /// Opens a follow-up chat grounded on a generated report.
    pub fn open_report_chat(client: Arc<C>, report_context: &str) -> Self {
        Self::open(client, SessionKind::ReportChat, prompt::chat_instruction(report_context))
    }

    /// Opens the general expert assistant.
    pub fn open_expert(client: Arc<C>) -> Self {
        Self::open(client, SessionKind::Expert, prompt::expert_instruction())
    }

    fn open(client: Arc<C>, kind: SessionKind, instruction: SessionInstruction) -> Self {
        Self {
            client,
            kind,
            instruction,
            transcript: vec![ChatMessage::model(kind.greeting())],
        }
    }

    /// Sends one user turn and returns the text appended as the model turn
    /// (reply, empty-reply fallback, or apology). Exactly two messages are
    /// appended per call, whatever the network outcome.
    pub async fn send(&mut self, text: &str) -> String {
        self.stage_user_turn(text);
        self.resolve_model_turn().await
    }

    /// Phase 1: record the user turn locally before any network call.
    fn stage_user_turn(&mut self, text: &str) {
        self.transcript.push(ChatMessage::user(text));
    }

    /// Phase 2: dispatch the history and append the terminal model turn. The
    /// synthetic seed greeting stays local and is never sent upstream.
    async fn resolve_model_turn(&mut self) -> String {
        let reply = match self
            .client
            .converse(
                &self.instruction.system_instruction,
                self.instruction.temperature,
                &self.transcript[1..],
            )
            .await
        {
            Ok(text) => text,
            Err(crate::gemini::LlmError::EmptyResponse) => EMPTY_REPLY_FALLBACK.to_string(),
            Err(e) => {
                tracing::warn!(kind = ?self.kind, error = %e, "chat send failed");
                self.kind.apology().to_string()
            }
        };
        self.transcript.push(ChatMessage::model(reply.clone()));
        reply
    }

    /// The locally mirrored transcript, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }
}
