//! Integration test: conversation session transcript semantics.
//!
//! The transcript is append-only and grows by exactly two entries per send —
//! one user turn staged before the network call, one terminal model turn
//! (reply, empty-reply fallback, or apology) — so after N sends it holds
//! 1 seed greeting + 2N messages regardless of individual failures.

use firecode_core::{
    ChatMessage, ChatSession, LlmClient, LlmError, PromptPayload, Role, EMPTY_REPLY_FALLBACK,
    EXPERT_GREETING, REPORT_CHAT_GREETING,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted client: pops one pre-seeded outcome per call and records the
/// history it was handed.
struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    seen_histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            seen_histories: Mutex::new(Vec::new()),
        })
    }

    fn next(&self, history: &[ChatMessage]) -> Result<String, LlmError> {
        self.seen_histories.lock().unwrap().push(history.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::Service("script exhausted".to_string())))
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, _payload: &PromptPayload) -> Result<String, LlmError> {
        self.next(&[])
    }

    async fn converse(
        &self,
        _system_instruction: &str,
        _temperature: Option<f32>,
        history: &[ChatMessage],
    ) -> Result<String, LlmError> {
        self.next(history)
    }
}

#[tokio::test]
async fn report_chat_seeds_greeting_before_any_call() {
    let client = ScriptedClient::new(vec![]);
    let session = ChatSession::open_report_chat(client.clone(), "# Report body");
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(session.transcript()[0].role, Role::Model);
    assert_eq!(session.transcript()[0].text, REPORT_CHAT_GREETING);
    assert!(client.seen_histories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn successful_sends_grow_transcript_by_two() {
    let client = ScriptedClient::new(vec![
        Ok("Exit widths are in Section 10.2.5.2.".to_string()),
        Ok("Yes, sprinklers are required here.".to_string()),
    ]);
    let mut session = ChatSession::open_report_chat(client, "# Report");

    let first = session.send("What about exit widths?").await;
    assert_eq!(first, "Exit widths are in Section 10.2.5.2.");
    let second = session.send("Are sprinklers required?").await;
    assert_eq!(second, "Yes, sprinklers are required here.");

    // 1 seed + 2 sends * 2 messages.
    assert_eq!(session.transcript().len(), 5);
    assert_eq!(session.transcript()[1].text, "What about exit widths?");
    assert_eq!(session.transcript()[1].role, Role::User);
}

#[tokio::test]
async fn failed_send_appends_user_turn_and_apology() {
    let client = ScriptedClient::new(vec![
        Err(LlmError::Service("connection reset".to_string())),
        Ok("Recovered answer.".to_string()),
    ]);
    let mut session = ChatSession::open_report_chat(client, "# Report");

    let reply = session.send("first question").await;
    assert_eq!(reply, "Sorry, I encountered an error connecting to the assistant.");

    // The user turn was staged optimistically despite the failure.
    assert_eq!(session.transcript()[1].text, "first question");
    assert_eq!(session.transcript().len(), 3);

    // A later send still works and keeps the 1 + 2N shape.
    session.send("second question").await;
    assert_eq!(session.transcript().len(), 5);
}

#[tokio::test]
async fn expert_session_has_its_own_greeting_and_apology() {
    let client = ScriptedClient::new(vec![Err(LlmError::Api {
        status: 500,
        body: "internal".to_string(),
    })]);
    let mut session = ChatSession::open_expert(client);
    assert_eq!(session.transcript()[0].text, EXPERT_GREETING);

    let reply = session.send("What is Rule 13?").await;
    assert_eq!(reply, "Sorry, I encountered an error connecting to the expert assistant.");
}

#[tokio::test]
async fn empty_model_reply_falls_back_to_scripted_text() {
    let client = ScriptedClient::new(vec![Err(LlmError::EmptyResponse)]);
    let mut session = ChatSession::open_expert(client);
    let reply = session.send("hello").await;
    assert_eq!(reply, EMPTY_REPLY_FALLBACK);
    assert_eq!(session.transcript().len(), 3);
}

#[tokio::test]
async fn seed_greeting_is_never_sent_upstream() {
    let client = ScriptedClient::new(vec![Ok("answer".to_string()), Ok("again".to_string())]);
    let mut session = ChatSession::open_report_chat(client.clone(), "# Report");
    session.send("q1").await;
    session.send("q2").await;

    let histories = client.seen_histories.lock().unwrap();
    // First call sees only the staged user turn; the greeting stays local.
    assert_eq!(histories[0].len(), 1);
    assert_eq!(histories[0][0].role, Role::User);
    // Second call sees user, model, user.
    assert_eq!(histories[1].len(), 3);
    assert!(histories[1].iter().all(|m| m.text != REPORT_CHAT_GREETING));
}
