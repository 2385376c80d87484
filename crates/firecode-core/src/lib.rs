//! firecode-core: Fire Code inspection assistant core library.
//!
//! Shared types, static knowledge base, prompt composer, Gemini bridge,
//! sled-backed persistence store, conversation sessions, and the report
//! lifecycle controller. The gateway add-on exposes these over HTTP; the
//! library itself never opens a socket apart from outbound model calls.

mod config;
mod controller;
mod gemini;
mod knowledge;
mod prompt;
mod session;
mod shared;
mod store;

pub use config::{CoreConfig, DEFAULT_MODEL};
pub use controller::{
    AppState, AuthError, AuthState, Controller, GenerateError, GenerationPhase, View,
    CONNECTIVITY_MESSAGE, GUEST_EMAIL, GUEST_NAME, NO_RESPONSE_FALLBACK,
};
pub use gemini::{GeminiBridge, LlmClient, LlmError};
pub use knowledge::{DefectCategory, DEFECT_CATEGORIES, FIRE_CODE_CONTEXT};
pub use prompt::{
    chat_instruction, compose_violations, expert_instruction, ntc_payload, report_payload,
    PromptPayload, SessionInstruction, EXPERT_TEMPERATURE, REPORT_TEMPERATURE,
};
pub use session::{
    ChatSession, SessionKind, EMPTY_REPLY_FALLBACK, EXPERT_GREETING, REPORT_CHAT_GREETING,
};
pub use shared::{
    ChatMessage, EstablishmentType, Role, SavedReport, SearchParams, User, ValidationError,
};
pub use store::{
    AssistantStore, KvPort, MemoryKv, SledKv, DEMO_EMAIL, DEMO_NAME, DEMO_PASSWORD,
    REPORTS_KEY_PREFIX, SESSION_KEY, USERS_KEY,
};
