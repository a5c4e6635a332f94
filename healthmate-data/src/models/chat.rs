use serde::{Deserialize, Serialize};

/// Storage model for one chat exchange
///
/// The user text and the assistant text are stored together; neither side is
/// ever persisted on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for the exchange
    pub id: String,

    /// Opaque subject id of the owning user
    pub subject_id: String,

    /// What the user asked
    pub user_message: String,

    /// What the assistant replied
    pub ai_response: String,

    /// Topic tag inferred from the user message
    pub topic: Option<String>,

    /// When the exchange was stored (RFC 3339)
    pub created_at: String,
}

/// Payload for persisting a new chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub subject_id: String,
    pub user_message: String,
    pub ai_response: String,
    pub topic: Option<String>,
}

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The end user
    User,
    /// The generative model
    Model,
}

impl ChatRole {
    /// Wire token expected by the Gemini API
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One role-tagged turn of conversation history forwarded to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}
