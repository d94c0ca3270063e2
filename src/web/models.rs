use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator::Tone;

// Request body for /api/generate-message. Every field is optional; the
// defaults are applied by MessageContext::from_request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateRequest {
    pub user_profile: Option<UserProfile>,
    pub partner_info: Option<PartnerInfo>,
    pub messages: Option<Vec<ChatTurn>>,
    pub tone_dial_value: Option<f64>,
    pub message_type: Option<String>,
    pub first_person: Option<String>,
    pub character_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Gender {
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PartnerInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub interests: Option<Vec<String>>,
}

// One entry of the conversation history, as sent by the client.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatTurn {
    pub sender: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub id: String,
    pub content: String,
    pub tone: Tone,
}

impl Suggestion {
    pub fn new(content: String, tone: Tone) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            tone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub suggestions: Vec<Suggestion>,
    pub model: String,
}

// Wire types for the upstream chat-completions API.
#[derive(Debug, Serialize)]
pub enum ChatRole {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "user")]
    User,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}
