mod llm;
mod prompt;
mod template;

pub use llm::LlmGenerator;
pub use template::TemplateGenerator;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::web::models::{GenerateRequest, Suggestion};

// Register of the generated Japanese text, resolved from the tone dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Casual,
    Polite,
}

impl Tone {
    // Dial values at or below 0.5 read as casual; an absent dial also
    // defaults to casual.
    pub fn from_dial(value: Option<f64>) -> Self {
        match value {
            Some(v) if v > 0.5 => Tone::Polite,
            _ => Tone::Casual,
        }
    }

    pub fn ja_label(&self) -> &'static str {
        match self {
            Tone::Casual => "カジュアル",
            Tone::Polite => "丁寧",
        }
    }
}

// Everything the generators need about the request, with all defaults
// already applied.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub user_age: u32,
    pub user_gender: String,
    pub user_interests: String,
    pub first_person: String,
    pub partner_name: String,
    pub partner_age: String,
    pub partner_interests: String,
    pub character_count: u32,
    pub message_type: String,
    pub history: Option<String>,
}

impl MessageContext {
    pub fn from_request(req: &GenerateRequest) -> Self {
        let user = req.user_profile.as_ref();
        let partner = req.partner_info.as_ref();

        let first_person = req
            .first_person
            .clone()
            .unwrap_or_else(|| "私".to_string());
        let partner_name = partner
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| "相手".to_string());

        // Flatten the history into "speaker: content" lines. An empty
        // message list means first contact, so no history at all.
        let messages = req.messages.as_deref().unwrap_or(&[]);
        let history = if messages.is_empty() {
            None
        } else {
            let lines: Vec<String> = messages
                .iter()
                .map(|m| {
                    let speaker = if m.sender == "user" {
                        &first_person
                    } else {
                        &partner_name
                    };
                    format!("{}: {}", speaker, m.content)
                })
                .collect();
            Some(lines.join("\n"))
        };

        Self {
            user_age: user.and_then(|u| u.age).unwrap_or(20),
            user_gender: user
                .and_then(|u| u.gender.as_ref())
                .and_then(|g| g.display_name.clone())
                .unwrap_or_else(|| "不明".to_string()),
            user_interests: join_interests(user.and_then(|u| u.interests.as_deref())),
            first_person,
            partner_name,
            partner_age: partner
                .and_then(|p| p.age)
                .map(|a| a.to_string())
                .unwrap_or_else(|| "不明".to_string()),
            partner_interests: join_interests(partner.and_then(|p| p.interests.as_deref())),
            character_count: req.character_count.unwrap_or(60),
            message_type: req
                .message_type
                .clone()
                .unwrap_or_else(|| "通常".to_string()),
            history,
        }
    }

    pub fn is_first_contact(&self) -> bool {
        self.history.is_none()
    }
}

fn join_interests(interests: Option<&[String]>) -> String {
    match interests {
        Some(list) if !list.is_empty() => list.join("、"),
        _ => "特になし".to_string(),
    }
}

// Capability shared by both generation modes. Every successful call
// returns exactly three suggestions in the resolved tone.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, context: &MessageContext, tone: Tone) -> Result<Vec<Suggestion>>;

    // Tag reported in the response "model" field.
    fn model_tag(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::{ChatTurn, PartnerInfo, UserProfile};

    #[test]
    fn dial_at_or_below_half_is_casual() {
        assert_eq!(Tone::from_dial(Some(0.0)), Tone::Casual);
        assert_eq!(Tone::from_dial(Some(0.5)), Tone::Casual);
        assert_eq!(Tone::from_dial(None), Tone::Casual);
    }

    #[test]
    fn dial_above_half_is_polite() {
        assert_eq!(Tone::from_dial(Some(0.51)), Tone::Polite);
        assert_eq!(Tone::from_dial(Some(1.0)), Tone::Polite);
    }

    #[test]
    fn empty_request_gets_all_defaults() {
        let ctx = MessageContext::from_request(&GenerateRequest::default());
        assert_eq!(ctx.user_age, 20);
        assert_eq!(ctx.user_gender, "不明");
        assert_eq!(ctx.user_interests, "特になし");
        assert_eq!(ctx.first_person, "私");
        assert_eq!(ctx.partner_name, "相手");
        assert_eq!(ctx.partner_age, "不明");
        assert_eq!(ctx.partner_interests, "特になし");
        assert_eq!(ctx.character_count, 60);
        assert!(ctx.is_first_contact());
    }

    #[test]
    fn empty_interest_list_reads_as_none() {
        let req = GenerateRequest {
            user_profile: Some(UserProfile {
                interests: Some(vec![]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let ctx = MessageContext::from_request(&req);
        assert_eq!(ctx.user_interests, "特になし");
    }

    #[test]
    fn interests_join_with_japanese_comma() {
        let req = GenerateRequest {
            user_profile: Some(UserProfile {
                interests: Some(vec!["映画".to_string(), "読書".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let ctx = MessageContext::from_request(&req);
        assert_eq!(ctx.user_interests, "映画、読書");
    }

    #[test]
    fn history_flattens_with_speaker_labels() {
        let req = GenerateRequest {
            first_person: Some("僕".to_string()),
            partner_info: Some(PartnerInfo {
                name: Some("花子".to_string()),
                ..Default::default()
            }),
            messages: Some(vec![
                ChatTurn {
                    sender: "user".to_string(),
                    content: "A".to_string(),
                },
                ChatTurn {
                    sender: "partner".to_string(),
                    content: "B".to_string(),
                },
            ]),
            ..Default::default()
        };
        let ctx = MessageContext::from_request(&req);
        assert_eq!(ctx.history.as_deref(), Some("僕: A\n花子: B"));
        assert!(!ctx.is_first_contact());
    }
}
