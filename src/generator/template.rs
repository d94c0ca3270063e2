use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, Timelike};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::generator::{Generate, MessageContext, Tone};
use crate::web::models::Suggestion;

// Generates suggestions from pre-written pools only; no network calls.
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Generate for TemplateGenerator {
    async fn generate(&self, context: &MessageContext, tone: Tone) -> Result<Vec<Suggestion>> {
        let hour = Local::now().hour();
        let mut rng = rand::thread_rng();
        let contents = select_messages(context, tone, hour, &mut rng);

        Ok(contents
            .into_iter()
            .map(|content| Suggestion::new(content, tone))
            .collect())
    }

    fn model_tag(&self) -> &str {
        "local-template"
    }
}

// Pure selection: shuffle the tone pool and take 3, add 3 time-of-day
// messages, shuffle the 6 and keep 3. Deterministic for a fixed rng/hour.
fn select_messages<R: Rng>(
    context: &MessageContext,
    tone: Tone,
    hour: u32,
    rng: &mut R,
) -> Vec<String> {
    let mut pool = match tone {
        Tone::Casual => casual_pool(context),
        Tone::Polite => polite_pool(context),
    };
    pool.shuffle(rng);

    let mut picked: Vec<String> = pool.into_iter().take(3).collect();

    let greeting = greeting_for_hour(hour);
    let dynamic = if context.is_first_contact() {
        first_contact_messages(context, greeting)
    } else {
        followup_messages(context, greeting)
    };
    picked.extend(dynamic);

    picked.shuffle(rng);
    picked.truncate(3);
    picked
}

fn greeting_for_hour(hour: u32) -> &'static str {
    if hour < 12 {
        "おはよう"
    } else if hour < 18 {
        "こんにちは"
    } else {
        "こんばんは"
    }
}

fn casual_pool(context: &MessageContext) -> Vec<String> {
    vec![
        format!(
            "こんにちは、{}さん！{}歳の{}です😊 {}さんの趣味の「{}」って面白そうですね！",
            context.partner_name,
            context.user_age,
            context.first_person,
            context.partner_name,
            context.partner_interests
        ),
        format!(
            "お疲れさまです！今日はどんな一日でしたか？{}の趣味は{}なんです♪",
            context.first_person, context.user_interests
        ),
        format!(
            "こんばんは！{}さんとお話しできて嬉しいです✨ 何か楽しいことありましたか？",
            context.partner_name
        ),
        format!(
            "{}さんって{}歳なんですね！{}は{}歳です😊 気が合いそう！",
            context.partner_name, context.partner_age, context.first_person, context.user_age
        ),
        format!(
            "ねえねえ、{}って楽しいですか？{}も始めてみようかな♪",
            context.partner_interests, context.first_person
        ),
    ]
}

fn polite_pool(context: &MessageContext) -> Vec<String> {
    vec![
        format!(
            "こんにちは、{}さん。{}歳の{}と申します。{}さんのご趣味である「{}」について、お聞かせいただけますでしょうか。",
            context.partner_name,
            context.user_age,
            context.first_person,
            context.partner_name,
            context.partner_interests
        ),
        format!(
            "お疲れさまでございます。本日はいかがお過ごしでしたでしょうか。{}の趣味は{}でございます。",
            context.first_person, context.user_interests
        ),
        format!(
            "こんばんは、{}さん。お話しできて光栄です。何かご興味深いことはございましたでしょうか。",
            context.partner_name
        ),
        format!(
            "{}さんは{}歳でいらっしゃるのですね。{}は{}歳でございます。どうぞよろしくお願いいたします。",
            context.partner_name, context.partner_age, context.first_person, context.user_age
        ),
        format!(
            "{}とは素敵なご趣味ですね。ぜひ詳しくお伺いしたいです。",
            context.partner_interests
        ),
    ]
}

// Openers for a partner with no prior conversation.
fn first_contact_messages(context: &MessageContext, greeting: &str) -> Vec<String> {
    vec![
        format!(
            "{}、{}さん！はじめまして、{}です😊 よかったら少しお話ししませんか？",
            greeting, context.partner_name, context.first_person
        ),
        format!(
            "{}！プロフィール拝見しました。{}がお好きなんですね、{}も気になっていました！",
            greeting, context.partner_interests, context.first_person
        ),
        format!(
            "{}、{}さん！{}の趣味は{}です。共通の話題があったら嬉しいな♪",
            greeting, context.partner_name, context.first_person, context.user_interests
        ),
    ]
}

// Follow-ups once a conversation is already going.
fn followup_messages(context: &MessageContext, greeting: &str) -> Vec<String> {
    vec![
        format!(
            "{}！返信ありがとうございます😊 続きを聞かせてもらえたら嬉しいです！",
            greeting
        ),
        format!(
            "{}、{}さん！さっきの話、もう少し詳しく聞きたいです♪",
            greeting, context.partner_name
        ),
        format!(
            "{}！今日はどんな一日でしたか？{}は{}を楽しんでいました✨",
            greeting, context.first_person, context.user_interests
        ),
    ]
}
