use crate::generator::{MessageContext, Tone};

// Fixed user turn sent after the system prompt.
pub const NUMBERED_REQUEST: &str = "3つの異なるメッセージパターンを番号付きで生成してください。";

// System prompt for the chat-completions call. Asks for three numbered
// Japanese messages matching the profile, tone and length constraints.
pub fn build_system_prompt(context: &MessageContext, tone: Tone) -> String {
    let closing = match &context.history {
        Some(history) => format!(
            "会話履歴:\n{}\n\n上記の会話に対する返信を生成してください。",
            history
        ),
        None => "会話を開始するメッセージを生成してください。".to_string(),
    };

    format!(
        "あなたは日本語の会話アシスタントです。以下の設定で自然な返信や話しかけを3つ生成してください。\n\n\
         ユーザー情報:\n\
         - 年齢: {user_age}歳\n\
         - 性別: {user_gender}\n\
         - 興味: {user_interests}\n\
         - 一人称: {first_person}\n\n\
         相手の情報:\n\
         - 名前: {partner_name}\n\
         - 年齢: {partner_age}歳\n\
         - 興味: {partner_interests}\n\n\
         要求:\n\
         - {character_count}文字以内で簡潔に\n\
         - {tone_label}なトーンで\n\
         - 自然で親しみやすい日本語\n\
         - メッセージタイプ: {message_type}\n\
         - 毎回異なる内容で、創造的で魅力的なメッセージを生成\n\
         - 相手の興味や年齢を考慮した話題を含める\n\n\
         {closing}\n\n\
         {numbered}",
        user_age = context.user_age,
        user_gender = context.user_gender,
        user_interests = context.user_interests,
        first_person = context.first_person,
        partner_name = context.partner_name,
        partner_age = context.partner_age,
        partner_interests = context.partner_interests,
        character_count = context.character_count,
        tone_label = tone.ja_label(),
        message_type = context.message_type,
        closing = closing,
        numbered = NUMBERED_REQUEST,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::GenerateRequest;

    #[test]
    fn prompt_without_history_asks_for_an_opener() {
        let ctx = MessageContext::from_request(&GenerateRequest::default());
        let prompt = build_system_prompt(&ctx, Tone::Casual);
        assert!(prompt.contains("会話を開始するメッセージを生成してください。"));
        assert!(prompt.contains("カジュアルなトーンで"));
        assert!(prompt.contains("60文字以内"));
    }

    #[test]
    fn prompt_with_history_asks_for_a_reply() {
        let mut ctx = MessageContext::from_request(&GenerateRequest::default());
        ctx.history = Some("私: こんにちは\n相手: どうも".to_string());
        let prompt = build_system_prompt(&ctx, Tone::Polite);
        assert!(prompt.contains("会話履歴:\n私: こんにちは\n相手: どうも"));
        assert!(prompt.contains("上記の会話に対する返信を生成してください。"));
        assert!(prompt.contains("丁寧なトーンで"));
    }
}
