//! Reply instruction and length limits.

/// Hard limit on a usable reply, in characters.
pub const MAX_REPLY_CHARS: usize = 280;

/// Length the backend is asked to aim for.
pub const TARGET_REPLY_CHARS: usize = 260;

/// Total completion attempts before giving up on the length limit.
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

/// Builds the instruction sent to the generative backend.
///
/// `context` is extra information about the configured token, appended to
/// the persona text when present.
pub fn build_instruction(persona: &str, context: Option<&str>, tweet_text: &str) -> String {
    let persona = persona.trim().trim_end_matches('.');
    let persona = match context {
        Some(context) if !context.trim().is_empty() => format!("{}.\n{}", persona, context.trim()),
        _ => persona.to_string(),
    };
    format!(
        "{}. Respond to the following tweet in your unique style \
         and keep the response to a maximum of {} characters: '{}'",
        persona.trim_end_matches('.'),
        TARGET_REPLY_CHARS,
        tweet_text
    )
}

/// Removes one pair of `"` wrapping the whole completion.
///
/// A quote at only one end is part of the reply and stays.
pub fn strip_quote_layer(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_embeds_budget_and_tweet() {
        let instruction = build_instruction("You are a troll", None, "gm frens");
        assert_eq!(
            instruction,
            "You are a troll. Respond to the following tweet in your unique style \
             and keep the response to a maximum of 260 characters: 'gm frens'"
        );
    }

    #[test]
    fn instruction_appends_context() {
        let context = "The token you promote is called FISH.";
        let instruction = build_instruction("You are a shill.", Some(context), "gm");
        let expected = "You are a shill.\nThe token you promote is called FISH. Respond";
        assert!(instruction.starts_with(expected));
    }

    #[test]
    fn blank_context_is_ignored() {
        let with_blank = build_instruction("p", Some("  "), "t");
        assert_eq!(with_blank, build_instruction("p", None, "t"));
    }

    #[test]
    fn strips_exactly_one_layer() {
        assert_eq!(strip_quote_layer("\"hello\""), "hello");
        assert_eq!(strip_quote_layer("\"\"hello\"\""), "\"hello\"");
        assert_eq!(strip_quote_layer("hello"), "hello");
        assert_eq!(strip_quote_layer("\"\""), "");
    }

    #[test]
    fn unmatched_quotes_are_kept() {
        assert_eq!(strip_quote_layer("\"hello"), "\"hello");
        assert_eq!(strip_quote_layer("hello\""), "hello\"");
        assert_eq!(strip_quote_layer("\""), "\"");
        assert_eq!(
            strip_quote_layer("\"wen moon\" they said"),
            "\"wen moon\" they said"
        );
    }
}
