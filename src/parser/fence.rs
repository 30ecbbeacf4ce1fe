const FENCE: &str = "```";
const JSON_TAG: &str = "json";

/// Interior of the first triple-backtick fenced block, with a leading
/// `json` language tag dropped. Returns the input unchanged when there is
/// no fence. An unterminated fence yields everything after the opener.
pub fn strip_fence(text: &str) -> &str {
    let Some(open) = text.find(FENCE) else {
        return text;
    };

    let after_open = &text[open + FENCE.len()..];
    let interior = match after_open.find(FENCE) {
        Some(close) => &after_open[..close],
        None => after_open,
    };

    let interior = match interior.get(..JSON_TAG.len()) {
        Some(tag) if tag.eq_ignore_ascii_case(JSON_TAG) => &interior[JSON_TAG.len()..],
        _ => interior,
    };

    interior.trim()
}
