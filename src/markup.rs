use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy so two fenced spans on one line stay separate.
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```([\s\S]*?)```").expect("code fence pattern is valid"));

/// Escape the three characters that could open markup.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Turn a reply into HTML: escape, then fenced code blocks, then line breaks.
///
/// Escaping runs first so the tags inserted by the later steps survive.
pub fn format_reply(text: &str) -> String {
    let escaped = escape_html(text);
    let fenced = CODE_FENCE.replace_all(&escaped, "<pre><code>${1}</code></pre>");
    fenced.replace('\n', "<br>")
}

/// Render one transcript entry as a message node.
pub fn render_message(text: &str, is_user: bool) -> String {
    if is_user {
        format!(r#"<div class="message user-message">{}</div>"#, escape_html(text))
    } else {
        format!(r#"<div class="message bot-message">{}</div>"#, format_reply(text))
    }
}
