use regex::Regex;
use std::sync::LazyLock;

// Markdown fences and llama-style sentence tokens.
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:sql)?|</?s>").expect("noise pattern is valid"));

static QUERY_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bselect\b").expect("select pattern is valid"));

// A later line that opens like a sentence ("That's it.", "Вот запрос").
// Case-sensitive on purpose: "FROM" or "where" do not end the statement.
static PROSE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\p{Lu}\p{Ll}").expect("prose pattern is valid"));

/// Pulls a single `SELECT` statement out of free-form model output.
///
/// The result is one line ending in exactly one `;`, or an empty string when
/// the response contains no `SELECT` at all. The result is not trusted.
pub fn clean(raw: &str) -> String {
    let text = NOISE.replace_all(raw, "");
    let text = text.trim();

    let Some(start) = QUERY_START.find(text) else {
        return String::new();
    };

    let statement = &text[start.start()..];
    let statement = match PROSE_LINE.find(statement) {
        Some(prose) => &statement[..prose.start()],
        None => statement,
    };

    let collapsed = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    let body = collapsed.trim_end_matches(|c: char| c == ';' || c.is_whitespace());

    format!("{};", body)
}
