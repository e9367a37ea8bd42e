use std::sync::LazyLock;

use regex::Regex;

pub const MAX_EMBED_CHARS: usize = 2000;
const PART_SEPARATOR: &str = ". ";

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup tag regex is valid"));

pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

pub fn strip_markup(input: &str) -> String {
    MARKUP_TAG.replace_all(input, "").into_owned()
}

pub fn prepare_text(title: Option<&str>, subtitle: Option<&str>, content: Option<&str>) -> String {
    prepare_text_with_limit(title, subtitle, content, MAX_EMBED_CHARS)
}

/// Builds the embedding payload for one document: title, subtitle and the
/// tag-stripped body joined with `". "`, cut to `max_chars` characters.
pub fn prepare_text_with_limit(
    title: Option<&str>,
    subtitle: Option<&str>,
    content: Option<&str>,
    max_chars: usize,
) -> String {
    let mut parts = Vec::<String>::new();

    if let Some(title) = title.filter(|value| !value.is_empty()) {
        parts.push(title.to_string());
    }

    if let Some(subtitle) = subtitle.filter(|value| !value.is_empty()) {
        parts.push(subtitle.to_string());
    }

    if let Some(content) = content.filter(|value| !value.is_empty()) {
        parts.push(normalize_whitespace(&strip_markup(content)));
    }

    truncate_chars(parts.join(PART_SEPARATOR), max_chars)
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_offset, _)) => text[..byte_offset].to_string(),
        None => text,
    }
}

/// Renders a vector in the `[v1,v2,...]` literal form accepted by the
/// `embedding` column.
pub fn format_embedding_vector(values: &[f64]) -> String {
    let body = values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>()
        .join(",");
    format!("[{body}]")
}
