// src/utils/html.rs

/// Text a browser would show for `input` once markup is stripped.
///
/// Entities are left encoded, so the result is only fit for checks such as
/// emptiness; stored values keep the participant's original text.
pub fn visible_text(input: &str) -> String {
    ammonia::Builder::empty().clean(input).to_string()
}

pub fn has_visible_text(input: &str) -> bool {
    !visible_text(input).trim().is_empty()
}
