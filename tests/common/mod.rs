//! Utility helpers shared across integration tests.
#![allow(dead_code)]

/// Build a single-region document from a title and body.
macro_rules! slideme {
    ($title:expr, $body:expr $(,)?) => {
        format!("[slideme title=\"{}\"]{}[/slideme]", $title, $body)
    };
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Count blocks of type `name` in rendered output.
pub fn count_blocks(output: &str, name: &str) -> usize {
    count(output, &format!("<!-- /wp:{name} -->"))
}

/// Titles of the outer accordion blocks, in output order.
pub fn outer_titles(output: &str) -> Vec<String> {
    const PREFIX: &str = "<!-- wp:cu-block/description-custom {\"title\":\"";
    output
        .match_indices(PREFIX)
        .filter_map(|(idx, _)| {
            let rest = &output[idx + PREFIX.len()..];
            rest.find('"').map(|end| rest[..end].to_string())
        })
        .collect()
}
