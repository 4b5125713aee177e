// Route handlers, one module per endpoint group.

pub mod analyze;
pub mod feedback;
pub mod pages;
pub mod stats;
pub mod upload;

/// Characters of a text snippet kept in its subject marker.
const TEXT_SUBJECT_CHARS: usize = 30;

/// Subject marker for a text snippet: `text:<first 30 chars>...`.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-char.
/// The trailing "..." is always present, matching what the dashboard shows.
pub fn text_subject(text: &str) -> String {
    let snippet: String = text.chars().take(TEXT_SUBJECT_CHARS).collect();
    format!("text:{snippet}...")
}
