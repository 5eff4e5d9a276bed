//! Client-side note filtering.
//!
//! Filtering is a read-only view: it never reorders or mutates the input.

use crate::models::Note;

/// Notes whose title or content contains `query`, ignoring case.
///
/// An empty or whitespace-only query matches every note. Order is preserved.
#[must_use]
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = normalize_query(query);
    notes.iter().filter(|note| note.matches(&needle)).collect()
}

fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
