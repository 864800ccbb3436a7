//! HTML sanitization for article content.
//!
//! Article bodies are authored as HTML and rendered into public pages
//! verbatim, so they are cleaned once on every write (create and update).
//! Reads serve the stored content as-is.

/// Clean an HTML fragment for storage.
///
/// Scripts, styles, and event-handler attributes are removed; ordinary
/// formatting tags and safe links survive. Plain text passes through
/// unchanged.
#[must_use]
pub fn sanitize_html(input: &str) -> String {
    ammonia::clean(input)
}
