//! Views - pure functions from presentation state to HTML markup.
//!
//! `data-testid` attributes are part of the contract with the shell and its
//! tests; class names follow the stylesheet of the surrounding application.

/// Bills list, loading and error pages, receipt modal
pub mod bills;
/// Vertical navigation bar wrapping employee pages
pub mod layout;
/// Sign-in fallback page
pub mod login;
/// New bill form
pub mod new_bill;

/// Escapes text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
