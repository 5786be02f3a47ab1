//! Serializers from a token tree back to text.
//!
//! - **`html`**: markup for display, through each tag's HTML formatter
//! - **`bbcode`**: canonical BBCode, for storage and round-tripping
//! - **`escape`**: entity escaping, URL scheme filtering and template
//!   substitution shared by the HTML side and tag callbacks

pub mod bbcode;
pub mod escape;
pub mod html;
