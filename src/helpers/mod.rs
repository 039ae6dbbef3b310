//! Helper functions for page rendering
//!
//! Small string builders shared by the highlighter and the page renderer.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
