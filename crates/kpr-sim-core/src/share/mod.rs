//! Presentation helpers: Indonesian number and date formatting, and the
//! plain-text summary a salesperson pastes into a chat.

pub mod format;
pub mod text;

pub use format::{format_date, format_percent, format_rate, format_rupiah, parse_number};
pub use text::share_text;
