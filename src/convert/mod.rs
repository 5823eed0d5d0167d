mod error;
mod layout;
mod locale;
mod paypal;
mod pipeline;
mod row;
mod text;

pub use error::ConvertError;
pub use layout::{AccountType, SourceRow, detect_account_type};
pub use locale::{convert_date_format, parse_german_amount};
pub use paypal::{extract_paypal_store, normalize_payee};
pub use pipeline::{ConvertOptions, ConvertSummary, convert};
pub use row::{OutputRow, build_row};
pub use text::normalize_text;
