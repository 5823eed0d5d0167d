pub mod convert;

pub use convert::{AccountType, ConvertError, ConvertOptions, ConvertSummary, OutputRow};
