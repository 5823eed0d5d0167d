use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;

use crate::convert::error::ConvertError;

// Column names as they appear in DKB export headers.
const COL_VALUE_DATE: &str = "Wertstellung";
const COL_PAYER: &str = "Zahlungspflichtige*r";
const COL_PAYEE: &str = "Zahlungsempfänger*in";
const COL_PURPOSE: &str = "Verwendungszweck";
const COL_AMOUNT: &str = "Betrag (EUR)";
const COL_DESCRIPTION: &str = "Beschreibung";
// Credit-card exports carry the memo in an unnamed trailing column.
const COL_UNNAMED_MEMO: &str = "";

// Both layouts put these two somewhere in their header row; any line missing
// them is still preamble.
const HEADER_MARKERS: [&str; 2] = ["Wertstellung", "Betrag"];

/// A raw data line, keyed by source column name. The empty string is a
/// valid key (the credit-card memo column is unnamed).
pub type SourceRow = HashMap<String, String>;

/// The two supported DKB export layouts.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    /// Girokonto export: separate payer/payee columns, 4 preamble lines.
    #[value(name = "giro", alias = "girokonto", alias = "checking")]
    Checking,
    /// VISA export: single description column, unnamed memo column,
    /// 6 preamble lines.
    #[value(name = "visa", alias = "credit-card")]
    CreditCard,
}

/// Raw field values picked out of a source row, before normalization.
pub struct MappedFields<'a> {
    pub date: &'a str,
    pub payee: &'a str,
    pub memo: &'a str,
}

impl AccountType {
    /// Number of bank-metadata lines before the real header row.
    pub fn header_offset(&self) -> usize {
        match self {
            AccountType::Checking => 4,
            AccountType::CreditCard => 6,
        }
    }

    /// Source columns that must be present for this layout.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            AccountType::Checking => &[COL_VALUE_DATE, COL_PAYER, COL_PAYEE, COL_PURPOSE, COL_AMOUNT],
            AccountType::CreditCard => &[COL_VALUE_DATE, COL_DESCRIPTION, COL_UNNAMED_MEMO, COL_AMOUNT],
        }
    }

    pub fn amount_column(&self) -> &'static str {
        COL_AMOUNT
    }

    /// Pick the date/payee/memo fields for one row. For checking accounts
    /// the counterparty column depends on the amount sign: the payer column
    /// holds the sender of incoming money, the payee column the recipient of
    /// outgoing money. The source keeps the two mutually exclusive, but if
    /// the sign-selected one is empty we take whichever is populated.
    pub fn map_fields<'a>(&self, row: &'a SourceRow, amount: f64) -> MappedFields<'a> {
        match self {
            AccountType::Checking => {
                let payer = field(row, COL_PAYER);
                let payee = field(row, COL_PAYEE);
                let (selected, other) = if amount > 0.0 {
                    (payer, payee)
                } else {
                    (payee, payer)
                };
                MappedFields {
                    date: field(row, COL_VALUE_DATE),
                    payee: if selected.trim().is_empty() { other } else { selected },
                    memo: field(row, COL_PURPOSE),
                }
            }
            AccountType::CreditCard => MappedFields {
                date: field(row, COL_VALUE_DATE),
                payee: field(row, COL_DESCRIPTION),
                memo: field(row, COL_UNNAMED_MEMO),
            },
        }
    }
}

fn field<'a>(row: &'a SourceRow, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

/// Classify a source file by its header row. Lines are streamed; the first
/// one carrying both header markers is parsed as a semicolon-delimited
/// header and matched against each layout's required columns.
pub fn detect_account_type(path: &Path) -> Result<AccountType, ConvertError> {
    let reader = BufReader::new(File::open(path)?);

    for line in reader.lines() {
        let line = line?;
        if !HEADER_MARKERS.iter().all(|marker| line.contains(marker)) {
            continue;
        }

        let columns = parse_header_line(&line)?;
        log::debug!("Detected header row with columns: {columns:?}");

        for account_type in [AccountType::Checking, AccountType::CreditCard] {
            if account_type
                .required_columns()
                .iter()
                .all(|col| columns.contains(*col))
            {
                return Ok(account_type);
            }
        }
        break; // header row found but it matches no known layout
    }

    Err(ConvertError::UndetectableAccountType)
}

fn parse_header_line(line: &str) -> Result<HashSet<String>, ConvertError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_reader(line.as_bytes());

    let mut columns = HashSet::new();
    if let Some(record) = rdr.records().next() {
        columns.extend(record?.iter().map(str::to_string));
    }
    Ok(columns)
}
