use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::Trim;

use crate::convert::error::ConvertError;
use crate::convert::layout::{AccountType, SourceRow};
use crate::convert::locale::{convert_date_format, parse_german_amount};
use crate::convert::paypal::normalize_payee;
use crate::convert::row::build_row;
use crate::convert::text::normalize_text;

/// Appended to the source file stem to form the default output name.
const OUTPUT_SUFFIX: &str = "-ynab.csv";

/// Delimiters considered during sniffing; the bank is not consistent
/// between export variants.
const DELIMITER_CANDIDATES: [u8; 3] = [b';', b',', b'\t'];
const FALLBACK_DELIMITER: u8 = b';';
const SNIFF_BYTES: usize = 1024;

#[derive(Default)]
pub struct ConvertOptions {
    /// Explicit output path; defaults to the source name with the
    /// `-ynab.csv` suffix.
    pub output: Option<PathBuf>,
    /// When set, rows go to stdout (at most this many) and no file is
    /// written.
    pub preview_limit: Option<usize>,
}

/// Row accounting for one conversion run. `skipped` counts data lines
/// dropped for unparseable amounts or malformed records.
#[derive(Debug)]
pub struct ConvertSummary {
    pub output: Option<PathBuf>,
    pub written: usize,
    pub skipped: usize,
}

/// Convert one source export. All validation (readable file, required
/// columns) happens before the output file is created, so a failed run
/// leaves no partial output behind.
pub fn convert(
    path: &Path,
    account_type: AccountType,
    options: &ConvertOptions,
) -> Result<ConvertSummary, ConvertError> {
    if path.is_dir() {
        return Err(io::Error::other("Is a directory").into());
    }

    let delimiter = sniff_delimiter(path)?;
    log::debug!("Sniffed delimiter: {:?}", delimiter as char);

    let mut reader = BufReader::new(File::open(path)?);
    skip_preamble(&mut reader, account_type.header_offset())?;

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    validate_columns(&mut rdr, account_type)?;

    if let Some(limit) = options.preview_limit {
        let stdout = io::stdout();
        let mut wtr = csv::Writer::from_writer(stdout.lock());
        let (written, skipped) = process_rows(&mut rdr, &mut wtr, account_type, Some(limit))?;
        return Ok(ConvertSummary {
            output: None,
            written,
            skipped,
        });
    }

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(path));
    log::debug!("Writing output to {output:?}");

    let mut wtr = csv::Writer::from_path(&output)?;
    let (written, skipped) = process_rows(&mut rdr, &mut wtr, account_type, None)?;

    Ok(ConvertSummary {
        output: Some(output),
        written,
        skipped,
    })
}

/// Count candidate delimiters in the first 1KB and take the most frequent.
/// Falls back to the semicolon the bank uses in practice.
fn sniff_delimiter(path: &Path) -> Result<u8, ConvertError> {
    let mut sample = Vec::with_capacity(SNIFF_BYTES);
    File::open(path)?
        .take(SNIFF_BYTES as u64)
        .read_to_end(&mut sample)?;

    let best = DELIMITER_CANDIDATES
        .into_iter()
        .map(|delim| (sample.iter().filter(|&&b| b == delim).count(), delim))
        .max_by_key(|&(count, _)| count);

    match best {
        Some((count, delim)) if count > 0 => Ok(delim),
        _ => Ok(FALLBACK_DELIMITER),
    }
}

/// Drop the fixed-size bank-metadata preamble so the next line the CSV
/// reader sees is the header row.
fn skip_preamble<R: BufRead>(reader: &mut R, offset: usize) -> Result<(), ConvertError> {
    let mut discard = String::new();
    for _ in 0..offset {
        discard.clear();
        if reader.read_line(&mut discard)? == 0 {
            break; // file shorter than the preamble; caught by validation
        }
    }
    Ok(())
}

fn validate_columns<R: Read>(
    rdr: &mut csv::Reader<R>,
    account_type: AccountType,
) -> Result<(), ConvertError> {
    let headers = rdr.headers()?;
    log::debug!("Source header: {headers:?}");

    let missing: Vec<String> = account_type
        .required_columns()
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ConvertError::MissingColumns(missing));
    }
    Ok(())
}

fn process_rows<R: Read, W: io::Write>(
    rdr: &mut csv::Reader<R>,
    wtr: &mut csv::Writer<W>,
    account_type: AccountType,
    limit: Option<usize>,
) -> Result<(usize, usize), ConvertError> {
    let mut written = 0;
    let mut skipped = 0;

    for result in rdr.deserialize::<SourceRow>() {
        if limit.is_some_and(|max| written >= max) {
            break;
        }

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed record: {e}");
                skipped += 1;
                continue;
            }
        };

        let raw_amount = row
            .get(account_type.amount_column())
            .map(String::as_str)
            .unwrap_or("");
        let Some(amount) = parse_german_amount(raw_amount) else {
            log::warn!("Skipping row with unparseable amount: {raw_amount:?}");
            skipped += 1;
            continue;
        };

        let fields = account_type.map_fields(&row, amount);
        let memo = normalize_text(fields.memo);
        let payee = normalize_payee(&normalize_text(fields.payee), &memo);
        let date = convert_date_format(fields.date);

        wtr.serialize(build_row(date, payee, memo, amount))?;
        written += 1;
    }

    wtr.flush()?;
    Ok((written, skipped))
}

fn default_output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    source.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}
