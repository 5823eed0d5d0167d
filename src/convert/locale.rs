use chrono::NaiveDate;

/// Source date formats tried in order; the bank mixes two- and four-digit years.
const SOURCE_DATE_FORMATS: [&str; 2] = ["%d.%m.%y", "%d.%m.%Y"];
const OUTPUT_DATE_FORMAT: &str = "%d/%m/%y";

/// Parse a German-locale amount string ("1.234,56") into a signed value.
/// Periods are thousands separators, the comma is the decimal point.
/// Currency symbols and whitespace are ignored; anything else that breaks
/// the number grammar (interior minus, repeated minus, more than one comma)
/// makes the whole string unparseable.
pub fn parse_german_amount(text: &str) -> Option<f64> {
    let retained: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if retained.is_empty() {
        return None;
    }

    // A single minus sign, and only in front.
    if retained.matches('-').count() > 1 || retained.rfind('-').is_some_and(|i| i > 0) {
        return None;
    }

    // At most one decimal separator.
    if retained.matches(',').count() > 1 {
        return None;
    }

    let american = retained.replace('.', "").replace(',', ".");
    american.parse::<f64>().ok()
}

/// Reformat a dotted German date ("19.02.26" or "19.02.2026") as "19/02/26".
/// Anything that matches neither format is returned unchanged, so input that
/// is already in the output format passes through.
pub fn convert_date_format(text: &str) -> String {
    for format in SOURCE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text.trim(), format) {
            return date.format(OUTPUT_DATE_FORMAT).to_string();
        }
    }
    text.to_string()
}
