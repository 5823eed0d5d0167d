use serde::{Deserialize, Serialize};

/// One transaction in the output schema expected by YNAB4.
/// Category is reserved for the budgeting tool and always left empty.
/// At most one of Outflow/Inflow is non-empty; both are empty for a zero
/// amount.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Payee")]
    pub payee: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Memo")]
    pub memo: String,
    #[serde(rename = "Outflow")]
    pub outflow: String,
    #[serde(rename = "Inflow")]
    pub inflow: String,
}

/// Split a signed amount into the Outflow/Inflow pair. Negative means money
/// leaving the account. Amounts are rendered with exactly two decimals.
pub fn build_row(date: String, payee: String, memo: String, amount: f64) -> OutputRow {
    let (outflow, inflow) = if amount > 0.0 {
        (String::new(), format!("{:.2}", amount))
    } else if amount < 0.0 {
        (format!("{:.2}", -amount), String::new())
    } else {
        (String::new(), String::new())
    };

    OutputRow {
        date,
        payee,
        category: String::new(),
        memo,
        outflow,
        inflow,
    }
}
