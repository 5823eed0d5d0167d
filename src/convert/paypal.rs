use std::sync::OnceLock;

use regex::Regex;

/// Payees starting with this prefix are PayPal pass-throughs; the actual
/// merchant only appears in the memo text.
const PAYPAL_PREFIX: &str = "PayPal";

/// DKB memo convention for PayPal purchases: "Ihr Einkauf bei <store>",
/// terminated by a comma or the end of the memo.
fn store_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Ihr Einkauf bei ([^,]+)").unwrap())
}

/// Extract the store name from a PayPal memo, or "" if the marker phrase
/// is absent.
pub fn extract_paypal_store(memo: &str) -> String {
    store_pattern()
        .captures(memo)
        .and_then(|caps| caps.get(1))
        .map(|store| store.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Replace a PayPal pass-through payee with the merchant named in the memo.
/// Non-PayPal payees, and PayPal rows whose memo names no store, are
/// returned unchanged.
pub fn normalize_payee(payee: &str, memo: &str) -> String {
    if payee.trim().starts_with(PAYPAL_PREFIX) {
        let store = extract_paypal_store(memo);
        if !store.is_empty() {
            return store;
        }
    }
    payee.to_string()
}
