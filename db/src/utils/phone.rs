/// Normalizes a Ghanaian phone number to the international `233XXXXXXXXX`
/// form the payment and SMS gateways expect. Accepts local (`0XXXXXXXXX`),
/// prefixed (`+233...`) and already-international input, with spaces, dashes
/// and parentheses tolerated.
pub fn normalize_ghana_phone(phone: &str) -> Result<String, &'static str> {
    let mut cleaned: String = phone.chars().filter(|c| !matches!(c, ' ' | '-' | '(' | ')')).collect();
    if let Some(stripped) = cleaned.strip_prefix('+') {
        cleaned = stripped.to_string();
    }
    if cleaned.len() == 10 && cleaned.starts_with('0') {
        cleaned = format!("233{}", &cleaned[1..]);
    }
    if cleaned.len() == 12 && cleaned.starts_with("233") && cleaned.chars().all(|c| c.is_ascii_digit()) {
        Ok(cleaned)
    } else {
        Err("Enter a valid Ghana phone number, e.g. 0241234567 or 233241234567")
    }
}
