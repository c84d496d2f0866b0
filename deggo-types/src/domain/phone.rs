//! Senegalese phone number handling.

/// Country calling code for Senegal.
pub const COUNTRY_CODE: &str = "221";

/// Mobile prefixes allocated to Senegalese operators.
pub const VALID_MOBILE_PREFIXES: [&str; 5] = ["70", "75", "76", "77", "78"];

/// Converts a phone number to its canonical 12-digit form.
///
/// Malformed input is returned as its digits only; rejecting it is left
/// to validation.
pub fn normalize_phone(phone_number: &str) -> String {
    let cleaned: String = phone_number.chars().filter(|c| c.is_ascii_digit()).collect();

    if cleaned.len() == 9 {
        return format!("{}{}", COUNTRY_CODE, cleaned);
    }

    cleaned
}

/// Returns true if the number normalizes to a Senegalese mobile number.
pub fn is_valid_local_phone(phone_number: &str) -> bool {
    let normalized = normalize_phone(phone_number);

    normalized.len() == 12
        && normalized.starts_with(COUNTRY_CODE)
        && VALID_MOBILE_PREFIXES.contains(&&normalized[3..5])
}
