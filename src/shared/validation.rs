use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Phone numbers as typed into the admin form
    /// - Valid: "+57 300 123 4567", "(601) 555-1234", "3001234567"
    /// - Invalid: "call me", "300-ABC", "+"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9()\-\s]*[0-9][0-9()\-\s]*$").unwrap();

    static ref NON_DIGIT_RE: Regex = Regex::new(r"\D").unwrap();
}

/// Keep only the digits of a phone number
pub fn digits_only(raw: &str) -> String {
    NON_DIGIT_RE.replace_all(raw, "").to_string()
}

/// `validator` custom rule: rejects values that are empty once trimmed
pub fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// `validator` custom rule: a non-blank URL
pub fn required_url(value: &str) -> Result<(), validator::ValidationError> {
    non_blank(value)?;
    optional_url(value)
}

/// `validator` custom rule: a non-blank phone number
pub fn required_phone(value: &str) -> Result<(), validator::ValidationError> {
    non_blank(value)?;
    optional_phone(value)
}

/// `validator` custom rule: empty strings pass, anything else must be a URL
pub fn optional_url(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() || reqwest::Url::parse(value.trim()).is_ok() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("url"))
    }
}

/// `validator` custom rule: empty strings pass, anything else must look like a phone number
pub fn optional_phone(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() || PHONE_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone"))
    }
}
