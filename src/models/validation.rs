//! Field validators shared by JSON payloads and page forms.

use rust_decimal::Decimal;

use crate::error::FieldErrors;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_INTEGER: &str = "Enter a whole number.";
pub const INVALID_NUMBER: &str = "Enter a number.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";
pub const RATING_RANGE: &str = "Rating must be between 1 and 5.";

/// Digits allowed before the decimal point of a `NUMERIC(12, 2)` column.
const MAX_WHOLE_DIGITS: u32 = 10;
const MAX_DECIMAL_PLACES: u32 = 2;

/// Trim a required text value, recording an error when empty or too long.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_len,
                value.chars().count()
            ),
        );
    }
    value.to_string()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// Non-negative amount that fits `NUMERIC(12, 2)`.
pub fn check_amount(errors: &mut FieldErrors, field: &str, value: Decimal) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add(field, "Ensure this value is greater than or equal to 0.");
        return;
    }
    let normalized = value.normalize();
    if normalized.scale() > MAX_DECIMAL_PLACES {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} decimal places.",
                MAX_DECIMAL_PLACES
            ),
        );
    }
    if normalized.trunc() >= Decimal::from(10_i64.pow(MAX_WHOLE_DIGITS)) {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                MAX_WHOLE_DIGITS
            ),
        );
    }
}

/// Rating bounds enforced before anything reaches storage.
pub fn check_rating(errors: &mut FieldErrors, rating: i32) {
    if !(1..=5).contains(&rating) {
        errors.add("rating", RATING_RANGE);
    }
}

/// Parse a required integer form field.
pub fn parse_int(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, INVALID_INTEGER);
            None
        }
    }
}

/// Parse an optional foreign-key form field; empty means unset.
pub fn parse_optional_id(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, INVALID_CHOICE);
            None
        }
    }
}

/// Parse a required decimal form field.
pub fn parse_decimal(errors: &mut FieldErrors, field: &str, raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match raw.parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, INVALID_NUMBER);
            None
        }
    }
}
