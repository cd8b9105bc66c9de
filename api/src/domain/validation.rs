//! Field validation rules
//!
//! Turns raw inputs into validated `New*` values. Every rule reports the field it
//! checked so callers can point at the offending value.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::entities::{CustomerInput, NewCustomer, NewProduct, ProductInput};
use crate::error::ValidationError;

pub const NAME_MAX_LEN: usize = 255;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MAX_LEN: usize = 17;

/// NUMERIC(10, 2): two fractional digits, eight integer digits
pub const AMOUNT_SCALE: u32 = 2;
pub const AMOUNT_MAX_DIGITS: u32 = 10;

pub const PHONE_FORMAT_MESSAGE: &str =
    "Phone number must be in format: '+999999999' or '123-456-7890'";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| {
        Regex::new(r"^(?:\+\d{9,15}|\d{3}-\d{3}-\d{4})$").expect("phone pattern is valid")
    })
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").expect("email pattern is valid")
    })
}

/// Validate a customer candidate
///
/// Surrounding whitespace is trimmed from every field and an empty phone is
/// treated as absent.
pub fn validate_customer(input: &CustomerInput) -> Result<NewCustomer, ValidationError> {
    let name = validate_name(&input.name)?;
    let email = validate_email(&input.email)?;
    let phone = match input.phone.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(phone) => Some(validate_phone(phone)?),
    };

    Ok(NewCustomer { name, email, phone })
}

/// Validate a product candidate, applying the default stock of 0
pub fn validate_product(input: &ProductInput) -> Result<NewProduct, ValidationError> {
    let name = validate_name(&input.name)?;

    if input.price <= Decimal::ZERO {
        return Err(ValidationError::new("price", "Price must be positive"));
    }
    validate_amount("price", input.price)?;

    let stock = input.stock.unwrap_or(0);
    if stock < 0 {
        return Err(ValidationError::new("stock", "Stock cannot be negative"));
    }

    Ok(NewProduct {
        name,
        price: input.price,
        stock,
    })
}

pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new("name", "This field cannot be blank"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::new(
            "name",
            format!("Ensure this value has at most {} characters", NAME_MAX_LEN),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::new("email", "This field cannot be blank"));
    }
    if email.len() > EMAIL_MAX_LEN || !email_regex().is_match(email) {
        return Err(ValidationError::new("email", "Enter a valid email address"));
    }
    Ok(email.to_string())
}

pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    if phone.len() > PHONE_MAX_LEN || !phone_regex().is_match(phone) {
        return Err(ValidationError::new("phone", PHONE_FORMAT_MESSAGE));
    }
    Ok(phone.to_string())
}

/// Check that a money value fits NUMERIC(10, 2)
pub fn validate_amount(field: &'static str, amount: Decimal) -> Result<(), ValidationError> {
    let normalized = amount.normalize();
    if normalized.scale() > AMOUNT_SCALE {
        return Err(ValidationError::new(
            field,
            format!("Ensure that there are no more than {} decimal places", AMOUNT_SCALE),
        ));
    }

    let max = Decimal::new(10_i64.pow(AMOUNT_MAX_DIGITS) - 1, AMOUNT_SCALE);
    if normalized.abs() > max {
        return Err(ValidationError::new(
            field,
            format!(
                "Ensure that there are no more than {} digits in total",
                AMOUNT_MAX_DIGITS
            ),
        ));
    }
    Ok(())
}
