//! Input checks applied before a record reaches the store.

use subtrack_domain::SubscriptionRecord;

use crate::CoreError;

/// Rejects empty names and negative or non-finite prices.
pub fn validate_record(record: &SubscriptionRecord) -> Result<(), CoreError> {
    if record.name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    validate_price(record.price)
}

pub fn validate_price(price: f64) -> Result<(), CoreError> {
    if !price.is_finite() {
        return Err(CoreError::Validation(format!(
            "price `{price}` is not a number"
        )));
    }
    if price < 0.0 {
        return Err(CoreError::Validation(format!(
            "price `{price}` must not be negative"
        )));
    }
    Ok(())
}

/// Parses a user-entered price such as `15.99`, ` 9.5 ` or `$52.99`.
pub fn parse_price(input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let price: f64 = digits
        .parse()
        .map_err(|_| CoreError::Validation(format!("`{}` is not a valid price", input.trim())))?;
    validate_price(price)?;
    Ok(price)
}
