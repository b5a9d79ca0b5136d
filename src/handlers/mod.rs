// src/handlers/mod.rs

pub mod invoices;
pub mod parties;
pub mod products;

use rust_decimal::Decimal;
use validator::ValidationError;

// Shared custom rule for money fields.
pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("The value must not be negative.".into());
        return Err(err);
    }
    Ok(())
}
