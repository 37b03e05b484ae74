//! Product field rules shared by the create/update pre-checks and the form.
//!
//! Lengths are counted in characters after trimming, so `"  a "` is one
//! character long.

use std::borrow::Cow;
use std::ops::RangeInclusive;

use validator::{ValidationError, ValidationErrors};

use crate::types::{NewProduct, ProductPatch};

pub const NAME_LENGTH: RangeInclusive<usize> = 2..=100;
pub const DESCRIPTION_LENGTH: RangeInclusive<usize> = 10..=500;

pub const NAME_MESSAGE: &str = "name must be between 2 and 100 characters";
pub const DESCRIPTION_MESSAGE: &str = "description must be between 10 and 500 characters";
pub const PRICE_MESSAGE: &str = "price must be a number greater than 0";
pub const STOCK_MESSAGE: &str = "stock must be a whole number, 0 or more";
pub const CATEGORY_MESSAGE: &str = "a category must be selected";

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if NAME_LENGTH.contains(&trimmed_len(name)) {
        Ok(())
    } else {
        Err(error("name_length", NAME_MESSAGE))
    }
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if DESCRIPTION_LENGTH.contains(&trimmed_len(description)) {
        Ok(())
    } else {
        Err(error("description_length", DESCRIPTION_MESSAGE))
    }
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

// `range` lets NaN through; these reject it.
pub fn validate_new_product_price(product: &NewProduct) -> Result<(), ValidationError> {
    if product.price.is_finite() {
        Ok(())
    } else {
        Err(error("price_not_finite", PRICE_MESSAGE))
    }
}

pub fn validate_patch_price(patch: &ProductPatch) -> Result<(), ValidationError> {
    match patch.price {
        Some(price) if !price.is_finite() => Err(error("price_not_finite", PRICE_MESSAGE)),
        _ => Ok(()),
    }
}

/// Names of the fields that failed, sorted, for log lines and messages.
pub fn failed_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    fields
}
