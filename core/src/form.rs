//! The product edit form: raw text per field, per-field checks, and the
//! conversion into a typed payload.

use std::collections::BTreeMap;

use crate::types::{NewProduct, Product, ProductField};
use crate::validation::{
    is_valid_price, validate_description, validate_name, CATEGORY_MESSAGE, DESCRIPTION_MESSAGE,
    NAME_MESSAGE, PRICE_MESSAGE, STOCK_MESSAGE,
};

pub type FieldErrors = BTreeMap<ProductField, &'static str>;

/// Text currently held by each form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    pub category: String,
}

impl ProductForm {
    /// Form prefilled for editing an existing product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
        }
    }

    pub fn value(&self, field: ProductField) -> &str {
        match field {
            ProductField::Name => &self.name,
            ProductField::Description => &self.description,
            ProductField::Price => &self.price,
            ProductField::Stock => &self.stock,
            ProductField::Category => &self.category,
        }
    }

    pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Name => self.name = value,
            ProductField::Description => self.description = value,
            ProductField::Price => self.price = value,
            ProductField::Stock => self.stock = value,
            ProductField::Category => self.category = value,
        }
    }

    /// Checks one field, returning the inline message to show on failure.
    pub fn validate_field(&self, field: ProductField) -> Result<(), &'static str> {
        let value = self.value(field).trim();
        match field {
            ProductField::Name => validate_name(value).map_err(|_| NAME_MESSAGE),
            ProductField::Description => {
                validate_description(value).map_err(|_| DESCRIPTION_MESSAGE)
            }
            ProductField::Price => parse_price(value).map(|_| ()),
            ProductField::Stock => parse_stock(value).map(|_| ()),
            ProductField::Category if value.is_empty() => Err(CATEGORY_MESSAGE),
            ProductField::Category => Ok(()),
        }
    }

    /// Checks every field; an empty map means the form can be submitted.
    pub fn validate(&self) -> FieldErrors {
        ProductField::ALL
            .into_iter()
            .filter_map(|field| self.validate_field(field).err().map(|msg| (field, msg)))
            .collect()
    }

    /// Trimmed, parsed payload, or every field error.
    pub fn to_new_product(&self) -> Result<NewProduct, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let price = parse_price(self.price.trim()).map_err(|msg| single(ProductField::Price, msg))?;
        let stock = parse_stock(self.stock.trim()).map_err(|msg| single(ProductField::Stock, msg))?;
        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            stock,
            category: self.category.trim().to_string(),
        })
    }
}

fn single(field: ProductField, message: &'static str) -> FieldErrors {
    FieldErrors::from([(field, message)])
}

pub fn parse_price(text: &str) -> Result<f64, &'static str> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|price| is_valid_price(*price))
        .ok_or(PRICE_MESSAGE)
}

pub fn parse_stock(text: &str) -> Result<i64, &'static str> {
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|stock| *stock >= 0)
        .ok_or(STOCK_MESSAGE)
}
