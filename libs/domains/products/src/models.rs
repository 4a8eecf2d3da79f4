use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use validator::{Validate, ValidationError};

/// Product entity
///
/// `price` serializes as a decimal string (`"10.50"`); either a JSON number
/// or a string is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
}

/// Body of a create request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
}

/// Body of an update request: a full replacement carrying its own id,
/// which must match the path id.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProduct {
    pub id: i32,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
}

impl UpdateProduct {
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("name must not be blank".into()));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(
            ValidationError::new("negative").with_message("price must not be negative".into()),
        );
    }
    Ok(())
}

/// Columns a listing can be ordered by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Price,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Raw listing query string, e.g.
/// `?page=2&pageSize=20&sortBy=price&order=desc`.
///
/// Every field is optional and out-of-range values are clamped, never
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// A normalized listing request. Build one with [`crate::query::plan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based
    pub page: u64,
    pub page_size: u64,
    pub sort_field: SortField,
    pub order: SortOrder,
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub total_count: u64,
    pub total_pages: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub items: Vec<T>,
}
