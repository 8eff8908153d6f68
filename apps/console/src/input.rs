//! Parsing of operator input.
//!
//! Everything typed at the console arrives as text; this module turns it
//! into the typed values the commands take. Failures become
//! [`ApiError::validation`] with a message that names the expected format.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use stockroom_core::{ChangeType, Money, NewProduct, ProductUpdate, Role};

use crate::error::ApiError;

/// Timestamp format accepted for date ranges, interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A product or category addressed either by id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Id(i64),
    Name(String),
}

impl Target {
    /// All-digit input is an id, anything else a name.
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ApiError::validation("Enter an id or a name"));
        }
        match raw.parse::<i64>() {
            Ok(id) => Ok(Target::Id(id)),
            Err(_) => Ok(Target::Name(raw.to_string())),
        }
    }
}

/// Parses a row id.
pub fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Invalid {what}. Please enter a valid number.")))
}

/// Parses a whole-number quantity. Sign rules are left to the callee.
pub fn parse_quantity(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation("Invalid quantity. Please enter a valid number."))
}

/// Parses a price such as `9.99`.
pub fn parse_price(raw: &str) -> Result<Money, ApiError> {
    raw.parse::<Money>().map_err(|e| ApiError::validation(e.to_string()))
}

/// Parses `IN` / `OUT` in any case.
pub fn parse_change_type(raw: &str) -> Result<ChangeType, ApiError> {
    raw.parse::<ChangeType>()
        .map_err(|_| ApiError::validation("Invalid change type. Please use 'IN' or 'OUT'."))
}

/// Parses `admin` / `employee` in any case.
pub fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .map_err(|_| ApiError::validation("Invalid role. Please choose 'admin' or 'employee'."))
}

/// Parses `YYYY-MM-DD HH:MM` as a UTC instant.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| ApiError::validation("Invalid date/time format. Please use yyyy-MM-dd HH:mm."))
}

/// Blank means "leave unchanged".
pub fn optional<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Result<T, ApiError>,
) -> Result<Option<T>, ApiError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse(raw).map(Some)
    }
}

/// Builds a product from the four "add product" answers.
pub fn new_product(
    name: &str,
    category_id: &str,
    quantity: &str,
    price: &str,
) -> Result<NewProduct, ApiError> {
    Ok(NewProduct::new(
        name.trim(),
        parse_id(category_id, "category ID")?,
        parse_quantity(quantity)?,
        parse_price(price)?,
    ))
}

/// Builds a partial update from the four "update product" answers.
/// Blank answers leave the field unchanged.
pub fn product_update(
    name: &str,
    category_id: &str,
    quantity: &str,
    price: &str,
) -> Result<ProductUpdate, ApiError> {
    Ok(ProductUpdate {
        name: optional(name, |n| Ok(n.trim().to_string()))?,
        category_id: optional(category_id, |c| parse_id(c, "category ID"))?,
        quantity: optional(quantity, parse_quantity)?,
        price_cents: optional(price, parse_price)?.map(|p| p.cents()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_target() {
        assert_eq!(Target::parse(" 12 ").unwrap(), Target::Id(12));
        assert_eq!(
            Target::parse("Hammer").unwrap(),
            Target::Name("Hammer".to_string())
        );
        assert!(Target::parse("  ").is_err());
    }

    #[test]
    fn test_numbers_and_price() {
        assert_eq!(parse_id("3", "product ID").unwrap(), 3);
        assert!(parse_id("three", "product ID").is_err());
        assert_eq!(parse_quantity("-4").unwrap(), -4);
        assert_eq!(parse_price("9.99").unwrap().cents(), 999);
        assert!(parse_price("9.999").is_err());
    }

    #[test]
    fn test_enums() {
        assert_eq!(parse_change_type("out").unwrap(), ChangeType::Out);
        assert!(parse_change_type("move").is_err());
        assert_eq!(parse_role("ADMIN").unwrap(), Role::Admin);
        assert!(parse_role("owner").is_err());
    }

    #[test]
    fn test_timestamp_is_utc() {
        let ts = parse_timestamp("2026-03-01 14:05").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2026, 3, 1));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 5, 0));
        assert!(parse_timestamp("01/03/2026 14:05").is_err());
    }

    #[test]
    fn test_product_forms() {
        let product = new_product(" Hammer ", "1", "10", "9.99").unwrap();
        assert_eq!(product.name, "Hammer");
        assert_eq!(product.price_cents, 999);
        assert!(new_product("Hammer", "tools", "10", "9.99").is_err());

        let update = product_update("", "", "4", "").unwrap();
        assert_eq!(update, ProductUpdate::default().quantity(4));
        assert!(product_update("", "", "", "").unwrap().is_empty());
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional("", parse_quantity).unwrap(), None);
        assert_eq!(optional(" 7 ", parse_quantity).unwrap(), Some(7));
        assert!(optional("x", parse_quantity).is_err());
    }
}
