//! Input validation helpers.
//!
//! A [`Validator`] collects every failed rule of one input so the client
//! sees all problems at once, e.g. `name must be 1-200 characters; price
//! must be greater than 0`.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::ServiceError;
use crate::models::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[allow(clippy::unwrap_used)]
static SKU_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]+$").unwrap());

#[allow(clippy::unwrap_used)]
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").unwrap());

/// Largest amount a `NUMERIC(12, 2)` money column can hold.
pub const MAX_MONEY: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

/// Accumulates validation failures.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    /// Trimmed length of `value` must fall within `min..=max` characters.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.trim().chars().count();
        self.check(
            (min..=max).contains(&len),
            format!("{field} must be {min}-{max} characters"),
        )
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(value > Decimal::ZERO, format!("{field} must be greater than 0"))
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(value >= Decimal::ZERO, format!("{field} cannot be negative"))
    }

    /// Money amount storable without rounding: at most two decimal places
    /// and no more than [`MAX_MONEY`].
    pub fn money(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(
            value.normalize().scale() <= 2,
            format!("{field} cannot have more than 2 decimal places"),
        )
        .check(value <= MAX_MONEY, format!("{field} cannot exceed {MAX_MONEY}"))
    }

    pub fn sku(&mut self, value: &str) -> &mut Self {
        self.length("sku", value, 1, 50);
        self.check(
            SKU_RE.is_match(value),
            "sku may only contain uppercase letters, digits, '-' and '_'",
        )
    }

    pub fn phone(&mut self, value: &str) -> &mut Self {
        self.check(PHONE_RE.is_match(value), "phone number is invalid")
    }

    pub fn image_url(&mut self, value: &str) -> &mut Self {
        self.check(is_http_url(value), format!("invalid image URL: {value}"))
    }

    /// Fail with every collected message joined by `"; "`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if any rule failed.
    pub fn finish(&mut self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(std::mem::take(&mut self.errors).join("; ")))
        }
    }
}

/// Absolute `http`/`https` URL with a host.
#[must_use]
pub fn is_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

/// Resolve optional paging parameters into `(page, page_size)`.
///
/// # Errors
///
/// Returns `ServiceError::Validation` if the page is below 1 or the page
/// size is outside `1..=MAX_PAGE_SIZE`.
pub fn pagination(page: Option<i64>, page_size: Option<i64>) -> Result<(i64, i64), ServiceError> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    Validator::new()
        .check(page >= 1, "page must be at least 1")
        .check(
            (1..=MAX_PAGE_SIZE).contains(&page_size),
            format!("pageSize must be between 1 and {MAX_PAGE_SIZE}"),
        )
        .finish()?;

    Ok((page, page_size))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(result: Result<(), ServiceError>) -> String {
        match result {
            Err(ServiceError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_collects_all_failures() {
        let msg = message(
            Validator::new()
                .length("name", "", 1, 200)
                .positive("price", Decimal::ZERO)
                .finish(),
        );
        assert_eq!(msg, "name must be 1-200 characters; price must be greater than 0");
    }

    #[test]
    fn test_length_counts_trimmed_chars() {
        assert!(Validator::new().length("name", "  çay  ", 3, 3).finish().is_ok());
        assert!(Validator::new().length("name", "   ", 1, 10).finish().is_err());
    }

    #[test]
    fn test_max_money_fills_the_column() {
        assert_eq!(MAX_MONEY, "9999999999.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_money_rules() {
        let dec = |s: &str| s.parse::<Decimal>().unwrap();
        assert!(Validator::new().money("price", dec("12.34")).finish().is_ok());
        assert!(Validator::new().money("price", dec("12.300")).finish().is_ok());
        assert!(Validator::new().money("price", MAX_MONEY).finish().is_ok());

        assert_eq!(
            message(Validator::new().money("price", dec("12.345")).finish()),
            "price cannot have more than 2 decimal places"
        );
        assert_eq!(
            message(Validator::new().money("price", dec("10000000000")).finish()),
            "price cannot exceed 9999999999.99"
        );
        assert_eq!(
            message(Validator::new().money("cost", dec("99999999999.999")).finish()),
            "cost cannot have more than 2 decimal places; cost cannot exceed 9999999999.99"
        );
    }

    #[test]
    fn test_sku_rules() {
        assert!(Validator::new().sku("KTL-001_B").finish().is_ok());
        assert!(Validator::new().sku("ktl-001").finish().is_err());
        assert!(Validator::new().sku("KTL 001").finish().is_err());
        assert!(Validator::new().sku(&"A".repeat(51)).finish().is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(Validator::new().phone("+905551234567").finish().is_ok());
        assert!(Validator::new().phone("5551234").finish().is_ok());
        assert!(Validator::new().phone("0555").finish().is_err());
        assert!(Validator::new().phone("+1-555-1234").finish().is_err());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://cdn.websale.example/a.jpg"));
        assert!(is_http_url("http://localhost:8080/img.png"));
        assert!(!is_http_url("ftp://cdn.websale.example/a.jpg"));
        assert!(!is_http_url("/images/a.jpg"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_pagination_defaults_and_bounds() {
        assert_eq!(pagination(None, None).unwrap(), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(pagination(Some(3), Some(100)).unwrap(), (3, 100));
        assert!(pagination(Some(0), None).is_err());
        assert!(pagination(None, Some(0)).is_err());
        assert!(pagination(None, Some(101)).is_err());
    }
}
