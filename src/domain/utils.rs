//! Domain-specific shared validations and formatting utilities

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::errors::AppError;

pub const MAX_SERPAPI_RESULTS: u32 = 50;
pub const DEFAULT_FLIGHT_RESULTS: u32 = 10;
pub const DEFAULT_HOTEL_RESULTS: u32 = 20;
pub const DEFAULT_EVENT_RESULTS: u32 = 20;
pub const MAX_AMADEUS_RESULTS: u32 = 250;

pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_iso_date(value: &str, field: &'static str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(
            "invalid_date",
            format!("{field} must be an ISO 8601 date (YYYY-MM-DD)"),
        )
    })
}

pub fn validate_stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), AppError> {
    if check_out <= check_in {
        return Err(AppError::bad_request(
            "invalid_date_range",
            "check_out_date must be after check_in_date",
        ));
    }

    Ok(())
}

pub fn require_non_empty(value: &str, field: &'static str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "invalid_argument",
            format!("{field} must not be empty"),
        ));
    }

    Ok(trimmed.to_string())
}

pub fn normalize_currency_code(value: &str, field: &'static str) -> Result<String, AppError> {
    let code = value.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|character| character.is_ascii_alphabetic()) {
        return Err(AppError::bad_request(
            "invalid_currency",
            format!("{field} must be a 3-letter ISO 4217 currency code"),
        ));
    }

    Ok(code)
}

pub fn normalize_iata_code(value: &str, field: &'static str) -> Result<String, AppError> {
    let code = value.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|character| character.is_ascii_alphabetic()) {
        return Err(AppError::bad_request(
            "invalid_location_code",
            format!("{field} must be a 3-letter IATA code"),
        ));
    }

    Ok(code)
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::bad_request(
            "invalid_coordinates",
            "latitude must be between -90 and 90",
        ));
    }

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::bad_request(
            "invalid_coordinates",
            "longitude must be between -180 and 180",
        ));
    }

    Ok(())
}

pub fn validate_radius_unit(unit: &str) -> Result<(), AppError> {
    if unit != "KM" && unit != "MI" {
        return Err(AppError::bad_request(
            "invalid_radius_unit",
            "radiusUnit must be KM or MI",
        ));
    }

    Ok(())
}

pub fn normalize_results_limit(limit: Option<u32>, default: u32) -> Result<usize, AppError> {
    let limit = limit.unwrap_or(default);
    if limit == 0 || limit > MAX_SERPAPI_RESULTS {
        return Err(AppError::bad_request(
            "invalid_limit",
            "max_results must be between 1 and 50",
        ));
    }

    Ok(limit as usize)
}

pub fn normalize_amadeus_limit(limit: Option<u32>) -> Result<u32, AppError> {
    let limit = limit.unwrap_or(MAX_AMADEUS_RESULTS);
    if limit == 0 || limit > MAX_AMADEUS_RESULTS {
        return Err(AppError::bad_request(
            "invalid_limit",
            "max must be between 1 and 250",
        ));
    }

    Ok(limit)
}

/// Copies `key` from an upstream payload, keeping at most `limit` entries.
/// Missing or non-array values become an empty array.
pub fn truncated_array(payload: &Value, key: &str, limit: usize) -> Value {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(|items| Value::Array(items.iter().take(limit).cloned().collect()))
        .unwrap_or_else(|| json!([]))
}

pub fn object_or_empty(payload: &Value, key: &str) -> Value {
    payload.get(key).cloned().unwrap_or_else(|| json!({}))
}

pub fn array_or_empty(payload: &Value, key: &str) -> Value {
    payload.get(key).cloned().unwrap_or_else(|| json!([]))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_iso_dates() {
        let date = parse_iso_date(" 2026-06-15 ", "outbound_date").expect("valid date");
        assert_eq!(date.to_string(), "2026-06-15");
    }

    #[test]
    fn rejects_malformed_dates() {
        let error = parse_iso_date("15/06/2026", "outbound_date").expect_err("expected bad date");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn rejects_impossible_dates() {
        let error = parse_iso_date("2026-02-30", "check_in_date").expect_err("expected bad date");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn rejects_checkout_before_checkin() {
        let check_in = parse_iso_date("2026-06-20", "check_in_date").expect("valid date");
        let check_out = parse_iso_date("2026-06-15", "check_out_date").expect("valid date");

        let error = validate_stay_dates(check_in, check_out).expect_err("expected invalid range");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn rejects_same_day_checkout() {
        let date = parse_iso_date("2026-06-15", "check_in_date").expect("valid date");
        assert!(validate_stay_dates(date, date).is_err());
    }

    #[test]
    fn normalizes_currency_codes() {
        let code = normalize_currency_code(" eur ", "currency").expect("valid code");
        assert_eq!(code, "EUR");
    }

    #[test]
    fn rejects_non_alpha_currency_codes() {
        assert!(normalize_currency_code("EU1", "currency").is_err());
        assert!(normalize_currency_code("EURO", "currency").is_err());
        assert!(normalize_currency_code("", "currency").is_err());
    }

    #[test]
    fn normalizes_iata_codes() {
        let code = normalize_iata_code("syd", "originLocationCode").expect("valid code");
        assert_eq!(code, "SYD");
    }

    #[test]
    fn rejects_city_names_as_iata_codes() {
        assert!(normalize_iata_code("Sydney", "originLocationCode").is_err());
    }

    #[test]
    fn validates_coordinate_ranges() {
        assert!(validate_coordinates(48.8566, 2.3522).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn applies_default_results_limit() {
        let limit = normalize_results_limit(None, DEFAULT_HOTEL_RESULTS).expect("valid limit");
        assert_eq!(limit, 20);
    }

    #[test]
    fn rejects_out_of_range_results_limit() {
        assert!(normalize_results_limit(Some(0), DEFAULT_FLIGHT_RESULTS).is_err());
        assert!(normalize_results_limit(Some(51), DEFAULT_FLIGHT_RESULTS).is_err());
    }

    #[test]
    fn amadeus_limit_defaults_to_max() {
        let limit = normalize_amadeus_limit(None).expect("valid limit");
        assert_eq!(limit, MAX_AMADEUS_RESULTS);
        assert!(normalize_amadeus_limit(Some(251)).is_err());
    }

    #[test]
    fn truncates_result_arrays() {
        let payload = json!({"best_flights": [1, 2, 3, 4]});
        let truncated = truncated_array(&payload, "best_flights", 2);
        assert_eq!(truncated, json!([1, 2]));
        assert_eq!(truncated_array(&payload, "missing", 2), json!([]));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(12.0), 12.0);
    }
}
