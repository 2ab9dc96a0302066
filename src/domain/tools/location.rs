//! Location intelligence tools
//!
//! Forward geocoding through Nominatim and an in-process geodesic
//! distance calculation.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolResult, ContentBlock, TextContent},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::geo::{geodesic_km, km_to_miles, km_to_nautical_miles};
use crate::domain::tools::success_tool_result;
use crate::domain::utils::{require_non_empty, round2, utc_timestamp, validate_coordinates};
use crate::errors::AppError;
use crate::providers::GeocodeQuery;
use crate::AppState;

const NOT_FOUND_SUGGESTION: &str =
    "Try using a more specific address or well-known landmark name";

#[macros::mcp_tool(
    name = "geocode_location",
    description = "🌍 Pinpoint any destination on Earth with precision! Convert any location name, address, or landmark into exact coordinates for perfect trip planning."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GeocodeLocationTool {
    pub location: String,
    pub exactly_one: Option<bool>,
    pub timeout: Option<u64>,
    pub language: Option<String>,
    pub addressdetails: Option<bool>,
    pub country_codes: Option<String>,
}

#[macros::mcp_tool(
    name = "calculate_distance",
    description = "📏 Measure distances between any two places on Earth! Perfect for planning travel routes and optimizing your itinerary."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CalculateDistanceTool {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
    pub unit: Option<String>,
}

fn build_geocode_query(params: &GeocodeLocationTool) -> Result<GeocodeQuery, AppError> {
    let location = require_non_empty(&params.location, "location")?;

    let timeout_secs = params.timeout.unwrap_or(10);
    if !(1..=60).contains(&timeout_secs) {
        return Err(AppError::bad_request(
            "invalid_timeout",
            "timeout must be between 1 and 60 seconds",
        ));
    }

    let limit = if params.exactly_one.unwrap_or(true) { 1 } else { 10 };

    Ok(GeocodeQuery {
        location,
        limit,
        language: params.language.clone().unwrap_or_else(|| "en".to_string()),
        addressdetails: params.addressdetails.unwrap_or(true),
        country_codes: params
            .country_codes
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string),
        timeout_secs,
    })
}

fn coordinate_value(result: &Value, key: &str) -> Option<f64> {
    match result.get(key)? {
        Value::String(text) => text.parse().ok(),
        other => other.as_f64(),
    }
}

// Nominatim serializes coordinates as strings in jsonv2 responses.
fn parse_match_coordinates(result: &Value) -> Result<(f64, f64), AppError> {
    match (
        coordinate_value(result, "lat"),
        coordinate_value(result, "lon"),
    ) {
        (Some(latitude), Some(longitude)) => Ok((latitude, longitude)),
        _ => Err(AppError::upstream(
            "Nominatim",
            "Geocoding service error: response missing coordinates",
        )),
    }
}

fn single_match_payload(location: &str, result: &Value) -> Result<Value, AppError> {
    let (latitude, longitude) = parse_match_coordinates(result)?;

    Ok(json!({
        "location": location,
        "coordinates": {"latitude": latitude, "longitude": longitude},
        "address": result.get("display_name").cloned().unwrap_or(Value::Null),
        "raw_data": result,
        "search_timestamp": utc_timestamp(),
    }))
}

fn multi_match_payload(location: &str, results: &[Value]) -> Result<Value, AppError> {
    let mut matches = Vec::with_capacity(results.len());
    for result in results {
        let (latitude, longitude) = parse_match_coordinates(result)?;
        matches.push(json!({
            "coordinates": {"latitude": latitude, "longitude": longitude},
            "address": result.get("display_name").cloned().unwrap_or(Value::Null),
            "raw_data": result,
        }));
    }

    Ok(json!({
        "location": location,
        "multiple_results": matches,
        "search_timestamp": utc_timestamp(),
    }))
}

fn not_found_result(location: &str) -> CallToolResult {
    let message = format!("Location '{location}' not found");

    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            message.clone(),
            None,
            None,
        ))],
        is_error: Some(true),
        meta: None,
        structured_content: Some(Map::from_iter([
            ("error".to_string(), json!(message)),
            ("suggestions".to_string(), json!(NOT_FOUND_SUGGESTION)),
        ])),
    }
}

pub async fn geocode_location(
    state: &AppState,
    params: GeocodeLocationTool,
) -> Result<CallToolResult, AppError> {
    let query = build_geocode_query(&params)?;
    let exactly_one = params.exactly_one.unwrap_or(true);

    let results = state.geocoder.search(&query).await?;

    if results.is_empty() {
        return Ok(not_found_result(&query.location));
    }

    if exactly_one {
        let payload = single_match_payload(&query.location, &results[0])?;
        Ok(success_tool_result(
            format!("Resolved '{}' to coordinates", query.location),
            payload,
        ))
    } else {
        let payload = multi_match_payload(&query.location, &results)?;
        Ok(success_tool_result(
            format!("Found {} matches for '{}'", results.len(), query.location),
            payload,
        ))
    }
}

pub fn calculate_distance(params: CalculateDistanceTool) -> Result<CallToolResult, AppError> {
    validate_coordinates(params.lat1, params.lon1)?;
    validate_coordinates(params.lat2, params.lon2)?;

    let kilometers = geodesic_km(params.lat1, params.lon1, params.lat2, params.lon2);
    let miles = km_to_miles(kilometers);
    let nautical_miles = km_to_nautical_miles(kilometers);

    // Unrecognized units fall back to kilometers; the echoed unit keeps the
    // caller's (lowercased) spelling either way.
    let unit = params
        .unit
        .as_deref()
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "km".to_string());
    let value = match unit.as_str() {
        "miles" => miles,
        "nm" => nautical_miles,
        _ => kilometers,
    };

    let payload = json!({
        "point1": {"latitude": params.lat1, "longitude": params.lon1},
        "point2": {"latitude": params.lat2, "longitude": params.lon2},
        "distance": {"value": round2(value), "unit": unit},
        "all_units": {
            "kilometers": round2(kilometers),
            "miles": round2(miles),
            "nautical_miles": round2(nautical_miles),
        },
        "calculation_timestamp": utc_timestamp(),
    });

    Ok(success_tool_result(
        format!("Distance is {} {}", round2(value), unit),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        build_geocode_query, calculate_distance, parse_match_coordinates, single_match_payload,
        CalculateDistanceTool, GeocodeLocationTool,
    };

    fn geocode_params() -> GeocodeLocationTool {
        GeocodeLocationTool {
            location: "Eiffel Tower".to_string(),
            exactly_one: None,
            timeout: None,
            language: None,
            addressdetails: None,
            country_codes: None,
        }
    }

    fn nominatim_match() -> serde_json::Value {
        json!({
            "lat": "48.8582602",
            "lon": "2.2944991",
            "display_name": "Tour Eiffel, Paris, France",
            "place_id": 12345,
        })
    }

    #[test]
    fn exactly_one_maps_to_limit_one() {
        let query = build_geocode_query(&geocode_params()).expect("query should build");
        assert_eq!(query.limit, 1);
        assert_eq!(query.language, "en");
        assert!(query.addressdetails);
    }

    #[test]
    fn multiple_results_raise_the_limit() {
        let mut params = geocode_params();
        params.exactly_one = Some(false);

        let query = build_geocode_query(&params).expect("query should build");
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        let mut params = geocode_params();
        params.timeout = Some(0);

        let error = build_geocode_query(&params).expect_err("expected invalid timeout");
        assert!(error.to_string().contains("timeout"));
    }

    #[test]
    fn string_coordinates_are_parsed() {
        let (latitude, longitude) =
            parse_match_coordinates(&nominatim_match()).expect("coordinates should parse");

        assert!((latitude - 48.8582602).abs() < 1e-9);
        assert!((longitude - 2.2944991).abs() < 1e-9);
    }

    #[test]
    fn single_match_payload_carries_address_and_raw_data() {
        let payload =
            single_match_payload("Eiffel Tower", &nominatim_match()).expect("payload should build");

        assert_eq!(payload["address"], json!("Tour Eiffel, Paris, France"));
        assert_eq!(payload["raw_data"]["place_id"], json!(12345));
        assert_eq!(payload["location"], json!("Eiffel Tower"));
    }

    #[test]
    fn one_degree_on_the_equator_in_kilometers() {
        let result = calculate_distance(CalculateDistanceTool {
            lat1: 0.0,
            lon1: 0.0,
            lat2: 0.0,
            lon2: 1.0,
            unit: None,
        })
        .expect("distance should compute");

        let structured = result.structured_content.expect("structured content");
        let value = structured["distance"]["value"].as_f64().expect("value");
        assert!((value - 111.32).abs() < 0.01);
        assert_eq!(structured["distance"]["unit"], json!("km"));
    }

    #[test]
    fn unrecognized_units_fall_back_to_kilometers() {
        let result = calculate_distance(CalculateDistanceTool {
            lat1: 0.0,
            lon1: 0.0,
            lat2: 0.0,
            lon2: 1.0,
            unit: Some("Parsecs".to_string()),
        })
        .expect("distance should compute");

        let structured = result.structured_content.expect("structured content");
        assert_eq!(structured["distance"]["unit"], json!("parsecs"));
        let value = structured["distance"]["value"].as_f64().expect("value");
        let kilometers = structured["all_units"]["kilometers"]
            .as_f64()
            .expect("kilometers");
        assert!((value - kilometers).abs() < 1e-9);
    }

    #[test]
    fn rejects_invalid_first_point() {
        let error = calculate_distance(CalculateDistanceTool {
            lat1: 100.0,
            lon1: 0.0,
            lat2: 0.0,
            lon2: 0.0,
            unit: None,
        })
        .expect_err("expected invalid latitude");

        assert!(error.to_string().contains("latitude"));
    }
}
