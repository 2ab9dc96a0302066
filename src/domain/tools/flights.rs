//! Flight search tools
//!
//! `search_flights_serpapi` queries Google Flights through SerpAPI;
//! `search_flights_amadeus` queries the Amadeus flight-offers search.

use rust_mcp_sdk::{macros, schema::CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tools::{data_len, decorate_amadeus_payload, success_tool_result};
use crate::domain::utils::{
    array_or_empty, normalize_amadeus_limit, normalize_iata_code, normalize_results_limit,
    object_or_empty, parse_iso_date, require_non_empty, truncated_array, utc_timestamp,
    DEFAULT_FLIGHT_RESULTS,
};
use crate::errors::AppError;
use crate::providers::SerpApiEngine;
use crate::AppState;

const TRIP_TYPE_LABELS: [&str; 3] = ["Round trip", "One way", "Multi-city"];
const TRAVEL_CLASS_LABELS: [&str; 4] = ["Economy", "Premium economy", "Business", "First"];
const AMADEUS_TRAVEL_CLASSES: [&str; 4] = ["ECONOMY", "PREMIUM_ECONOMY", "BUSINESS", "FIRST"];

#[macros::mcp_tool(
    name = "search_flights_serpapi",
    description = "🛫 Find the perfect flights using Google Flights! Your AI travel concierge searches through thousands of flight options to find the best deals and most convenient routes for your journey."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchFlightsSerpApiTool {
    pub departure_id: String,
    pub arrival_id: String,
    pub outbound_date: String,
    pub return_date: Option<String>,
    pub trip_type: Option<u32>,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub infants_in_seat: Option<u32>,
    pub infants_on_lap: Option<u32>,
    pub travel_class: Option<u32>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub max_results: Option<u32>,
}

// Field names follow the Amadeus API query parameters, which are part of
// the published tool contract.
#[macros::mcp_tool(
    name = "search_flights_amadeus",
    description = "🛫 Find professional flight offers using Amadeus Global Distribution System! Access real-time airline inventory with detailed fare information and booking classes."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct SearchFlightsAmadeusTool {
    pub originLocationCode: String,
    pub destinationLocationCode: String,
    pub departureDate: String,
    pub adults: u32,
    pub returnDate: Option<String>,
    pub children: Option<u32>,
    pub infants: Option<u32>,
    pub travelClass: Option<String>,
    pub includedAirlineCodes: Option<String>,
    pub excludedAirlineCodes: Option<String>,
    pub nonStop: Option<bool>,
    pub currencyCode: Option<String>,
    pub maxPrice: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug)]
struct FlightQuery {
    query: Vec<(String, String)>,
    metadata: Map<String, Value>,
    limit: usize,
}

fn build_flight_query(params: &SearchFlightsSerpApiTool) -> Result<FlightQuery, AppError> {
    let departure = require_non_empty(&params.departure_id, "departure_id")?;
    let arrival = require_non_empty(&params.arrival_id, "arrival_id")?;
    parse_iso_date(&params.outbound_date, "outbound_date")?;

    let trip_type = params.trip_type.unwrap_or(1);
    if !(1..=3).contains(&trip_type) {
        return Err(AppError::bad_request(
            "invalid_trip_type",
            "trip_type must be 1 (Round trip), 2 (One way), or 3 (Multi-city)",
        ));
    }

    let travel_class = params.travel_class.unwrap_or(1);
    if !(1..=4).contains(&travel_class) {
        return Err(AppError::bad_request(
            "invalid_travel_class",
            "travel_class must be between 1 (Economy) and 4 (First)",
        ));
    }

    if let Some(return_date) = params.return_date.as_deref() {
        parse_iso_date(return_date, "return_date")?;
    }

    let adults = params.adults.unwrap_or(1);
    let children = params.children.unwrap_or(0);
    let infants_in_seat = params.infants_in_seat.unwrap_or(0);
    let infants_on_lap = params.infants_on_lap.unwrap_or(0);
    let currency = params.currency.clone().unwrap_or_else(|| "USD".to_string());
    let country = params.country.clone().unwrap_or_else(|| "us".to_string());
    let language = params.language.clone().unwrap_or_else(|| "en".to_string());
    let limit = normalize_results_limit(params.max_results, DEFAULT_FLIGHT_RESULTS)?;

    let mut query = vec![
        ("departure_id".to_string(), departure.clone()),
        ("arrival_id".to_string(), arrival.clone()),
        ("outbound_date".to_string(), params.outbound_date.clone()),
        ("type".to_string(), trip_type.to_string()),
        ("adults".to_string(), adults.to_string()),
        ("children".to_string(), children.to_string()),
        ("infants_in_seat".to_string(), infants_in_seat.to_string()),
        ("infants_on_lap".to_string(), infants_on_lap.to_string()),
        ("travel_class".to_string(), travel_class.to_string()),
        ("currency".to_string(), currency.clone()),
        ("hl".to_string(), language),
        ("gl".to_string(), country),
    ];

    // Google Flights only accepts a return date on round trips.
    if trip_type == 1 {
        if let Some(return_date) = &params.return_date {
            query.push(("return_date".to_string(), return_date.clone()));
        }
    }

    let metadata = Map::from_iter([
        ("departure".to_string(), json!(departure)),
        ("arrival".to_string(), json!(arrival)),
        ("outbound_date".to_string(), json!(params.outbound_date)),
        ("return_date".to_string(), json!(params.return_date)),
        (
            "trip_type".to_string(),
            json!(TRIP_TYPE_LABELS[(trip_type - 1) as usize]),
        ),
        (
            "passengers".to_string(),
            json!({
                "adults": adults,
                "children": children,
                "infants_in_seat": infants_in_seat,
                "infants_on_lap": infants_on_lap,
            }),
        ),
        (
            "travel_class".to_string(),
            json!(TRAVEL_CLASS_LABELS[(travel_class - 1) as usize]),
        ),
        ("currency".to_string(), json!(currency)),
    ]);

    Ok(FlightQuery {
        query,
        metadata,
        limit,
    })
}

fn build_flight_offers_query(
    params: &SearchFlightsAmadeusTool,
) -> Result<Vec<(String, String)>, AppError> {
    let origin = normalize_iata_code(&params.originLocationCode, "originLocationCode")?;
    let destination = normalize_iata_code(&params.destinationLocationCode, "destinationLocationCode")?;
    parse_iso_date(&params.departureDate, "departureDate")?;

    if !(1..=9).contains(&params.adults) {
        return Err(AppError::bad_request(
            "invalid_adults",
            "Adults must be between 1 and 9",
        ));
    }

    let children = params.children.unwrap_or(0);
    if params.adults.saturating_add(children) > 9 {
        return Err(AppError::bad_request(
            "invalid_passenger_mix",
            "Total number of seated travelers (adults + children) cannot exceed 9",
        ));
    }

    let infants = params.infants.unwrap_or(0);
    if infants > params.adults {
        return Err(AppError::bad_request(
            "invalid_passenger_mix",
            "Number of infants cannot exceed number of adults",
        ));
    }

    if let Some(return_date) = params.returnDate.as_deref() {
        parse_iso_date(return_date, "returnDate")?;
    }

    if let Some(travel_class) = params.travelClass.as_deref() {
        if !AMADEUS_TRAVEL_CLASSES.contains(&travel_class) {
            return Err(AppError::bad_request(
                "invalid_travel_class",
                "travelClass must be one of: ECONOMY, PREMIUM_ECONOMY, BUSINESS, FIRST",
            ));
        }
    }

    let max = normalize_amadeus_limit(params.max)?;

    let mut query = vec![
        ("originLocationCode".to_string(), origin),
        ("destinationLocationCode".to_string(), destination),
        ("departureDate".to_string(), params.departureDate.clone()),
        ("adults".to_string(), params.adults.to_string()),
    ];

    if let Some(return_date) = &params.returnDate {
        query.push(("returnDate".to_string(), return_date.clone()));
    }
    if let Some(children) = params.children {
        query.push(("children".to_string(), children.to_string()));
    }
    if let Some(infants) = params.infants {
        query.push(("infants".to_string(), infants.to_string()));
    }
    if let Some(travel_class) = &params.travelClass {
        query.push(("travelClass".to_string(), travel_class.clone()));
    }
    if let Some(included) = &params.includedAirlineCodes {
        query.push(("includedAirlineCodes".to_string(), included.clone()));
    }
    if let Some(excluded) = &params.excludedAirlineCodes {
        query.push(("excludedAirlineCodes".to_string(), excluded.clone()));
    }
    if let Some(non_stop) = params.nonStop {
        query.push(("nonStop".to_string(), non_stop.to_string()));
    }
    if let Some(currency_code) = &params.currencyCode {
        query.push(("currencyCode".to_string(), currency_code.clone()));
    }
    if let Some(max_price) = params.maxPrice {
        query.push(("maxPrice".to_string(), max_price.to_string()));
    }
    query.push(("max".to_string(), max.to_string()));

    Ok(query)
}

pub async fn search_flights_serpapi(
    state: &AppState,
    params: SearchFlightsSerpApiTool,
) -> Result<CallToolResult, AppError> {
    let plan = build_flight_query(&params)?;

    let flight_data = state
        .serpapi
        .search(SerpApiEngine::GoogleFlights, plan.query)
        .await?;

    let best_flights = truncated_array(&flight_data, "best_flights", plan.limit);
    let other_flights = truncated_array(&flight_data, "other_flights", plan.limit);
    let best = best_flights.as_array().map_or(0, Vec::len);
    let other = other_flights.as_array().map_or(0, Vec::len);

    let mut metadata = plan.metadata;
    metadata.insert("search_timestamp".to_string(), json!(utc_timestamp()));

    let payload = json!({
        "provider": SerpApiEngine::GoogleFlights.provider_label(),
        "search_metadata": metadata,
        "best_flights": best_flights,
        "other_flights": other_flights,
        "price_insights": object_or_empty(&flight_data, "price_insights"),
        "airports": array_or_empty(&flight_data, "airports"),
    });

    Ok(success_tool_result(
        format!("Found {best} best and {other} other flight options"),
        payload,
    ))
}

pub async fn search_flights_amadeus(
    state: &AppState,
    params: SearchFlightsAmadeusTool,
) -> Result<CallToolResult, AppError> {
    let query = build_flight_offers_query(&params)?;
    let body = state.amadeus.flight_offers(query).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned {} flight offers", data_len(&payload)),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        build_flight_offers_query, build_flight_query, SearchFlightsAmadeusTool,
        SearchFlightsSerpApiTool,
    };

    fn serpapi_params() -> SearchFlightsSerpApiTool {
        SearchFlightsSerpApiTool {
            departure_id: "DEL".to_string(),
            arrival_id: "CDG".to_string(),
            outbound_date: "2026-09-10".to_string(),
            return_date: Some("2026-09-20".to_string()),
            trip_type: None,
            adults: None,
            children: None,
            infants_in_seat: None,
            infants_on_lap: None,
            travel_class: None,
            currency: None,
            country: None,
            language: None,
            max_results: None,
        }
    }

    fn amadeus_params() -> SearchFlightsAmadeusTool {
        SearchFlightsAmadeusTool {
            originLocationCode: "SYD".to_string(),
            destinationLocationCode: "BKK".to_string(),
            departureDate: "2026-09-10".to_string(),
            adults: 1,
            returnDate: None,
            children: None,
            infants: None,
            travelClass: None,
            includedAirlineCodes: None,
            excludedAirlineCodes: None,
            nonStop: None,
            currencyCode: None,
            maxPrice: None,
            max: None,
        }
    }

    #[test]
    fn round_trips_send_the_return_date() {
        let plan = build_flight_query(&serpapi_params()).expect("query should build");

        assert!(plan
            .query
            .contains(&("return_date".to_string(), "2026-09-20".to_string())));
        assert_eq!(plan.metadata["trip_type"], json!("Round trip"));
        assert_eq!(plan.metadata["travel_class"], json!("Economy"));
        assert_eq!(plan.limit, 10);
    }

    #[test]
    fn one_way_trips_drop_the_return_date() {
        let mut params = serpapi_params();
        params.trip_type = Some(2);

        let plan = build_flight_query(&params).expect("query should build");

        assert!(!plan.query.iter().any(|(key, _)| key == "return_date"));
        assert_eq!(plan.metadata["trip_type"], json!("One way"));
    }

    #[test]
    fn rejects_out_of_range_travel_class() {
        let mut params = serpapi_params();
        params.travel_class = Some(5);

        let error = build_flight_query(&params).expect_err("expected invalid travel class");
        assert!(error.to_string().contains("travel_class"));
    }

    #[test]
    fn rejects_malformed_outbound_date() {
        let mut params = serpapi_params();
        params.outbound_date = "10/09/2026".to_string();

        let error = build_flight_query(&params).expect_err("expected invalid date");
        assert!(error.to_string().contains("outbound_date"));
    }

    #[test]
    fn amadeus_rejects_adults_out_of_range() {
        let mut params = amadeus_params();
        params.adults = 0;

        let error = build_flight_offers_query(&params).expect_err("expected invalid adults");
        assert!(error
            .to_string()
            .contains("Adults must be between 1 and 9"));
    }

    #[test]
    fn amadeus_rejects_too_many_seated_travelers() {
        let mut params = amadeus_params();
        params.adults = 5;
        params.children = Some(5);

        let error = build_flight_offers_query(&params).expect_err("expected invalid mix");
        assert!(error.to_string().contains("cannot exceed 9"));
    }

    #[test]
    fn amadeus_rejects_more_infants_than_adults() {
        let mut params = amadeus_params();
        params.infants = Some(2);

        let error = build_flight_offers_query(&params).expect_err("expected invalid mix");
        assert!(error
            .to_string()
            .contains("Number of infants cannot exceed number of adults"));
    }

    #[test]
    fn amadeus_sends_only_provided_optionals_plus_max() {
        let query = build_flight_offers_query(&amadeus_params()).expect("query should build");

        assert_eq!(
            query,
            vec![
                ("originLocationCode".to_string(), "SYD".to_string()),
                ("destinationLocationCode".to_string(), "BKK".to_string()),
                ("departureDate".to_string(), "2026-09-10".to_string()),
                ("adults".to_string(), "1".to_string()),
                ("max".to_string(), "250".to_string()),
            ]
        );
    }

    #[test]
    fn amadeus_serializes_non_stop_as_lowercase() {
        let mut params = amadeus_params();
        params.nonStop = Some(true);

        let query = build_flight_offers_query(&params).expect("query should build");
        assert!(query.contains(&("nonStop".to_string(), "true".to_string())));
    }

    #[test]
    fn amadeus_rejects_unknown_travel_class() {
        let mut params = amadeus_params();
        params.travelClass = Some("COACH".to_string());

        let error = build_flight_offers_query(&params).expect_err("expected invalid class");
        assert!(error.to_string().contains("travelClass"));
    }
}
