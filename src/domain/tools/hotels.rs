//! Hotel search tools
//!
//! One Google Hotels search through SerpAPI plus three Amadeus surfaces:
//! the hotel directory by city and by coordinates, and bookable offers.

use rust_mcp_sdk::{macros, schema::CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tools::{data_len, decorate_amadeus_payload, success_tool_result};
use crate::domain::utils::{
    normalize_iata_code, normalize_results_limit, object_or_empty, parse_iso_date,
    require_non_empty, truncated_array, utc_timestamp, validate_coordinates, validate_radius_unit,
    validate_stay_dates, DEFAULT_HOTEL_RESULTS,
};
use crate::errors::AppError;
use crate::providers::SerpApiEngine;
use crate::AppState;

const SORT_BY_VALUES: [u32; 3] = [3, 8, 13];

#[macros::mcp_tool(
    name = "search_hotels_serpapi",
    description = "🏨 Discover your perfect accommodation using Google Hotels! Your AI travel concierge will find the ideal lodging that matches your style, budget, and dreams for the perfect stay."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchHotelsSerpApiTool {
    pub location: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub children_ages: Option<Vec<u32>>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<u32>,
    pub hotel_class: Option<Vec<u32>>,
    pub amenities: Option<Vec<u32>>,
    pub property_types: Option<Vec<u32>>,
    pub brands: Option<Vec<u32>>,
    pub free_cancellation: Option<bool>,
    pub special_offers: Option<bool>,
    pub vacation_rentals: Option<bool>,
    pub bedrooms: Option<u32>,
    pub max_results: Option<u32>,
}

// Field names follow the Amadeus API query parameters, which are part of
// the published tool contract.
#[macros::mcp_tool(
    name = "search_hotels_amadeus_by_city",
    description = "🏨 Discover professional hotel listings using Amadeus! Find accommodations that match your style, budget, and preferences using the same system travel professionals use."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct SearchHotelsAmadeusByCityTool {
    pub cityCode: String,
    pub radius: Option<u32>,
    pub radiusUnit: Option<String>,
    pub chainCodes: Option<String>,
    pub amenities: Option<String>,
    pub ratings: Option<String>,
    pub hotelSource: Option<String>,
}

#[macros::mcp_tool(
    name = "search_hotels_amadeus_geocode",
    description = "🎯 Find hotels near any specific location with pinpoint accuracy using Amadeus! Perfect for finding accommodations near landmarks, airports, business districts, or any precise location."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct SearchHotelsAmadeusGeocodeTool {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<u32>,
    pub radiusUnit: Option<String>,
    pub chainCodes: Option<String>,
    pub amenities: Option<String>,
    pub ratings: Option<String>,
    pub hotelSource: Option<String>,
}

#[macros::mcp_tool(
    name = "search_hotel_offers_amadeus",
    description = "💰 Find the best hotel deals with real-time pricing and availability using Amadeus! Search for actual bookable rates and room availability for your exact travel dates."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct SearchHotelOffersAmadeusTool {
    pub cityCode: Option<String>,
    pub hotelIds: Option<String>,
    pub checkInDate: Option<String>,
    pub checkOutDate: Option<String>,
    pub adults: Option<u32>,
    pub roomQuantity: Option<u32>,
    pub priceRange: Option<String>,
    pub currency: Option<String>,
    pub paymentPolicy: Option<String>,
    pub boardType: Option<String>,
    pub includeClosed: Option<bool>,
    pub bestRateOnly: Option<bool>,
    pub view: Option<String>,
    pub sort: Option<String>,
    pub lang: Option<String>,
}

#[derive(Debug)]
struct HotelQuery {
    query: Vec<(String, String)>,
    metadata: Map<String, Value>,
    limit: usize,
}

fn join_codes(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn build_hotel_query(params: &SearchHotelsSerpApiTool) -> Result<HotelQuery, AppError> {
    let location = require_non_empty(&params.location, "location")?;
    let check_in = parse_iso_date(&params.check_in_date, "check_in_date")?;
    let check_out = parse_iso_date(&params.check_out_date, "check_out_date")?;
    validate_stay_dates(check_in, check_out)?;

    if let Some(sort_by) = params.sort_by {
        if !SORT_BY_VALUES.contains(&sort_by) {
            return Err(AppError::bad_request(
                "invalid_sort_by",
                "sort_by must be 3 (best deals), 8 (highest rated), or 13 (most popular)",
            ));
        }
    }

    let adults = params.adults.unwrap_or(2);
    let children = params.children.unwrap_or(0);
    let currency = params.currency.clone().unwrap_or_else(|| "USD".to_string());
    let country = params.country.clone().unwrap_or_else(|| "us".to_string());
    let language = params.language.clone().unwrap_or_else(|| "en".to_string());
    let limit = normalize_results_limit(params.max_results, DEFAULT_HOTEL_RESULTS)?;

    let mut query = vec![
        ("q".to_string(), location.clone()),
        ("check_in_date".to_string(), params.check_in_date.clone()),
        ("check_out_date".to_string(), params.check_out_date.clone()),
        ("adults".to_string(), adults.to_string()),
        ("children".to_string(), children.to_string()),
        ("currency".to_string(), currency.clone()),
        ("gl".to_string(), country),
        ("hl".to_string(), language),
    ];

    if let Some(ages) = params.children_ages.as_deref().filter(|ages| !ages.is_empty()) {
        query.push(("children_ages".to_string(), join_codes(ages)));
    }
    if let Some(sort_by) = params.sort_by {
        query.push(("sort_by".to_string(), sort_by.to_string()));
    }
    if let Some(classes) = params.hotel_class.as_deref().filter(|values| !values.is_empty()) {
        query.push(("hotel_class".to_string(), join_codes(classes)));
    }
    if let Some(amenities) = params.amenities.as_deref().filter(|values| !values.is_empty()) {
        query.push(("amenities".to_string(), join_codes(amenities)));
    }
    if let Some(types) = params.property_types.as_deref().filter(|values| !values.is_empty()) {
        query.push(("property_types".to_string(), join_codes(types)));
    }
    if let Some(brands) = params.brands.as_deref().filter(|values| !values.is_empty()) {
        query.push(("brands".to_string(), join_codes(brands)));
    }
    if params.free_cancellation.unwrap_or(false) {
        query.push(("free_cancellation".to_string(), "true".to_string()));
    }
    if params.special_offers.unwrap_or(false) {
        query.push(("special_offers".to_string(), "true".to_string()));
    }
    if params.vacation_rentals.unwrap_or(false) {
        query.push(("vacation_rentals".to_string(), "true".to_string()));
    }
    if let Some(bedrooms) = params.bedrooms.filter(|&value| value > 0) {
        query.push(("bedrooms".to_string(), bedrooms.to_string()));
    }

    let metadata = Map::from_iter([
        ("location".to_string(), json!(location)),
        ("check_in_date".to_string(), json!(params.check_in_date)),
        ("check_out_date".to_string(), json!(params.check_out_date)),
        (
            "guests".to_string(),
            json!({
                "adults": adults,
                "children": children,
                "children_ages": params.children_ages.clone().unwrap_or_default(),
            }),
        ),
        ("currency".to_string(), json!(currency)),
    ]);

    Ok(HotelQuery {
        query,
        metadata,
        limit,
    })
}

fn push_directory_filters(
    query: &mut Vec<(String, String)>,
    radius: Option<u32>,
    radius_unit: Option<&str>,
    chain_codes: Option<&str>,
    amenities: Option<&str>,
    ratings: Option<&str>,
    hotel_source: Option<&str>,
) -> Result<(), AppError> {
    if let Some(radius) = radius {
        query.push(("radius".to_string(), radius.to_string()));
    }
    if let Some(unit) = radius_unit {
        validate_radius_unit(unit)?;
        query.push(("radiusUnit".to_string(), unit.to_string()));
    }
    if let Some(chains) = chain_codes {
        query.push(("chainCodes".to_string(), chains.to_string()));
    }
    if let Some(amenities) = amenities {
        query.push(("amenities".to_string(), amenities.to_string()));
    }
    if let Some(ratings) = ratings {
        query.push(("ratings".to_string(), ratings.to_string()));
    }
    if let Some(source) = hotel_source {
        query.push(("hotelSource".to_string(), source.to_string()));
    }

    Ok(())
}

fn build_hotels_by_city_query(
    params: &SearchHotelsAmadeusByCityTool,
) -> Result<Vec<(String, String)>, AppError> {
    let city_code = normalize_iata_code(&params.cityCode, "cityCode")?;

    let mut query = vec![("cityCode".to_string(), city_code)];
    push_directory_filters(
        &mut query,
        params.radius,
        params.radiusUnit.as_deref(),
        params.chainCodes.as_deref(),
        params.amenities.as_deref(),
        params.ratings.as_deref(),
        params.hotelSource.as_deref(),
    )?;

    Ok(query)
}

fn build_hotels_by_geocode_query(
    params: &SearchHotelsAmadeusGeocodeTool,
) -> Result<Vec<(String, String)>, AppError> {
    validate_coordinates(params.latitude, params.longitude)?;

    let mut query = vec![
        ("latitude".to_string(), params.latitude.to_string()),
        ("longitude".to_string(), params.longitude.to_string()),
    ];
    push_directory_filters(
        &mut query,
        params.radius,
        params.radiusUnit.as_deref(),
        params.chainCodes.as_deref(),
        params.amenities.as_deref(),
        params.ratings.as_deref(),
        params.hotelSource.as_deref(),
    )?;

    Ok(query)
}

fn build_hotel_offers_query(
    params: &SearchHotelOffersAmadeusTool,
) -> Result<Vec<(String, String)>, AppError> {
    let city_code = params
        .cityCode
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let hotel_ids = params
        .hotelIds
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if city_code.is_none() && hotel_ids.is_none() {
        return Err(AppError::bad_request(
            "missing_location",
            "Either cityCode or hotelIds must be provided",
        ));
    }

    let city_code = city_code
        .map(|value| normalize_iata_code(value, "cityCode"))
        .transpose()?;

    let check_in = params
        .checkInDate
        .as_deref()
        .map(|value| parse_iso_date(value, "checkInDate"))
        .transpose()?;
    let check_out = params
        .checkOutDate
        .as_deref()
        .map(|value| parse_iso_date(value, "checkOutDate"))
        .transpose()?;
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        validate_stay_dates(check_in, check_out)?;
    }

    let adults = params.adults.unwrap_or(1);
    let mut query = vec![("adults".to_string(), adults.to_string())];

    if let Some(city_code) = city_code {
        query.push(("cityCode".to_string(), city_code));
    }
    if let Some(hotel_ids) = hotel_ids {
        query.push(("hotelIds".to_string(), hotel_ids.to_string()));
    }
    if let Some(check_in_date) = &params.checkInDate {
        query.push(("checkInDate".to_string(), check_in_date.clone()));
    }
    if let Some(check_out_date) = &params.checkOutDate {
        query.push(("checkOutDate".to_string(), check_out_date.clone()));
    }
    if let Some(rooms) = params.roomQuantity {
        query.push(("roomQuantity".to_string(), rooms.to_string()));
    }
    if let Some(price_range) = &params.priceRange {
        query.push(("priceRange".to_string(), price_range.clone()));
    }
    if let Some(currency) = &params.currency {
        query.push(("currency".to_string(), currency.clone()));
    }
    if let Some(payment_policy) = &params.paymentPolicy {
        query.push(("paymentPolicy".to_string(), payment_policy.clone()));
    }
    if let Some(board_type) = &params.boardType {
        query.push(("boardType".to_string(), board_type.clone()));
    }
    if let Some(include_closed) = params.includeClosed {
        query.push(("includeClosed".to_string(), include_closed.to_string()));
    }
    if let Some(best_rate_only) = params.bestRateOnly {
        query.push(("bestRateOnly".to_string(), best_rate_only.to_string()));
    }
    if let Some(view) = &params.view {
        query.push(("view".to_string(), view.clone()));
    }
    if let Some(sort) = &params.sort {
        query.push(("sort".to_string(), sort.clone()));
    }
    if let Some(lang) = &params.lang {
        query.push(("lang".to_string(), lang.clone()));
    }

    Ok(query)
}

pub async fn search_hotels_serpapi(
    state: &AppState,
    params: SearchHotelsSerpApiTool,
) -> Result<CallToolResult, AppError> {
    let plan = build_hotel_query(&params)?;

    let hotel_data = state
        .serpapi
        .search(SerpApiEngine::GoogleHotels, plan.query)
        .await?;

    let properties = truncated_array(&hotel_data, "properties", plan.limit);
    let returned = properties.as_array().map_or(0, Vec::len);

    let mut metadata = plan.metadata;
    metadata.insert("search_timestamp".to_string(), json!(utc_timestamp()));

    let payload = json!({
        "provider": SerpApiEngine::GoogleHotels.provider_label(),
        "search_metadata": metadata,
        "properties": properties,
        "filters": object_or_empty(&hotel_data, "filters"),
        "search_parameters": object_or_empty(&hotel_data, "search_parameters"),
        "location_info": object_or_empty(&hotel_data, "place_results"),
    });

    Ok(success_tool_result(
        format!("Found {returned} properties"),
        payload,
    ))
}

pub async fn search_hotels_amadeus_by_city(
    state: &AppState,
    params: SearchHotelsAmadeusByCityTool,
) -> Result<CallToolResult, AppError> {
    let query = build_hotels_by_city_query(&params)?;
    let body = state.amadeus.hotels_by_city(query).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned {} hotels", data_len(&payload)),
        payload,
    ))
}

pub async fn search_hotels_amadeus_geocode(
    state: &AppState,
    params: SearchHotelsAmadeusGeocodeTool,
) -> Result<CallToolResult, AppError> {
    let query = build_hotels_by_geocode_query(&params)?;
    let body = state.amadeus.hotels_by_geocode(query).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned {} hotels", data_len(&payload)),
        payload,
    ))
}

pub async fn search_hotel_offers_amadeus(
    state: &AppState,
    params: SearchHotelOffersAmadeusTool,
) -> Result<CallToolResult, AppError> {
    let query = build_hotel_offers_query(&params)?;
    let body = state.amadeus.hotel_offers(query).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned {} hotel offers", data_len(&payload)),
        payload,
    ))
}
