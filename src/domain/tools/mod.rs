//! Travel tools exposed via Model Context Protocol
//!
//! Fifteen tools across flight, hotel, event, location, weather, and
//! financial search. `handle_tools_call` dispatches by registered tool
//! name; upstream failures become error-flagged tool results rather than
//! JSON-RPC errors.

pub mod events;
pub mod finance;
pub mod flights;
pub mod hotels;
pub mod location;
pub mod weather;

use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::domain::utils::utc_timestamp;
use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::providers::AMADEUS_PROVIDER_LABEL;
use crate::AppState;

use events::{GetActivityDetailsAmadeusTool, SearchActivitiesAmadeusTool, SearchEventsSerpApiTool};
use finance::{ConvertCurrencyTool, LookupStockTool};
use flights::{SearchFlightsAmadeusTool, SearchFlightsSerpApiTool};
use hotels::{
    SearchHotelOffersAmadeusTool, SearchHotelsAmadeusByCityTool, SearchHotelsAmadeusGeocodeTool,
    SearchHotelsSerpApiTool,
};
use location::{CalculateDistanceTool, GeocodeLocationTool};
use weather::{GetCurrentConditionsTool, GetWeatherForecastTool};

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        SearchFlightsSerpApiTool::tool(),
        SearchFlightsAmadeusTool::tool(),
        SearchHotelsSerpApiTool::tool(),
        SearchHotelsAmadeusByCityTool::tool(),
        SearchHotelsAmadeusGeocodeTool::tool(),
        SearchHotelOffersAmadeusTool::tool(),
        SearchEventsSerpApiTool::tool(),
        SearchActivitiesAmadeusTool::tool(),
        GetActivityDetailsAmadeusTool::tool(),
        GeocodeLocationTool::tool(),
        CalculateDistanceTool::tool(),
        GetCurrentConditionsTool::tool(),
        GetWeatherForecastTool::tool(),
        ConvertCurrencyTool::tool(),
        LookupStockTool::tool(),
    ]
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let arguments = json!(tool_call.arguments.unwrap_or_default());
    match tool_call.name.as_str() {
        "search_flights_serpapi" => match parse_arguments(arguments) {
            Ok(args) => respond(id, flights::search_flights_serpapi(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_flights_amadeus" => match parse_arguments(arguments) {
            Ok(args) => respond(id, flights::search_flights_amadeus(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_hotels_serpapi" => match parse_arguments(arguments) {
            Ok(args) => respond(id, hotels::search_hotels_serpapi(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_hotels_amadeus_by_city" => match parse_arguments(arguments) {
            Ok(args) => respond(id, hotels::search_hotels_amadeus_by_city(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_hotels_amadeus_geocode" => match parse_arguments(arguments) {
            Ok(args) => respond(id, hotels::search_hotels_amadeus_geocode(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_hotel_offers_amadeus" => match parse_arguments(arguments) {
            Ok(args) => respond(id, hotels::search_hotel_offers_amadeus(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_events_serpapi" => match parse_arguments(arguments) {
            Ok(args) => respond(id, events::search_events_serpapi(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "search_activities_amadeus" => match parse_arguments(arguments) {
            Ok(args) => respond(id, events::search_activities_amadeus(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "get_activity_details_amadeus" => match parse_arguments(arguments) {
            Ok(args) => respond(id, events::get_activity_details_amadeus(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "geocode_location" => match parse_arguments(arguments) {
            Ok(args) => respond(id, location::geocode_location(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "calculate_distance" => match parse_arguments(arguments) {
            Ok(args) => respond(id, location::calculate_distance(args)),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "get_current_conditions" => match parse_arguments(arguments) {
            Ok(args) => respond(id, weather::get_current_conditions(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "get_weather_forecast" => match parse_arguments(arguments) {
            Ok(args) => respond(id, weather::get_weather_forecast(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "convert_currency" => match parse_arguments(arguments) {
            Ok(args) => respond(id, finance::convert_currency(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        "lookup_stock" => match parse_arguments(arguments) {
            Ok(args) => respond(id, finance::lookup_stock(state, args).await),
            Err(err) => app_error_to_json_rpc(id, err),
        },
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, AppError> {
    serde_json::from_value(arguments).map_err(|err| {
        AppError::bad_request("invalid_arguments", format!("invalid tool arguments: {err}"))
    })
}

fn respond(id: Option<Value>, outcome: Result<CallToolResult, AppError>) -> Value {
    match outcome {
        Ok(result) => json_rpc_result(
            id,
            serde_json::to_value(result).expect("tool result serialization"),
        ),
        Err(err) => tool_error_response(id, err),
    }
}

// Missing per-call credentials and upstream failures are reported in-band
// as error-flagged tool results; everything else stays a JSON-RPC error.
fn tool_error_response(id: Option<Value>, err: AppError) -> Value {
    match err {
        AppError::MissingCredential { .. } => {
            let result = error_tool_result(err.to_string());
            json_rpc_result(
                id,
                serde_json::to_value(result).expect("tool result serialization"),
            )
        }
        AppError::Upstream { message, .. } => {
            let result = error_tool_result(message);
            json_rpc_result(
                id,
                serde_json::to_value(result).expect("tool result serialization"),
            )
        }
        other => app_error_to_json_rpc(id, other),
    }
}

pub(crate) fn success_tool_result(summary: String, payload: Value) -> CallToolResult {
    let structured = match payload {
        Value::Object(map) => map,
        other => Map::from_iter([("data".to_string(), other)]),
    };

    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(summary, None, None))],
        is_error: None,
        meta: None,
        structured_content: Some(structured),
    }
}

pub(crate) fn error_tool_result(message: String) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            message.clone(),
            None,
            None,
        ))],
        is_error: Some(true),
        meta: None,
        structured_content: Some(Map::from_iter([("error".to_string(), json!(message))])),
    }
}

pub(crate) fn decorate_amadeus_payload(body: Value) -> Value {
    let mut map = match body {
        Value::Object(map) => map,
        other => Map::from_iter([("data".to_string(), other)]),
    };
    map.insert("provider".to_string(), json!(AMADEUS_PROVIDER_LABEL));
    map.insert("search_timestamp".to_string(), json!(utc_timestamp()));
    Value::Object(map)
}

pub(crate) fn data_len(payload: &Value) -> usize {
    payload.get("data").and_then(Value::as_array).map_or(0, Vec::len)
}
