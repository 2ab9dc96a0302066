//! Event and activity discovery tools
//!
//! Google Events through SerpAPI plus the Amadeus tours & activities
//! catalog (area search and single-activity lookup).

use rust_mcp_sdk::{macros, schema::CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tools::{data_len, decorate_amadeus_payload, success_tool_result};
use crate::domain::utils::{
    normalize_results_limit, object_or_empty, require_non_empty, truncated_array, utc_timestamp,
    validate_coordinates, validate_radius_unit, DEFAULT_EVENT_RESULTS,
};
use crate::errors::AppError;
use crate::providers::SerpApiEngine;
use crate::AppState;

const DATE_FILTERS: [&str; 7] = [
    "today",
    "tomorrow",
    "week",
    "weekend",
    "next_week",
    "month",
    "next_month",
];

#[macros::mcp_tool(
    name = "search_events_serpapi",
    description = "🎭 Discover amazing experiences and events using Google Events! Your AI travel concierge will find the perfect activities, shows, festivals, and cultural experiences to enrich your journey."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct SearchEventsSerpApiTool {
    pub query: String,
    pub location: Option<String>,
    pub date_filter: Option<String>,
    pub event_type: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub max_results: Option<u32>,
}

// Field names follow the Amadeus API query parameters, which are part of
// the published tool contract.
#[macros::mcp_tool(
    name = "search_activities_amadeus",
    description = "🎭 Discover amazing tours and activities using Amadeus! Find tours, attractions, and unique experiences to make your trip unforgettable."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct SearchActivitiesAmadeusTool {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<u32>,
    pub radiusUnit: Option<String>,
}

#[macros::mcp_tool(
    name = "get_activity_details_amadeus",
    description = "🎆 Get complete details about a specific activity using Amadeus! Perfect for when you've found something interesting and want full information before booking."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[allow(non_snake_case)]
pub struct GetActivityDetailsAmadeusTool {
    pub activityId: String,
}

#[derive(Debug)]
struct EventQuery {
    query: Vec<(String, String)>,
    metadata: Map<String, Value>,
    limit: usize,
}

fn build_events_query(params: &SearchEventsSerpApiTool) -> Result<EventQuery, AppError> {
    let base_query = require_non_empty(&params.query, "query")?;

    if let Some(filter) = params.date_filter.as_deref() {
        if !DATE_FILTERS.contains(&filter) {
            return Err(AppError::bad_request(
                "invalid_date_filter",
                "date_filter must be one of: today, tomorrow, week, weekend, next_week, month, next_month",
            ));
        }
    }

    let language = params.language.clone().unwrap_or_else(|| "en".to_string());
    let country = params.country.clone().unwrap_or_else(|| "us".to_string());
    let limit = normalize_results_limit(params.max_results, DEFAULT_EVENT_RESULTS)?;

    let search_query = match params
        .location
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(location) => format!("{base_query} in {location}"),
        None => base_query.clone(),
    };

    let mut query = vec![
        ("q".to_string(), search_query),
        ("hl".to_string(), language.clone()),
        ("gl".to_string(), country.clone()),
    ];

    // Date and event-type chips share one htichips parameter.
    let mut chips = Vec::new();
    if let Some(filter) = &params.date_filter {
        chips.push(format!("date:{filter}"));
    }
    if let Some(event_type) = params
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        chips.push(format!("event_type:{event_type}"));
    }
    if !chips.is_empty() {
        query.push(("htichips".to_string(), chips.join(",")));
    }

    let metadata = Map::from_iter([
        ("query".to_string(), json!(base_query)),
        ("location".to_string(), json!(params.location)),
        ("date_filter".to_string(), json!(params.date_filter)),
        ("event_type".to_string(), json!(params.event_type)),
        ("language".to_string(), json!(language)),
        ("country".to_string(), json!(country)),
    ]);

    Ok(EventQuery {
        query,
        metadata,
        limit,
    })
}

fn build_activities_query(
    params: &SearchActivitiesAmadeusTool,
) -> Result<Vec<(String, String)>, AppError> {
    validate_coordinates(params.latitude, params.longitude)?;

    let radius = params.radius.unwrap_or(1);
    let radius_unit = params.radiusUnit.clone().unwrap_or_else(|| "KM".to_string());
    validate_radius_unit(&radius_unit)?;

    Ok(vec![
        ("latitude".to_string(), params.latitude.to_string()),
        ("longitude".to_string(), params.longitude.to_string()),
        ("radius".to_string(), radius.to_string()),
        ("radiusUnit".to_string(), radius_unit),
    ])
}

pub async fn search_events_serpapi(
    state: &AppState,
    params: SearchEventsSerpApiTool,
) -> Result<CallToolResult, AppError> {
    let plan = build_events_query(&params)?;

    let event_data = state
        .serpapi
        .search(SerpApiEngine::GoogleEvents, plan.query)
        .await?;

    let events = truncated_array(&event_data, "events_results", plan.limit);
    let returned = events.as_array().map_or(0, Vec::len);

    let mut metadata = plan.metadata;
    metadata.insert("search_timestamp".to_string(), json!(utc_timestamp()));

    let payload = json!({
        "provider": SerpApiEngine::GoogleEvents.provider_label(),
        "search_metadata": metadata,
        "events": events,
        "search_parameters": object_or_empty(&event_data, "search_parameters"),
    });

    Ok(success_tool_result(
        format!("Found {returned} events"),
        payload,
    ))
}

pub async fn search_activities_amadeus(
    state: &AppState,
    params: SearchActivitiesAmadeusTool,
) -> Result<CallToolResult, AppError> {
    let query = build_activities_query(&params)?;
    let body = state.amadeus.activities(query).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned {} activities", data_len(&payload)),
        payload,
    ))
}

pub async fn get_activity_details_amadeus(
    state: &AppState,
    params: GetActivityDetailsAmadeusTool,
) -> Result<CallToolResult, AppError> {
    let activity_id = require_non_empty(&params.activityId, "activityId")?;
    let body = state.amadeus.activity_by_id(&activity_id).await?;
    let payload = decorate_amadeus_payload(body);

    Ok(success_tool_result(
        format!("Returned details for activity {activity_id}"),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{
        build_activities_query, build_events_query, SearchActivitiesAmadeusTool,
        SearchEventsSerpApiTool,
    };

    fn events_params() -> SearchEventsSerpApiTool {
        SearchEventsSerpApiTool {
            query: "concerts".to_string(),
            location: None,
            date_filter: None,
            event_type: None,
            language: None,
            country: None,
            max_results: None,
        }
    }

    #[test]
    fn location_is_appended_to_the_search_query() {
        let mut params = events_params();
        params.location = Some("Austin TX".to_string());

        let plan = build_events_query(&params).expect("query should build");

        assert!(plan
            .query
            .contains(&("q".to_string(), "concerts in Austin TX".to_string())));
        assert_eq!(plan.metadata["query"], json!("concerts"));
    }

    #[test]
    fn both_filter_chips_share_one_parameter() {
        let mut params = events_params();
        params.date_filter = Some("weekend".to_string());
        params.event_type = Some("Virtual-Event".to_string());

        let plan = build_events_query(&params).expect("query should build");

        assert!(plan.query.contains(&(
            "htichips".to_string(),
            "date:weekend,event_type:Virtual-Event".to_string()
        )));
    }

    #[test]
    fn no_chips_means_no_htichips_parameter() {
        let plan = build_events_query(&events_params()).expect("query should build");
        assert!(!plan.query.iter().any(|(key, _)| key == "htichips"));
    }

    #[test]
    fn rejects_unknown_date_filter() {
        let mut params = events_params();
        params.date_filter = Some("someday".to_string());

        let error = build_events_query(&params).expect_err("expected invalid filter");
        assert!(error.to_string().contains("date_filter"));
    }

    #[test]
    fn activities_default_to_one_kilometer() {
        let params = SearchActivitiesAmadeusTool {
            latitude: 48.8566,
            longitude: 2.3522,
            radius: None,
            radiusUnit: None,
        };

        let query = build_activities_query(&params).expect("query should build");

        assert!(query.contains(&("radius".to_string(), "1".to_string())));
        assert!(query.contains(&("radiusUnit".to_string(), "KM".to_string())));
    }

    #[test]
    fn activities_reject_bad_coordinates() {
        let params = SearchActivitiesAmadeusTool {
            latitude: 48.8566,
            longitude: 200.0,
            radius: None,
            radiusUnit: None,
        };

        let error = build_activities_query(&params).expect_err("expected invalid longitude");
        assert!(error.to_string().contains("longitude"));
    }
}
