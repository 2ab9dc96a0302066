//! Model Context Protocol prompt catalog
//!
//! Serves the trip planning prompt template rendered from caller-supplied
//! arguments.

use rust_mcp_sdk::schema::{
    ContentBlock, GetPromptResult, Prompt, PromptArgument, PromptMessage, Role, TextContent,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};

pub const TRAVEL_PLANNING_PROMPT_NAME: &str = "travel_planning_prompt";

const TRAVEL_PLANNING_PROMPT_DESCRIPTION: &str =
    "🌟 Your Complete Combined AI Travel Concierge - Trip Planning Assistant";

const PLANNING_GUIDE: &str = "

🎪 **YOUR COMPLETE DUAL-POWERED TRAVEL EXPERIENCE:**

✈️ **PHASE 1: Flight Discovery & Comparison**
   🌐 **Google Flights Search** - Use search_flights_serpapi() for comprehensive consumer flight options
   🏢 **Amadeus Professional Search** - Use search_flights_amadeus() for professional airline inventory
   • Compare results from both systems to find the absolute best deals
   • Access both consumer-friendly Google results AND professional travel agent data
   • Get price insights, schedule optimization, and booking flexibility options

🏨 **PHASE 2: Hotel & Accommodation Discovery**
   🌐 **Google Hotels Search** - Use search_hotels_serpapi() for comprehensive accommodation options
   🏢 **Amadeus Hotel Search** - Use search_hotels_amadeus_by_city() or search_hotels_amadeus_geocode()
   🏨 **Professional Hotel Offers** - Use search_hotel_offers_amadeus() for real-time availability and pricing
   • Access vacation rentals, boutique hotels, and major chains through Google
   • Get professional rates and detailed property information through Amadeus
   • Compare pricing and availability across both platforms

🎭 **PHASE 3: Events & Activities Discovery**
   🌐 **Google Events** - Use search_events_serpapi() for local events, concerts, festivals
   🏢 **Amadeus Activities** - Use search_activities_amadeus() for professional tour operations
   • Find everything from local festivals to professional guided tours
   • Access both consumer events and curated travel experiences

🌍 **PHASE 4: Location Intelligence & Navigation**
   • Use geocode_location() to pinpoint exact coordinates for all destinations
   • Use calculate_distance() to optimize your itinerary and travel routes
   • Map out efficient daily routes between attractions, hotels, and activities

🌦️ **PHASE 5: Weather Intelligence & Activity Planning**
   • Use get_weather_forecast() to understand conditions during your visit
   • Use get_current_conditions() for real-time weather updates
   • Plan activities around optimal weather windows

💰 **PHASE 6: Financial Planning & Currency Strategy**
   • Use convert_currency() for accurate budget planning and expense tracking
   • Use lookup_stock() to monitor travel industry investments if relevant
   • Track exchange rates and optimize currency conversion timing

🎨 **PRESENTATION STYLE**:
Present everything as your expert travel friend who has access to BOTH consumer travel platforms AND professional travel industry systems! Provide detailed comparisons, insider tips, and create comprehensive travel plans.

**AVAILABLE DUAL-PLATFORM TOOLS:**

**✈️ FLIGHT SEARCH:**
- 🌐 search_flights_serpapi() - Google Flights consumer search
- 🏢 search_flights_amadeus() - Amadeus professional GDS search

**🏨 HOTEL SEARCH:**
- 🌐 search_hotels_serpapi() - Google Hotels consumer search
- 🏢 search_hotels_amadeus_by_city() - Amadeus professional city search
- 🏢 search_hotels_amadeus_geocode() - Amadeus professional coordinate search
- 🏢 search_hotel_offers_amadeus() - Amadeus real-time offers and availability

**🎭 EVENTS & ACTIVITIES:**
- 🌐 search_events_serpapi() - Google Events consumer search
- 🏢 search_activities_amadeus() - Amadeus professional activities
- 🏢 get_activity_details_amadeus() - Detailed activity information

**🌍 LOCATION & UTILITIES:**
- geocode_location() - Precise location finding
- calculate_distance() - Route optimization
- get_weather_forecast() - Weather planning
- get_current_conditions() - Real-time weather
- convert_currency() - Financial planning
- lookup_stock() - Travel investment tracking

Let's create your perfect travel experience using BOTH consumer and professional travel platforms! 🌎✨";

#[derive(Debug, Deserialize)]
pub struct PromptGetParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

pub fn build_prompts_list() -> Vec<Prompt> {
    vec![Prompt {
        arguments: vec![
            prompt_argument("destination", true),
            prompt_argument("departure_location", false),
            prompt_argument("travel_dates", false),
            prompt_argument("travelers", false),
            prompt_argument("budget", false),
            prompt_argument("interests", false),
            prompt_argument("travel_style", false),
        ],
        description: Some(TRAVEL_PLANNING_PROMPT_DESCRIPTION.to_string()),
        icons: vec![],
        meta: None,
        name: TRAVEL_PLANNING_PROMPT_NAME.to_string(),
        title: None,
    }]
}

fn prompt_argument(name: &str, required: bool) -> PromptArgument {
    PromptArgument {
        description: None,
        name: name.to_string(),
        required: Some(required),
        title: None,
    }
}

pub fn handle_prompts_get(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let prompt_get: PromptGetParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match prompt_get.name.as_str() {
        TRAVEL_PLANNING_PROMPT_NAME => {
            match render_travel_planning_prompt(&prompt_get.arguments) {
                Ok(text) => {
                    let result = serde_json::to_value(GetPromptResult {
                        description: Some(TRAVEL_PLANNING_PROMPT_DESCRIPTION.to_string()),
                        messages: vec![PromptMessage {
                            content: ContentBlock::from(TextContent::new(text, None, None)),
                            role: Role::User,
                        }],
                        meta: None,
                    })
                    .expect("prompt result serialization");

                    json_rpc_result(id, result)
                }
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "prompt_not_found",
                "message": "unknown prompt name",
                "details": {
                    "name": prompt_get.name,
                },
            })),
        ),
    }
}

pub fn render_travel_planning_prompt(arguments: &Map<String, Value>) -> Result<String, AppError> {
    let destination = arguments
        .get("destination")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::bad_request("missing_argument", "destination argument is required")
        })?;
    let travelers = parse_travelers(arguments)?;

    let mut prompt = format!(
        "🌟 **WELCOME TO YOUR COMBINED TRAVEL CONCIERGE SERVICE** 🌟\n\nI'm your comprehensive AI travel specialist with access to BOTH Google Travel Services AND Amadeus Professional Systems! Let me plan your perfect journey to {destination}"
    );

    if let Some(departure_location) = optional_text(arguments, "departure_location") {
        prompt.push_str(&format!(" from {departure_location}"));
    }

    if let Some(travel_dates) = optional_text(arguments, "travel_dates") {
        prompt.push_str(&format!(" for {travel_dates}"));
    }

    let plural = if travelers != 1 { "s" } else { "" };
    prompt.push_str(&format!(" for {travelers} traveler{plural}."));

    if let Some(budget) = optional_text(arguments, "budget") {
        prompt.push_str(&format!("\n💰 **Budget**: {budget}"));
    }

    if let Some(interests) = optional_text(arguments, "interests") {
        prompt.push_str(&format!("\n🎯 **Your Interests**: {interests}"));
    }

    if let Some(travel_style) = optional_text(arguments, "travel_style") {
        prompt.push_str(&format!("\n✈️ **Travel Style**: {travel_style}"));
    }

    prompt.push_str(PLANNING_GUIDE);

    Ok(prompt)
}

fn optional_text<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn parse_travelers(arguments: &Map<String, Value>) -> Result<i64, AppError> {
    let Some(value) = arguments.get("travelers") else {
        return Ok(1);
    };

    let parsed = match value {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        AppError::bad_request("invalid_travelers", "travelers must be a whole number")
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::{
        build_prompts_list, handle_prompts_get, render_travel_planning_prompt,
        TRAVEL_PLANNING_PROMPT_NAME,
    };

    fn arguments(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn catalog_lists_the_planning_prompt_with_required_destination() {
        let prompts = build_prompts_list();

        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].name, TRAVEL_PLANNING_PROMPT_NAME);

        let destination = prompts[0]
            .arguments
            .iter()
            .find(|argument| argument.name == "destination")
            .expect("destination argument");
        assert_eq!(destination.required, Some(true));
    }

    #[test]
    fn minimal_render_defaults_to_one_traveler() {
        let rendered =
            render_travel_planning_prompt(&arguments(&[("destination", json!("Tokyo"))]))
                .expect("prompt should render");

        assert!(rendered.contains("journey to Tokyo for 1 traveler."));
        assert!(!rendered.contains(" from "));
        assert!(!rendered.contains("**Budget**"));
    }

    #[test]
    fn full_render_includes_every_detail_line() {
        let rendered = render_travel_planning_prompt(&arguments(&[
            ("destination", json!("Lisbon")),
            ("departure_location", json!("Boston")),
            ("travel_dates", json!("June 2026")),
            ("travelers", json!("2")),
            ("budget", json!("$4000")),
            ("interests", json!("food, surfing")),
            ("travel_style", json!("relaxed")),
        ]))
        .expect("prompt should render");

        assert!(rendered.contains("journey to Lisbon from Boston for June 2026 for 2 travelers."));
        assert!(rendered.contains("\n💰 **Budget**: $4000"));
        assert!(rendered.contains("\n🎯 **Your Interests**: food, surfing"));
        assert!(rendered.contains("\n✈️ **Travel Style**: relaxed"));
    }

    #[test]
    fn traveler_counts_accept_numbers_and_numeric_strings() {
        let from_number = render_travel_planning_prompt(&arguments(&[
            ("destination", json!("Oslo")),
            ("travelers", json!(4)),
        ]))
        .expect("prompt should render");
        assert!(from_number.contains("for 4 travelers."));

        let error = render_travel_planning_prompt(&arguments(&[
            ("destination", json!("Oslo")),
            ("travelers", json!("a few")),
        ]))
        .expect_err("non-numeric travelers must fail");
        assert!(error.to_string().contains("travelers"));
    }

    #[test]
    fn missing_destination_is_rejected() {
        let error = render_travel_planning_prompt(&arguments(&[("travelers", json!(2))]))
            .expect_err("destination is required");
        assert!(error.to_string().contains("destination"));
    }

    #[test]
    fn guide_names_only_registered_tools() {
        let rendered =
            render_travel_planning_prompt(&arguments(&[("destination", json!("Quito"))]))
                .expect("prompt should render");

        assert!(rendered.contains("search_activities_amadeus()"));
        assert!(rendered.contains("search_hotels_amadeus_geocode()"));
        assert!(!rendered.contains("search_tours_activities_amadeus"));
        assert!(!rendered.contains("search_hotels_amadeus_by_geocode"));
    }

    #[test]
    fn unknown_prompt_names_are_reported_with_a_code() {
        let response = handle_prompts_get(
            Some(json!(7)),
            Some(json!({"name": "packing_checklist_prompt"})),
        );

        assert_eq!(response["error"]["code"], json!(-32601));
        assert_eq!(response["error"]["data"]["code"], json!("prompt_not_found"));
        assert_eq!(
            response["error"]["data"]["details"]["name"],
            json!("packing_checklist_prompt")
        );
    }

    #[test]
    fn prompts_get_requires_params() {
        let response = handle_prompts_get(Some(json!(8)), None);
        assert_eq!(response["error"]["code"], json!(-32602));
    }
}
