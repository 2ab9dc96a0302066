//! Model Context Protocol static resource providers
//!
//! Exposes the capabilities guide as a markdown resource under the
//! `travel://` URI scheme.

use rust_mcp_sdk::schema::{
    ReadResourceContent, ReadResourceRequestParams, ReadResourceResult, Resource,
    TextResourceContents,
};
use serde_json::{json, Value};

use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};

pub const CAPABILITIES_RESOURCE_URI: &str = "travel://combined/capabilities";

const CAPABILITIES_GUIDE: &str = r#"# 🌟 Combined Travel Concierge Server - Complete Capabilities Guide

## Overview
This combined server integrates the best of both consumer travel platforms (Google via SerpAPI) AND professional travel industry systems (Amadeus GDS) into one powerful platform, providing unparalleled travel planning assistance.

## ✈️ Dual Flight Search Services

### 🌐 Consumer Flight Search (Google Flights via SerpAPI)
**Tool:** `search_flights_serpapi()`
- Access Google's comprehensive flight database
- Consumer-friendly pricing and schedule display
- Price insights and trend analysis
- Multi-airline comparison with popular routes
- Family-friendly search with children and infant options

### 🏢 Professional Flight Search (Amadeus GDS)
**Tool:** `search_flights_amadeus()`
- Professional travel agent inventory access
- Real-time airline seat availability
- Detailed fare class information
- Professional booking codes and restrictions
- Advanced filtering by airline preferences

**Combined Benefits:**
- Compare consumer vs. professional pricing
- Access both popular routes AND hidden inventory
- Get comprehensive view of all available options
- Professional insights with consumer-friendly presentation

## 🏨 Comprehensive Hotel Services

### 🌐 Consumer Hotel Search (Google Hotels via SerpAPI)
**Tool:** `search_hotels_serpapi()`
- Vacation rentals, boutique hotels, major chains
- Consumer reviews and ratings
- Special offers and package deals
- Family-friendly filtering with children's ages
- Flexible cancellation and booking options

### 🏢 Professional Hotel Search (Amadeus GDS)
**Tools:**
- `search_hotels_amadeus_by_city()` - City-based professional search
- `search_hotels_amadeus_geocode()` - Coordinate-based search
- `search_hotel_offers_amadeus()` - Real-time availability and pricing

**Professional Features:**
- Travel industry rates and inventory
- Real-time room availability
- Professional booking codes
- Detailed property amenities and chain information
- Business travel optimized results

## 🎭 Dual Event & Activity Discovery

### 🌐 Consumer Events (Google Events via SerpAPI)
**Tool:** `search_events_serpapi()`
- Local festivals, concerts, exhibitions
- Consumer-friendly event discovery
- Popular attractions and entertainment
- Virtual events and online experiences

### 🏢 Professional Activities (Amadeus GDS)
**Tools:**
- `search_activities_amadeus()` - Professional tour operations
- `get_activity_details_amadeus()` - Detailed activity information

**Professional Features:**
- Curated tour operators and experiences
- Professional activity bookings
- Verified experience providers
- Detailed scheduling and requirements

## 🌍 Location Intelligence Services
**Tools Available:**
- `geocode_location()` - Convert addresses/places to coordinates
- `calculate_distance()` - Measure distances between locations

**Capabilities:**
- Precise location identification worldwide
- Distance calculations for route optimization
- Multi-language location details
- Address detail breakdown

## 🌦️ Weather Intelligence Service
**Tools Available:**
- `get_weather_forecast()` - Detailed weather forecasts
- `get_current_conditions()` - Real-time weather data

**Capabilities:**
- Daily and hourly weather forecasts using Open-Meteo
- Current temperature, humidity, wind conditions
- Activity planning based on weather conditions
- Travel safety considerations

## 💰 Financial Services
**Tools Available:**
- `convert_currency()` - Real-time currency conversion via ExchangeRate-API
- `lookup_stock()` - Travel industry stock monitoring via Google Finance

**Capabilities:**
- Real-time exchange rates for international travel
- Travel industry investment tracking
- Budget planning assistance across currencies
- Financial market insights for travel investments

## 🎯 Unified Planning Advantages

**Dual Platform Benefits:**
- **Best Price Discovery**: Compare consumer vs. professional rates
- **Maximum Inventory Access**: See both popular and hidden options
- **Professional + Consumer Insights**: Get industry knowledge with user-friendly presentation
- **Comprehensive Coverage**: Access the widest range of travel options available
- **Redundancy & Reliability**: If one platform has issues, the other provides backup

**Integration Benefits:**
- Single server handles all travel needs across multiple platforms
- Coordinated data sharing between consumer and professional services
- Unified error handling and comprehensive reporting
- Consistent API responses across all services

## 🔧 Technical Specifications

**Required Environment Variables:**
- `SERPAPI_KEY` - Required for Google Flights, Hotels, Events, and Finance services
- `AMADEUS_API_KEY` - Required for Amadeus professional services
- `AMADEUS_API_SECRET` - Required for Amadeus professional services
- `EXCHANGE_RATE_API_KEY` - Required for currency conversion services

**Upstream Services:**
- SerpAPI (Google Flights, Hotels, Events, and Finance data)
- Amadeus Self-Service APIs (professional GDS inventory)
- Open-Meteo (weather forecasts)
- ExchangeRate-API (currency conversion)
- Nominatim / OpenStreetMap (geocoding)

**Error Handling:**
- Graceful API failure handling across all platforms
- Fallback mechanisms between consumer and professional services
- Comprehensive error reporting with platform identification
- Timeout management and rate limiting compliance

## 🚀 Getting Started

1. **Set Environment Variables:**
   ```bash
   export SERPAPI_KEY="your-serpapi-key"
   export AMADEUS_API_KEY="your-amadeus-client-id"
   export AMADEUS_API_SECRET="your-amadeus-client-secret"
   export EXCHANGE_RATE_API_KEY="your-exchangerate-api-key"
   ```

2. **Run the Combined Server:**
   ```bash
   travel-concierge-mcp
   ```

3. **Use the Comprehensive Planning Prompt:**
   Start with `travel_planning_prompt()` for full dual-platform trip planning assistance.

## 🌟 Best Practices for Dual-Platform Usage

**Flight Search Strategy:**
1. Start with Google Flights (search_flights_serpapi) for broad market overview
2. Use Amadeus (search_flights_amadeus) for professional options and detailed fare information
3. Compare results to find the absolute best deals and options

**Hotel Search Strategy:**
1. Use Google Hotels (search_hotels_serpapi) for vacation rentals and consumer-friendly options
2. Use Amadeus hotel searches for professional rates and detailed property information
3. Cross-reference availability and pricing across both platforms

**Activity Planning Strategy:**
1. Use Google Events (search_events_serpapi) for local cultural events and festivals
2. Use Amadeus Activities for professional tours and curated experiences
3. Combine both for comprehensive activity planning

**Location & Weather Integration:**
- Always start with geocoding to establish precise coordinates
- Use weather forecasts to optimize activity and travel planning
- Calculate distances to optimize daily itineraries

**Financial Planning:**
- Use currency conversion for accurate international budget planning
- Monitor travel industry stocks for investment insights
- Track exchange rates for optimal conversion timing

This combined server provides the most comprehensive travel planning capabilities available, leveraging both consumer platforms and professional travel industry systems! 🌎✈️🏨🎭💰"#;

pub fn build_resources_list() -> Vec<Resource> {
    vec![Resource {
        annotations: None,
        description: Some(
            "🌟 Complete Guide to Your Combined Travel Concierge Server Capabilities".to_string(),
        ),
        icons: vec![],
        meta: None,
        mime_type: Some("text/markdown".to_string()),
        name: "Travel Concierge Capabilities".to_string(),
        size: None,
        title: None,
        uri: CAPABILITIES_RESOURCE_URI.to_string(),
    }]
}

pub fn handle_resources_read(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match resource_read.uri.as_str() {
        CAPABILITIES_RESOURCE_URI => {
            let result = serde_json::to_value(ReadResourceResult {
                contents: vec![ReadResourceContent::from(TextResourceContents {
                    meta: None,
                    mime_type: Some("text/markdown".to_string()),
                    text: CAPABILITIES_GUIDE.to_string(),
                    uri: CAPABILITIES_RESOURCE_URI.to_string(),
                })],
                meta: None,
            })
            .expect("read capabilities result serialization");

            json_rpc_result(id, result)
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "resource_not_found",
                "message": "unknown resource uri",
                "details": {
                    "uri": resource_read.uri,
                },
            })),
        ),
    }
}
