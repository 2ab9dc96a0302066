//! Weather tools backed by Open-Meteo.

use rust_mcp_sdk::{macros, schema::CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tools::{error_tool_result, success_tool_result};
use crate::domain::utils::{utc_timestamp, validate_coordinates};
use crate::errors::AppError;
use crate::providers::OPEN_METEO_PROVIDER_LABEL;
use crate::AppState;

// Upstream series name on the left, reported field name on the right.
const HOURLY_SERIES: [(&str, &str); 7] = [
    ("temperature_2m", "temperature_c"),
    ("relative_humidity_2m", "relative_humidity"),
    ("apparent_temperature", "apparent_temperature_c"),
    ("precipitation_probability", "precipitation_probability"),
    ("windspeed_10m", "windspeed_10m"),
    ("winddirection_10m", "winddirection_10m"),
    ("weathercode", "weathercode"),
];

const DAILY_SERIES: [(&str, &str); 6] = [
    ("temperature_2m_max", "temp_max_c"),
    ("temperature_2m_min", "temp_min_c"),
    ("precipitation_sum", "precipitation_sum_mm"),
    ("sunrise", "sunrise"),
    ("sunset", "sunset"),
    ("uv_index_max", "uv_index_max"),
];

#[macros::mcp_tool(
    name = "get_current_conditions",
    description = "🌤️ Get real-time weather conditions for your destination using Open-Meteo."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCurrentConditionsTool {
    pub latitude: f64,
    pub longitude: f64,
}

#[macros::mcp_tool(
    name = "get_weather_forecast",
    description = "🌦️ Plan your trip with detailed weather forecasts using Open-Meteo."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetWeatherForecastTool {
    pub latitude: f64,
    pub longitude: f64,
    pub hourly: Option<bool>,
}

fn build_forecast_query(latitude: f64, longitude: f64, hourly: bool) -> Vec<(String, String)> {
    let mut query = vec![
        ("latitude".to_string(), latitude.to_string()),
        ("longitude".to_string(), longitude.to_string()),
        ("timezone".to_string(), "auto".to_string()),
    ];

    if hourly {
        query.push((
            "hourly".to_string(),
            HOURLY_SERIES
                .iter()
                .map(|(source, _)| *source)
                .collect::<Vec<_>>()
                .join(","),
        ));
    } else {
        query.push((
            "daily".to_string(),
            DAILY_SERIES
                .iter()
                .map(|(source, _)| *source)
                .collect::<Vec<_>>()
                .join(","),
        ));
    }

    query
}

fn current_block(data: &Value) -> Option<&Value> {
    ["current_weather", "current"].iter().find_map(|key| {
        data.get(*key).filter(|value| match value {
            Value::Object(map) => !map.is_empty(),
            Value::Null => false,
            _ => true,
        })
    })
}

fn field(block: &Value, key: &str) -> Value {
    block.get(key).cloned().unwrap_or(Value::Null)
}

// Zips the parallel per-series arrays into one object per period; missing
// or short series yield nulls instead of failing the whole forecast.
fn zip_forecast_periods(
    block: &Value,
    time_key: &'static str,
    series: &[(&str, &str)],
) -> Vec<Value> {
    let times = block
        .get("time")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    times
        .iter()
        .enumerate()
        .map(|(index, time)| {
            let mut period = Map::from_iter([(time_key.to_string(), time.clone())]);
            for (source, target) in series {
                let value = block
                    .get(*source)
                    .and_then(Value::as_array)
                    .and_then(|values| values.get(index))
                    .cloned()
                    .unwrap_or(Value::Null);
                period.insert((*target).to_string(), value);
            }
            Value::Object(period)
        })
        .collect()
}

pub async fn get_current_conditions(
    state: &AppState,
    params: GetCurrentConditionsTool,
) -> Result<CallToolResult, AppError> {
    validate_coordinates(params.latitude, params.longitude)?;

    let query = vec![
        ("latitude".to_string(), params.latitude.to_string()),
        ("longitude".to_string(), params.longitude.to_string()),
        ("current_weather".to_string(), "true".to_string()),
        ("timezone".to_string(), "auto".to_string()),
    ];
    let data = state.weather.fetch(query).await?;

    let Some(current) = current_block(&data) else {
        return Ok(error_tool_result(
            "Current weather not available".to_string(),
        ));
    };

    let payload = json!({
        "coordinates": {"latitude": params.latitude, "longitude": params.longitude},
        "provider": OPEN_METEO_PROVIDER_LABEL,
        "current_conditions": {
            "timestamp": field(current, "time"),
            "temperature_c": field(current, "temperature"),
            "windspeed_kph": field(current, "windspeed"),
            "winddirection_deg": field(current, "winddirection"),
            "is_day": field(current, "is_day"),
            "weathercode": field(current, "weathercode"),
        },
        "search_timestamp": utc_timestamp(),
    });

    Ok(success_tool_result(
        format!(
            "Current conditions at {}, {}",
            params.latitude, params.longitude
        ),
        payload,
    ))
}

pub async fn get_weather_forecast(
    state: &AppState,
    params: GetWeatherForecastTool,
) -> Result<CallToolResult, AppError> {
    validate_coordinates(params.latitude, params.longitude)?;

    let hourly = params.hourly.unwrap_or(false);
    let query = build_forecast_query(params.latitude, params.longitude, hourly);
    let data = state.weather.fetch(query).await?;

    let (block_key, units_key, time_key, series): (_, _, _, &[(&str, &str)]) = if hourly {
        ("hourly", "hourly_units", "time", &HOURLY_SERIES)
    } else {
        ("daily", "daily_units", "date", &DAILY_SERIES)
    };

    let empty = Value::Object(Map::new());
    let block = data.get(block_key).unwrap_or(&empty);
    let periods = zip_forecast_periods(block, time_key, series);
    let units = data.get(units_key).cloned().unwrap_or_else(|| json!({}));

    let forecast_type = if hourly { "hourly" } else { "daily" };
    let returned = periods.len();

    let payload = json!({
        "coordinates": {"latitude": params.latitude, "longitude": params.longitude},
        "provider": OPEN_METEO_PROVIDER_LABEL,
        "forecast_type": forecast_type,
        "forecast_periods": periods,
        "forecast_metadata": {"units": units},
        "search_timestamp": utc_timestamp(),
    });

    Ok(success_tool_result(
        format!("Returned {returned} {forecast_type} forecast periods"),
        payload,
    ))
}
