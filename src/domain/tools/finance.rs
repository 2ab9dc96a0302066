//! Financial tools: currency conversion and stock quotes.

use rust_mcp_sdk::{macros, schema::CallToolResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::tools::{error_tool_result, success_tool_result};
use crate::domain::utils::{
    array_or_empty, normalize_currency_code, object_or_empty, require_non_empty, round2,
    utc_timestamp,
};
use crate::errors::AppError;
use crate::providers::{SerpApiEngine, EXCHANGE_RATE_PROVIDER_LABEL};
use crate::AppState;

const STOCK_WINDOWS: [&str; 7] = ["1D", "5D", "1M", "6M", "1Y", "5Y", "MAX"];

#[macros::mcp_tool(
    name = "convert_currency",
    description = "💱 Real-time currency conversion using ExchangeRate-API."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ConvertCurrencyTool {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Option<f64>,
    /// Unused; kept for compatibility.
    pub language: Option<String>,
}

#[macros::mcp_tool(
    name = "lookup_stock",
    description = "📈 Track travel investments and monitor travel-related stocks! Stay informed about airline stocks, hotel chains, travel companies, and tourism-related investments."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct LookupStockTool {
    pub symbol: String,
    pub exchange: Option<String>,
    pub window: Option<String>,
    pub language: Option<String>,
}

enum ConversionOutcome {
    Converted(Value),
    Failed(String),
}

fn rate_value(data: &Value) -> Option<f64> {
    match data.get("conversion_rate")? {
        Value::String(text) => text.parse().ok(),
        other => other.as_f64(),
    }
}

fn build_conversion_payload(from: &str, to: &str, amount: f64, data: &Value) -> ConversionOutcome {
    if data.get("result").and_then(Value::as_str) != Some("success") {
        let message = data
            .get("error-type")
            .and_then(Value::as_str)
            .unwrap_or("ExchangeRate-API error")
            .to_string();
        return ConversionOutcome::Failed(message);
    }

    let Some(rate) = rate_value(data) else {
        return ConversionOutcome::Failed("Conversion rate not available".to_string());
    };

    let converted_amount = round2(amount * rate);

    ConversionOutcome::Converted(json!({
        "search_metadata": {
            "from_currency": from,
            "to_currency": to,
            "amount": amount,
            "search_timestamp": utc_timestamp(),
            "provider": EXCHANGE_RATE_PROVIDER_LABEL,
        },
        "exchange_rate": data.get("conversion_rate").cloned().unwrap_or(Value::Null),
        "conversion": {
            "original_amount": amount,
            "converted_amount": converted_amount,
            "rate": data.get("conversion_rate").cloned().unwrap_or(Value::Null),
        },
    }))
}

#[derive(Debug)]
struct StockQuery {
    query: Vec<(String, String)>,
    metadata: Map<String, Value>,
    symbol: String,
}

fn build_stock_query(params: &LookupStockTool) -> Result<StockQuery, AppError> {
    let symbol = require_non_empty(&params.symbol, "symbol")?.to_ascii_uppercase();

    if let Some(window) = params.window.as_deref() {
        if !STOCK_WINDOWS.contains(&window) {
            return Err(AppError::bad_request(
                "invalid_window",
                "window must be one of: 1D, 5D, 1M, 6M, 1Y, 5Y, MAX",
            ));
        }
    }

    let language = params.language.clone().unwrap_or_else(|| "en".to_string());
    let search_query = match params
        .exchange
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(exchange) => format!("{symbol}:{}", exchange.to_ascii_uppercase()),
        None => symbol.clone(),
    };

    let mut query = vec![
        ("q".to_string(), search_query),
        ("hl".to_string(), language.clone()),
    ];
    if let Some(window) = &params.window {
        query.push(("window".to_string(), window.clone()));
    }

    let metadata = Map::from_iter([
        ("symbol".to_string(), json!(symbol)),
        ("exchange".to_string(), json!(params.exchange)),
        ("window".to_string(), json!(params.window)),
        ("language".to_string(), json!(language)),
    ]);

    Ok(StockQuery {
        query,
        metadata,
        symbol,
    })
}

pub async fn convert_currency(
    state: &AppState,
    params: ConvertCurrencyTool,
) -> Result<CallToolResult, AppError> {
    let from = normalize_currency_code(&params.from_currency, "from_currency")?;
    let to = normalize_currency_code(&params.to_currency, "to_currency")?;

    let amount = params.amount.unwrap_or(1.0);
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::bad_request(
            "invalid_amount",
            "amount must be a non-negative number",
        ));
    }

    let data = state.exchange_rates.pair_rate(&from, &to).await?;

    match build_conversion_payload(&from, &to, amount, &data) {
        ConversionOutcome::Converted(payload) => {
            let converted = payload["conversion"]["converted_amount"]
                .as_f64()
                .unwrap_or(0.0);
            Ok(success_tool_result(
                format!("{amount} {from} = {converted} {to}"),
                payload,
            ))
        }
        ConversionOutcome::Failed(message) => Ok(error_tool_result(message)),
    }
}

pub async fn lookup_stock(
    state: &AppState,
    params: LookupStockTool,
) -> Result<CallToolResult, AppError> {
    let plan = build_stock_query(&params)?;

    let finance_data = state
        .serpapi
        .search(SerpApiEngine::GoogleFinance, plan.query)
        .await?;

    let mut metadata = plan.metadata;
    metadata.insert("search_timestamp".to_string(), json!(utc_timestamp()));

    let payload = json!({
        "search_metadata": metadata,
        "stock_info": object_or_empty(&finance_data, "summary"),
        "price_movement": object_or_empty(&finance_data, "price_movement"),
        "historical_data": array_or_empty(&finance_data, "historical_data"),
        "news": array_or_empty(&finance_data, "news"),
    });

    Ok(success_tool_result(
        format!("Retrieved quote for {}", plan.symbol),
        payload,
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_conversion_payload, build_stock_query, ConversionOutcome, LookupStockTool};

    fn stock_params() -> LookupStockTool {
        LookupStockTool {
            symbol: "dal".to_string(),
            exchange: None,
            window: None,
            language: None,
        }
    }

    #[test]
    fn conversion_rounds_to_two_decimals() {
        let data = json!({"result": "success", "conversion_rate": 0.9177});

        let outcome = build_conversion_payload("USD", "EUR", 150.0, &data);
        let ConversionOutcome::Converted(payload) = outcome else {
            panic!("expected converted payload");
        };

        assert_eq!(payload["conversion"]["converted_amount"], json!(137.66));
        assert_eq!(payload["exchange_rate"], json!(0.9177));
        assert_eq!(
            payload["search_metadata"]["provider"],
            json!("exchangerate-api")
        );
    }

    #[test]
    fn upstream_reported_errors_become_failures() {
        let data = json!({"result": "error", "error-type": "unsupported-code"});

        let outcome = build_conversion_payload("USD", "EUR", 1.0, &data);
        let ConversionOutcome::Failed(message) = outcome else {
            panic!("expected failure");
        };

        assert_eq!(message, "unsupported-code");
    }

    #[test]
    fn missing_rate_is_reported() {
        let data = json!({"result": "success"});

        let outcome = build_conversion_payload("USD", "EUR", 1.0, &data);
        let ConversionOutcome::Failed(message) = outcome else {
            panic!("expected failure");
        };

        assert_eq!(message, "Conversion rate not available");
    }

    #[test]
    fn stock_queries_uppercase_symbol_and_exchange() {
        let mut params = stock_params();
        params.exchange = Some("nasdaq".to_string());

        let plan = build_stock_query(&params).expect("query should build");

        assert!(plan
            .query
            .contains(&("q".to_string(), "DAL:NASDAQ".to_string())));
        assert_eq!(plan.metadata["symbol"], json!("DAL"));
        assert_eq!(plan.metadata["exchange"], json!("nasdaq"));
    }

    #[test]
    fn stock_window_is_optional_but_validated() {
        let mut params = stock_params();
        params.window = Some("2W".to_string());

        let error = build_stock_query(&params).expect_err("expected invalid window");
        assert!(error.to_string().contains("window"));

        params.window = Some("1Y".to_string());
        let plan = build_stock_query(&params).expect("query should build");
        assert!(plan
            .query
            .contains(&("window".to_string(), "1Y".to_string())));
    }
}
