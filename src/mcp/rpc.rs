//! JSON-RPC protocol representations and formatting utilities
//!
//! Provides standardized mapping of internal AppErrors to valid JSON-RPC payloads.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};

use crate::errors::AppError;

pub fn is_json_rpc_error(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn app_error_to_json_rpc(id: Option<Value>, err: AppError) -> Value {
    match err {
        AppError::BadRequest { code, message } => json_rpc_error_with_data(
            id,
            -32602,
            "Invalid params",
            Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
        ),
        AppError::Unauthorized { code, message } => json_rpc_error_with_data(
            id,
            -32001,
            "Unauthorized",
            Some(json!({
                "code": code,
                "message": message,
                "details": {}
            })),
        ),
        AppError::MissingCredential { .. } | AppError::Upstream { .. } | AppError::Internal { .. } => {
            json_rpc_error(id, -32603, "Internal error")
        }
    }
}

pub fn json_rpc_error(id: Option<Value>, code: i32, message: &str) -> Value {
    json_rpc_error_with_data(id, code, message, None)
}

pub fn json_rpc_error_with_data(
    id: Option<Value>,
    code: i32,
    message: &str,
    data: Option<Value>,
) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

pub fn json_rpc_result(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{app_error_to_json_rpc, is_json_rpc_error, json_rpc_result};
    use crate::errors::AppError;

    #[test]
    fn results_echo_integer_and_string_ids() {
        let by_number = json_rpc_result(Some(json!(12)), json!({"ok": true}));
        assert_eq!(by_number["jsonrpc"], json!("2.0"));
        assert_eq!(by_number["id"], json!(12));
        assert_eq!(by_number["result"]["ok"], json!(true));

        let by_string = json_rpc_result(Some(json!("req-1")), json!({"ok": true}));
        assert_eq!(by_string["id"], json!("req-1"));
    }

    #[test]
    fn bad_requests_become_invalid_params_with_data() {
        let response = app_error_to_json_rpc(
            Some(json!(1)),
            AppError::bad_request("invalid_date", "outbound_date must be formatted as YYYY-MM-DD"),
        );

        assert_eq!(response["error"]["code"], json!(-32602));
        assert_eq!(response["error"]["message"], json!("Invalid params"));
        assert_eq!(response["error"]["data"]["code"], json!("invalid_date"));
        assert!(is_json_rpc_error(&response));
    }

    #[test]
    fn unauthorized_errors_use_the_server_error_range() {
        let response = app_error_to_json_rpc(
            Some(json!(2)),
            AppError::unauthorized("invalid_token", "invalid or missing bearer token"),
        );

        assert_eq!(response["error"]["code"], json!(-32001));
        assert_eq!(response["error"]["data"]["code"], json!("invalid_token"));
    }

    #[test]
    fn upstream_failures_do_not_leak_details() {
        let response = app_error_to_json_rpc(
            Some(json!(3)),
            AppError::upstream("Amadeus GDS", "token request returned 500"),
        );

        assert_eq!(response["error"]["code"], json!(-32603));
        assert_eq!(response["error"]["message"], json!("Internal error"));
        assert_eq!(response["error"].get("data"), None);
    }
}
