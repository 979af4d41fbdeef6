use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::counter_store::CounterStore;
use crate::runtime::contract::{CounterIncrement, ErrorBody, VisitsBody};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Increments the site visit counter and reports the new value.
///
/// The event is not inspected. Store failures are mapped to a 500 response
/// carrying the failure description; this function never fails.
pub fn handle_counter_event(_event: Value, store: &dyn CounterStore) -> ApiGatewayResponse {
    let increment = CounterIncrement::site_visits();

    match store.increment(&increment) {
        Ok(visits) => {
            tracing::info!(
                record_id = %increment.record_id,
                visits,
                "visit counter incremented"
            );
            json_response(200, &VisitsBody { visits })
        }
        Err(error) => {
            tracing::error!(
                record_id = %increment.record_id,
                error = %error,
                "visit counter increment failed"
            );
            json_response(
                500,
                &ErrorBody {
                    error: error.to_string(),
                },
            )
        }
    }
}

fn response_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
    })
}

fn json_response(status_code: u16, payload: &impl Serialize) -> ApiGatewayResponse {
    match serde_json::to_string(payload) {
        Ok(body) => ApiGatewayResponse {
            status_code,
            headers: response_headers(),
            body,
        },
        Err(error) => ApiGatewayResponse {
            status_code: 500,
            headers: response_headers(),
            body: json!({ "error": format!("failed to serialize response body: {error}") })
                .to_string(),
        },
    }
}
