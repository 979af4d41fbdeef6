//! DynamoDB implementation of [`CounterStore`].
//!
//! The increment is a single `UpdateItem` call whose update expression
//! initializes the attribute when absent, so no separate provisioning of the
//! record is needed. The table itself must already exist.

use std::collections::HashMap;

use aws_config::SdkConfig;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use crate::adapters::counter_store::{CounterStore, StoreError};
use crate::runtime::contract::{
    CounterIncrement, COUNTER_PARTITION_KEY, COUNT_NAME_PLACEHOLDER, START_VALUE_PLACEHOLDER,
    STEP_VALUE_PLACEHOLDER,
};

#[derive(Debug, Clone)]
pub struct DynamoDbCounterStore {
    client: Client,
    table_name: String,
}

impl DynamoDbCounterStore {
    pub fn new(aws_config: &SdkConfig, table_name: impl Into<String>) -> Self {
        Self::from_client(Client::new(aws_config), table_name)
    }

    pub fn from_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

impl CounterStore for DynamoDbCounterStore {
    fn increment(&self, increment: &CounterIncrement) -> Result<u64, StoreError> {
        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                self.client
                    .update_item()
                    .table_name(&self.table_name)
                    .key(
                        COUNTER_PARTITION_KEY,
                        AttributeValue::S(increment.record_id.clone()),
                    )
                    .update_expression(increment.update_expression())
                    .expression_attribute_names(COUNT_NAME_PLACEHOLDER, &increment.attribute)
                    .expression_attribute_values(
                        START_VALUE_PLACEHOLDER,
                        AttributeValue::N(increment.start.to_string()),
                    )
                    .expression_attribute_values(
                        STEP_VALUE_PLACEHOLDER,
                        AttributeValue::N(increment.step.to_string()),
                    )
                    .return_values(ReturnValue::UpdatedNew)
                    .send()
                    .await
                    .map_err(|error| {
                        tracing::error!(
                            table_name = %self.table_name,
                            error = %DisplayErrorContext(&error),
                            "dynamodb update_item failed"
                        );
                        StoreError::Request(describe_update_error(&error))
                    })
            })
        })?;

        updated_count(output.attributes(), &increment.attribute)
    }
}

/// One-line failure description: `"{code}: {message}"` for service errors,
/// the SDK's own summary for dispatch, timeout and response failures.
fn describe_update_error<R>(error: &SdkError<UpdateItemError, R>) -> String {
    error
        .as_service_error()
        .and_then(|service_error| {
            service_error_description(service_error.code(), service_error.message())
        })
        .unwrap_or_else(|| error.to_string())
}

fn service_error_description(code: Option<&str>, message: Option<&str>) -> Option<String> {
    match (code, message) {
        (Some(code), Some(message)) => Some(format!("{code}: {message}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Reads the post-update counter value out of an `UPDATED_NEW` attribute map.
pub fn updated_count(
    attributes: Option<&HashMap<String, AttributeValue>>,
    attribute: &str,
) -> Result<u64, StoreError> {
    let value = attributes
        .and_then(|values| values.get(attribute))
        .ok_or_else(|| StoreError::MissingAttribute(attribute.to_string()))?;

    let number = value.as_n().map_err(|other| StoreError::MalformedAttribute {
        attribute: attribute.to_string(),
        value: format!("{other:?}"),
    })?;

    number
        .trim()
        .parse::<u64>()
        .map_err(|_| StoreError::MalformedAttribute {
            attribute: attribute.to_string(),
            value: number.clone(),
        })
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::config::http::{HttpRequest, HttpResponse};
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_runtime_api::http::StatusCode;
    use aws_smithy_types::body::SdkBody;
    use serde_json::{json, Value};

    use super::*;

    fn replay_client(status: u16, body: &str) -> StaticReplayClient {
        let mut response = HttpResponse::new(
            StatusCode::try_from(status).expect("valid status code"),
            SdkBody::from(body.to_string()),
        );
        response
            .headers_mut()
            .insert("content-type", "application/x-amz-json-1.0");
        StaticReplayClient::new(vec![ReplayEvent::new(
            HttpRequest::new(SdkBody::empty()),
            response,
        )])
    }

    fn store(replay: &StaticReplayClient, table_name: &str) -> DynamoDbCounterStore {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("akid", "secret", None, None, "test"))
            .http_client(replay.clone())
            .build();
        DynamoDbCounterStore::from_client(Client::from_conf(config), table_name)
    }

    fn sent_bodies(replay: &StaticReplayClient) -> Vec<Value> {
        replay
            .actual_requests()
            .map(|request| {
                let bytes = request.body().bytes().expect("request body should be buffered");
                serde_json::from_slice(bytes).expect("request body should be JSON")
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn increment_sends_conditional_update_to_configured_table() {
        let replay = replay_client(200, r#"{"Attributes":{"count":{"N":"42"}}}"#);
        let store = store(&replay, "X");

        let count = store.increment(&CounterIncrement::site_visits());

        assert_eq!(count, Ok(42));
        assert_eq!(
            sent_bodies(&replay),
            vec![json!({
                "TableName": "X",
                "Key": {"id": {"S": "site_visits"}},
                "ReturnValues": "UPDATED_NEW",
                "UpdateExpression": "SET #c = if_not_exists(#c, :start) + :inc",
                "ExpressionAttributeNames": {"#c": "count"},
                "ExpressionAttributeValues": {
                    ":inc": {"N": "1"},
                    ":start": {"N": "0"}
                }
            })]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn service_error_is_described_by_code_and_message() {
        let replay = replay_client(
            400,
            r#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#,
        );
        let store = store(&replay, "VisitorCount");

        let error = store
            .increment(&CounterIncrement::site_visits())
            .expect_err("missing table should fail");

        assert_eq!(
            error,
            StoreError::Request(
                "ResourceNotFoundException: Requested resource not found".to_string()
            )
        );
    }

    #[test]
    fn service_error_description_uses_available_parts() {
        assert_eq!(
            service_error_description(Some("ThrottlingException"), Some("Rate exceeded")),
            Some("ThrottlingException: Rate exceeded".to_string())
        );
        assert_eq!(
            service_error_description(Some("AccessDeniedException"), None),
            Some("AccessDeniedException".to_string())
        );
        assert_eq!(service_error_description(None, None), None);
    }

    fn attributes(value: AttributeValue) -> HashMap<String, AttributeValue> {
        HashMap::from([("count".to_string(), value)])
    }

    #[test]
    fn reads_numeric_count() {
        let values = attributes(AttributeValue::N("42".to_string()));
        assert_eq!(updated_count(Some(&values), "count"), Ok(42));
    }

    #[test]
    fn missing_attribute_map_is_reported() {
        let error = updated_count(None, "count").expect_err("missing map should fail");
        assert_eq!(error, StoreError::MissingAttribute("count".to_string()));
        assert_eq!(
            error.to_string(),
            "store response did not include attribute `count`"
        );
    }

    #[test]
    fn missing_count_attribute_is_reported() {
        let values = HashMap::from([("other".to_string(), AttributeValue::N("1".to_string()))]);
        let error = updated_count(Some(&values), "count").expect_err("missing count should fail");
        assert_eq!(error, StoreError::MissingAttribute("count".to_string()));
    }

    #[test]
    fn non_numeric_attribute_is_malformed() {
        let values = attributes(AttributeValue::S("42".to_string()));
        let error = updated_count(Some(&values), "count").expect_err("string value should fail");
        assert!(matches!(error, StoreError::MalformedAttribute { .. }));
    }

    #[test]
    fn fractional_or_negative_numbers_are_malformed() {
        for raw in ["4.5", "-1"] {
            let values = attributes(AttributeValue::N(raw.to_string()));
            let error = updated_count(Some(&values), "count").expect_err("value should fail");
            assert_eq!(
                error,
                StoreError::MalformedAttribute {
                    attribute: "count".to_string(),
                    value: raw.to_string(),
                }
            );
        }
    }
}
