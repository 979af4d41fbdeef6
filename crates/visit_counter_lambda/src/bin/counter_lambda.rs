use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use visit_counter_lambda::adapters::dynamodb::DynamoDbCounterStore;
use visit_counter_lambda::handlers::counter::{handle_counter_event, ApiGatewayResponse};
use visit_counter_lambda::runtime::config::CounterConfig;

async fn handle_request(
    store: &DynamoDbCounterStore,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    let span = tracing::info_span!(
        "counter_invocation",
        request_id = %event.context.request_id,
        table_name = %store.table_name(),
    );

    Ok(span.in_scope(|| handle_counter_event(event.payload, store)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = CounterConfig::from_env();
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = DynamoDbCounterStore::new(&aws_config, config.table_name);
    tracing::info!(table_name = %store.table_name(), "visit counter ready");

    lambda_runtime::run(service_fn(|event| handle_request(&store, event))).await
}
