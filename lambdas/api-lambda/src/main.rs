use std::env;
use std::sync::Arc;

use lambda_http::{run, service_fn, Error};

use weekdo_api_lambda::http_handler::function_handler;
use weekdo_atoms::store::{DynamoStore, MemoryStore, Store};
use weekdo_shared::AppState;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let token_secret = env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set");
    let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "weekdo".to_string());

    // STORE_BACKEND=memory runs without AWS, e.g. under cargo lambda watch
    let store = match env::var("STORE_BACKEND").as_deref() {
        Ok("memory") => {
            tracing::info!("using in-memory store");
            Store::Memory(MemoryStore::new())
        }
        _ => {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_dynamodb::Client::new(&config);
            tracing::info!("using DynamoDB table {}", table_name);
            Store::Dynamo(DynamoStore::new(client, table_name))
        }
    };

    let state = Arc::new(AppState::new(store, token_secret));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { function_handler(event, state).await }
    }))
    .await
}
