use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use palaver_bedrock::client::{BedrockInvoker, build_client_with_region};
use palaver_lambda::config::{Config, StoreBackend};
use palaver_lambda::state::AppState;
use palaver_storage::dynamo::DynamoConversationStore;
use palaver_storage::memory::MemoryConversationStore;
use palaver_storage::store::ConversationStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn ConversationStore> = match config.store {
        StoreBackend::DynamoDb => {
            let dynamodb = palaver_storage::client::build_client().await;
            Arc::new(
                DynamoConversationStore::new(dynamodb, config.table.clone())
                    .with_history_limit(config.history_limit),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory conversation store, history is not durable");
            Arc::new(MemoryConversationStore::with_history_limit(config.history_limit))
        }
    };

    let bedrock = build_client_with_region(&config.bedrock_region).await;
    let model = Arc::new(BedrockInvoker::new(bedrock, config.model_id.clone()));

    tracing::info!(
        model_id = model.model_id(),
        region = %config.bedrock_region,
        store = ?config.store,
        streaming = config.response_streaming,
        "starting palaver"
    );

    let port = config.port;
    let streaming = config.response_streaming;
    let app = palaver_lambda::app(AppState {
        store,
        model,
        config: Arc::new(config),
    });

    // Outside Lambda, serve the same router locally.
    if env::var("AWS_LAMBDA_RUNTIME_API").is_err() {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "listening");
        axum::serve(listener, app).await?;
        return Ok(());
    }

    if streaming {
        lambda_http::run_with_streaming_response(app)
            .await
            .map_err(|e| eyre::eyre!(e))
    } else {
        lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
    }
}
