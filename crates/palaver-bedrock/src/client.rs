use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::ResponseStream;
use aws_smithy_types::Blob;
use aws_smithy_types::error::display::DisplayErrorContext;
use futures::stream::{self, BoxStream};
use tracing::info;

use crate::anthropic::{self, ModelRequest, ModelResponse};
use crate::error::BedrockError;

/// Text fragments of a streamed reply, in arrival order.
pub type TextStream = BoxStream<'static, Result<String, BedrockError>>;

/// Something that can answer a conversation.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Whole reply in one response.
    async fn invoke(&self, request: &ModelRequest) -> Result<String, BedrockError>;

    /// Reply as a stream of text fragments.
    async fn invoke_stream(&self, request: &ModelRequest) -> Result<TextStream, BedrockError>;
}

/// Build a Bedrock runtime client for a specific region.
pub async fn build_client_with_region(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// Claude on Bedrock through `InvokeModel` / `InvokeModelWithResponseStream`.
#[derive(Clone)]
pub struct BedrockInvoker {
    client: Client,
    model_id: String,
}

impl BedrockInvoker {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, request: &ModelRequest) -> Result<String, BedrockError> {
        let body = serde_json::to_vec(request)?;
        info!(model_id = %self.model_id, messages = request.messages.len(), "invoking model");

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        ModelResponse::parse(response.body.as_ref())?.text()
    }

    async fn invoke_stream(&self, request: &ModelRequest) -> Result<TextStream, BedrockError> {
        let body = serde_json::to_vec(request)?;
        info!(model_id = %self.model_id, messages = request.messages.len(), "invoking model with streaming");

        let output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let fragments = stream::try_unfold(output.body, |mut receiver| async move {
            loop {
                let event = receiver
                    .recv()
                    .await
                    .map_err(|e| BedrockError::Stream(DisplayErrorContext(&e).to_string()))?;

                match event {
                    Some(ResponseStream::Chunk(part)) => {
                        let Some(bytes) = part.bytes() else { continue };
                        if let Some(text) = anthropic::delta_text(bytes.as_ref())? {
                            return Ok(Some((text, receiver)));
                        }
                    }
                    Some(_) => continue,
                    None => return Ok::<_, BedrockError>(None),
                }
            }
        });

        Ok(Box::pin(fragments))
    }
}
