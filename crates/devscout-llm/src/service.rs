//! [`TextGenerator`] implementation backed by [`ChatClient`].

use async_trait::async_trait;
use devscout_core::{CompletionRequest, ServiceError, TextGenerator};

use crate::client::ChatClient;
use crate::error::LlmError;

impl From<LlmError> for ServiceError {
    fn from(err: LlmError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ServiceError> {
        Ok(ChatClient::complete(
            self,
            &request.prompt,
            request.max_tokens,
            request.temperature,
        )
        .await?)
    }
}
