pub mod edit_client;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::{EditRequest, ImageData},
};
use async_trait::async_trait;

pub use edit_client::EditClient;

/// Seam between the presentation layer and the generative image service.
/// Lets the session run against a mock in tests.
#[async_trait]
pub trait EditBackend: Send + Sync {
    async fn edit(&self, request: &EditRequest) -> Result<ImageData>;
}

#[async_trait]
impl EditBackend for EditClient {
    async fn edit(&self, request: &EditRequest) -> Result<ImageData> {
        EditClient::edit(self, request).await
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    edit_client: EditClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::new();

        Ok(Self {
            edit_client: EditClient::new(client, &config)?,
        })
    }

    pub fn edit(&self) -> &EditClient {
        &self.edit_client
    }
}
