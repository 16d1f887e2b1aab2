//! AI service integration for image generation
//!
//! Provides the service trait the batch generator fans out over, the Gemini
//! REST implementation, and the credential capability injected into clients.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiImageClient;
pub use mock::MockImageClient;

use crate::models::ImagePayload;
use crate::prompt::SlotRequest;
use crate::{Error, Result};
use async_trait::async_trait;

/// One image-generation call per batch slot. Implementations make a single
/// attempt; retry policy, if any, belongs to the caller.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_image(&self, request: &SlotRequest) -> Result<ImagePayload>;
}

/// Credential supply for provider clients.
///
/// Resolved on every request, never cached at construction, so a key rotated
/// between batches takes effect immediately.
pub trait ApiKeyProvider: Send + Sync {
    fn api_key(&self) -> Result<String>;
}

impl<F> ApiKeyProvider for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn api_key(&self) -> Result<String> {
        self()
    }
}

/// Reads the key from an environment variable on every call.
pub struct EnvApiKey {
    var_name: String,
}

impl EnvApiKey {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

impl Default for EnvApiKey {
    fn default() -> Self {
        Self::new("GEMINI_API_KEY")
    }
}

impl ApiKeyProvider for EnvApiKey {
    fn api_key(&self) -> Result<String> {
        std::env::var(&self.var_name)
            .map_err(|_| Error::Config(format!("{} not set", self.var_name)))
    }
}

/// Fixed key, mainly for tests and short-lived tools.
pub struct StaticApiKey(pub String);

impl ApiKeyProvider for StaticApiKey {
    fn api_key(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
