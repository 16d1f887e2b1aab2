use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentResponse, GenerationConfig, ImageConfig, Part,
};
use crate::ai::{ApiKeyProvider, ImageGenerationService};
use crate::models::ImagePayload;
use crate::prompt::SlotRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Output-size hint passed on every request.
const IMAGE_SIZE: &str = "1K";

#[derive(Debug, Serialize)]
struct ImageRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: Box<dyn ApiKeyProvider>, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: Box<dyn ApiKeyProvider>,
        model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, request: &SlotRequest) -> Result<ImagePayload> {
        let api_request = ImageRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::Text {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                    image_size: IMAGE_SIZE.to_string(),
                }),
                seed: request.seed,
            },
        };

        tracing::debug!(
            slot = request.index,
            aspect_ratio = %request.aspect_ratio,
            seed = ?request.seed,
            "Dispatching Gemini image request"
        );

        let gemini_response: GenerateContentResponse =
            self.http.generate_content(&api_request).await?;

        let image_data = gemini_response
            .candidates
            .first()
            .and_then(|c| {
                c.content.parts.iter().find_map(|p| match p {
                    Part::InlineData { inline_data } => Some(inline_data),
                    _ => None,
                })
            })
            .ok_or_else(|| Error::AiProvider("No image data in Gemini response".to_string()))?;

        tracing::debug!(
            slot = request.index,
            mime_type = %image_data.mime_type,
            "Gemini returned inline image"
        );

        use base64::Engine as _;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&image_data.data)
            .map_err(|e| {
                Error::AiProvider(format!("Failed to decode Gemini base64 image: {}", e))
            })?;

        Ok(ImagePayload::new(image_data.mime_type.clone(), bytes))
    }
}
