//! Data models and structures
//!
//! Defines the core data structures for generation settings, image payloads,
//! and environment configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported output proportions. The set is fixed by the downstream image
/// API and mirrored in the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Tall,
        AspectRatio::Wide,
    ];

    /// The ratio string sent on the wire, e.g. `16:9`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }

    /// Short human label for pickers and help text.
    pub fn label(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Square (1:1)",
            AspectRatio::Portrait => "Portrait (3:4)",
            AspectRatio::Landscape => "Landscape (4:3)",
            AspectRatio::Tall => "Portrait (9:16)",
            AspectRatio::Wide => "Landscape (16:9)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AspectRatio::Square => "Instagram Post",
            AspectRatio::Portrait => "Instagram Portrait",
            AspectRatio::Landscape => "Standard Photo",
            AspectRatio::Tall => "Stories, TikTok, Reels",
            AspectRatio::Wide => "YouTube, Twitter",
        }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::Square
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(input: &str) -> std::result::Result<Self, Self::Err> {
        match input {
            "1:1" => Ok(AspectRatio::Square),
            "3:4" => Ok(AspectRatio::Portrait),
            "4:3" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Tall),
            "16:9" => Ok(AspectRatio::Wide),
            other => Err(format!(
                "Unknown aspect ratio '{}'. Expected one of: 1:1, 3:4, 4:3, 9:16, 16:9",
                other
            )),
        }
    }
}

/// Immutable snapshot of one user-initiated generation request.
///
/// Captured at submit time; later edits to the form/CLI arguments never
/// affect an in-flight batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub aspect_ratio: AspectRatio,
    /// Canned style modifier text; empty means no style bias.
    #[serde(default)]
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

impl GenerationSettings {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: None,
            aspect_ratio,
            style: String::new(),
            seed: None,
        }
    }
}

/// One successful slot outcome: fully decoded image bytes plus their mime
/// type. A slot either yields a complete payload or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Render the payload as a `data:` URI for direct display.
    pub fn to_data_uri(&self) -> String {
        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime_type, encoded)
    }
}

/// Display record pairing a payload with the settings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: Uuid,
    pub data_uri: String,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub style: String,
}

impl GeneratedImage {
    pub fn from_payload(payload: &ImagePayload, settings: &GenerationSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            data_uri: payload.to_data_uri(),
            prompt: settings.prompt.clone(),
            aspect_ratio: settings.aspect_ratio,
            style: settings.style.clone(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub image_model: String,
    pub output_dir: String,
}

const API_KEY_PLACEHOLDER: &str = "__API_KEY__";

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| crate::Error::Config("GEMINI_API_KEY not set".to_string()))?;

        // A deploy-time placeholder or blank value counts as missing.
        if gemini_api_key.trim().is_empty() || gemini_api_key == API_KEY_PLACEHOLDER {
            return Err(crate::Error::Config(
                "GEMINI_API_KEY is empty or unconfigured".to_string(),
            ));
        }

        Ok(Self {
            gemini_api_key,
            image_model: std::env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-3-pro-image-preview".to_string()),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aspect_ratio_round_trip() {
        for ratio in AspectRatio::ALL {
            let parsed: AspectRatio = ratio.as_str().parse().unwrap();
            assert_eq!(parsed, ratio);
        }
    }

    #[test]
    fn test_aspect_ratio_rejects_unknown() {
        let err = "2:1".parse::<AspectRatio>().unwrap_err();
        assert!(err.contains("2:1"));
    }

    #[test]
    fn test_aspect_ratio_serde_uses_ratio_string() {
        let json = serde_json::to_string(&AspectRatio::Wide).unwrap();
        assert_eq!(json, "\"16:9\"");

        let parsed: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(parsed, AspectRatio::Tall);
    }

    #[test]
    fn test_payload_to_data_uri() {
        let payload = ImagePayload::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,iVBORw==");
    }

    // Process environment is shared across test threads; every test that
    // touches GEMINI_* variables must hold this lock.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn with_api_key_env<R>(value: Option<&str>, body: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap();
        match value {
            Some(key) => std::env::set_var("GEMINI_API_KEY", key),
            None => std::env::remove_var("GEMINI_API_KEY"),
        }
        std::env::remove_var("GEMINI_IMAGE_MODEL");
        std::env::remove_var("OUTPUT_DIR");
        let result = body();
        std::env::remove_var("GEMINI_API_KEY");
        result
    }

    #[test]
    fn test_config_rejects_missing_api_key() {
        with_api_key_env(None, || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
        });
    }

    #[test]
    fn test_config_rejects_blank_api_key() {
        with_api_key_env(Some("   "), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
        });
    }

    #[test]
    fn test_config_rejects_placeholder_api_key() {
        with_api_key_env(Some("__API_KEY__"), || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, crate::Error::Config(_)));
        });
    }

    #[test]
    fn test_config_applies_defaults_with_valid_key() {
        with_api_key_env(Some("real-key"), || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.gemini_api_key, "real-key");
            assert_eq!(config.image_model, "gemini-3-pro-image-preview");
            assert_eq!(config.output_dir, "output");
        });
    }

    #[test]
    fn test_generated_image_carries_settings() {
        let settings = GenerationSettings {
            prompt: "a lighthouse".to_string(),
            negative_prompt: None,
            aspect_ratio: AspectRatio::Wide,
            style: "oil painting".to_string(),
            seed: None,
        };
        let payload = ImagePayload::new("image/png", vec![1, 2, 3]);

        let image = GeneratedImage::from_payload(&payload, &settings);
        assert_eq!(image.prompt, "a lighthouse");
        assert_eq!(image.aspect_ratio, AspectRatio::Wide);
        assert_eq!(image.style, "oil painting");
        assert!(image.data_uri.starts_with("data:image/png;base64,"));
    }
}
