use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use visiongrid::ai::{EnvApiKey, GeminiImageClient};
use visiongrid::batch::BatchGenerator;
use visiongrid::models::{AspectRatio, Config, GeneratedImage, GenerationSettings};
use visiongrid::presets;
use visiongrid::prompt::BATCH_SIZE;

#[derive(Debug, Parser)]
#[command(name = "visiongrid")]
#[command(about = "Generate a batch of AI image variants from a prompt")]
struct CliArgs {
    /// Description of the image to generate.
    #[arg(value_name = "PROMPT")]
    prompt: String,

    /// Content to exclude from the generated images.
    #[arg(long)]
    negative_prompt: Option<String>,

    /// Output proportions: 1:1, 3:4, 4:3, 9:16 or 16:9.
    #[arg(long, default_value = "1:1")]
    aspect_ratio: AspectRatio,

    /// Style preset id (e.g. photorealistic, anime) or raw modifier text.
    #[arg(long)]
    style: Option<String>,

    /// Base seed; slot i uses seed + i.
    #[arg(long)]
    seed: Option<i64>,
}

/// Resolve `--style` as a preset id first, falling back to raw modifier text.
fn resolve_style(style: Option<&str>) -> String {
    match style {
        None => String::new(),
        Some(id_or_text) => match presets::find_preset(id_or_text) {
            Some(preset) => preset.prompt_modifier.to_string(),
            None => id_or_text.to_string(),
        },
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

fn save_payload(
    output_dir: &Path,
    batch_id: Uuid,
    slot: usize,
    payload: &visiongrid::models::ImagePayload,
) -> Result<PathBuf> {
    let file_name = format!(
        "{}_{}.{}",
        batch_id,
        slot,
        extension_for(&payload.mime_type)
    );
    let path = output_dir.join(file_name);
    fs::write(&path, &payload.bytes)?;
    Ok(path)
}

async fn run(args: CliArgs) -> Result<()> {
    // Validates that GEMINI_API_KEY is present before any work starts; the
    // client re-resolves the key from the environment on every request.
    let config = Config::from_env()?;

    let client = GeminiImageClient::new(
        Box::new(EnvApiKey::default()),
        config.image_model.clone(),
    );
    let generator = BatchGenerator::new(Arc::new(client));

    let settings = GenerationSettings {
        prompt: args.prompt,
        negative_prompt: args.negative_prompt,
        aspect_ratio: args.aspect_ratio,
        style: resolve_style(args.style.as_deref()),
        seed: args.seed,
    };

    let images = generator.generate(&settings).await?;

    if images.len() < BATCH_SIZE {
        info!(
            "Generated {} of {} variants (some slots failed)",
            images.len(),
            BATCH_SIZE
        );
    }

    let batch_id = Uuid::new_v4();
    let output_dir = PathBuf::from(&config.output_dir);
    fs::create_dir_all(&output_dir)?;

    for (slot, payload) in images.iter().enumerate() {
        let record = GeneratedImage::from_payload(payload, &settings);
        let path = save_payload(&output_dir, batch_id, slot, payload)?;
        info!(id = %record.id, "Saved variant to {}", path.display());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "visiongrid=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    // Caller-side validation: the batch generator is never invoked with a
    // blank prompt.
    if args.prompt.trim().is_empty() {
        error!("Prompt must not be empty");
        std::process::exit(2);
    }

    match run(args).await {
        Ok(()) => {
            info!("Generation completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{extension_for, resolve_style};

    #[test]
    fn test_resolve_style_preset_id() {
        let style = resolve_style(Some("photorealistic"));
        assert!(style.contains("photorealistic"));
        assert!(style.contains("cinematic lighting"));
    }

    #[test]
    fn test_resolve_style_raw_text_passthrough() {
        assert_eq!(
            resolve_style(Some("charcoal sketch, rough paper")),
            "charcoal sketch, rough paper"
        );
    }

    #[test]
    fn test_resolve_style_none_preset_is_empty() {
        assert_eq!(resolve_style(Some("none")), "");
        assert_eq!(resolve_style(None), "");
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/octet-stream"), "png");
    }

    #[test]
    fn test_save_payload_writes_slot_file() {
        use visiongrid::models::ImagePayload;

        let dir = tempfile::tempdir().unwrap();
        let batch_id = uuid::Uuid::new_v4();
        let payload = ImagePayload::new("image/png", vec![1, 2, 3]);

        let path = super::save_payload(dir.path(), batch_id, 2, &payload).unwrap();

        assert!(path.to_string_lossy().ends_with(&format!("{}_2.png", batch_id)));
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
