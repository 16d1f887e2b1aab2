//! Per-slot request composition
//!
//! Pure helpers that turn one [`GenerationSettings`] snapshot into the four
//! derived slot requests dispatched by the batch generator. No I/O;
//! deterministic for identical inputs.

use crate::models::{AspectRatio, GenerationSettings};

/// Number of variants requested per batch.
pub const BATCH_SIZE: usize = 4;

/// One of the [`BATCH_SIZE`] derived requests within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    /// Slot position, `0..BATCH_SIZE`. Distinguishes log attribution and
    /// perturbs the seed so slots are not forced to be identical.
    pub index: usize,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub seed: Option<i64>,
}

impl SlotRequest {
    pub fn derive(settings: &GenerationSettings, index: usize) -> Self {
        Self {
            index,
            prompt: compose_prompt(settings),
            aspect_ratio: settings.aspect_ratio,
            seed: slot_seed(settings, index),
        }
    }
}

/// Fold style modifier and negative prompt into a single prompt string.
///
/// The downstream API has no native negative-prompt field, so exclusions are
/// expressed as natural language appended after the styled prompt.
pub fn compose_prompt(settings: &GenerationSettings) -> String {
    let mut full_prompt = if settings.style.is_empty() {
        settings.prompt.clone()
    } else {
        format!("{}, {}", settings.prompt, settings.style)
    };

    if let Some(negative) = &settings.negative_prompt {
        if !negative.trim().is_empty() {
            full_prompt.push_str(&format!(". Do not include: {}", negative));
        }
    }

    full_prompt
}

/// Effective seed for a slot: `seed + index` when the user supplied one,
/// otherwise unset so the provider picks its own randomness. Saturates at
/// `i64::MAX` since the CLI accepts arbitrary seeds.
pub fn slot_seed(settings: &GenerationSettings, index: usize) -> Option<i64> {
    settings.seed.map(|seed| seed.saturating_add(index as i64))
}
