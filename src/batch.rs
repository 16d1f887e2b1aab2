//! Batch orchestration: fan out one settings snapshot into four concurrent
//! slot requests and fan back in once every slot has settled.

use crate::ai::ImageGenerationService;
use crate::models::{GenerationSettings, ImagePayload};
use crate::prompt::{SlotRequest, BATCH_SIZE};
use crate::{Error, Result};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

const BATCH_FAILED_MESSAGE: &str =
    "Could not generate any images. Try again with a different prompt, or check your \
     connection and API key.";

/// Dispatches fixed-size batches of independent image requests and aggregates
/// whichever subset succeeds.
pub struct BatchGenerator {
    service: Arc<dyn ImageGenerationService>,
}

impl BatchGenerator {
    pub fn new(service: Arc<dyn ImageGenerationService>) -> Self {
        Self { service }
    }

    /// Generate one batch of up to [`BATCH_SIZE`] image variants.
    ///
    /// All slots are dispatched concurrently and the call resolves only after
    /// every slot has settled; a failed slot is logged and dropped rather
    /// than aborting its siblings. Successes come back in slot-index order,
    /// not completion order. Returns [`Error::BatchFailed`] only when every
    /// slot failed; a shorter-than-[`BATCH_SIZE`] result is a normal partial
    /// success.
    pub async fn generate(&self, settings: &GenerationSettings) -> Result<Vec<ImagePayload>> {
        let slots: Vec<SlotRequest> = (0..BATCH_SIZE)
            .map(|index| SlotRequest::derive(settings, index))
            .collect();

        info!(
            aspect_ratio = %settings.aspect_ratio,
            seed = ?settings.seed,
            "Dispatching batch of {} image requests",
            BATCH_SIZE
        );

        let outcomes = join_all(slots.iter().map(|slot| self.generate_slot(slot))).await;

        // join_all yields outcomes in dispatch order, which fixes the result
        // order to slot index regardless of completion order.
        let images: Vec<ImagePayload> = outcomes.into_iter().flatten().collect();

        if images.is_empty() {
            return Err(Error::BatchFailed(BATCH_FAILED_MESSAGE.to_string()));
        }

        info!(succeeded = images.len(), "Batch complete");
        Ok(images)
    }

    /// One slot attempt. Failures are absorbed into `None` so a bad slot
    /// never aborts the rest of the batch.
    async fn generate_slot(&self, slot: &SlotRequest) -> Option<ImagePayload> {
        match self.service.generate_image(slot).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(slot = slot.index, auth = e.is_auth_error(), "Slot failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockImageClient;
    use crate::models::{AspectRatio, ImagePayload};

    fn settings() -> GenerationSettings {
        GenerationSettings::new("a red fox in snow", AspectRatio::Wide)
    }

    #[tokio::test]
    async fn test_full_success_returns_four_in_slot_order() {
        let mock = MockImageClient::new()
            .with_payload_for_slot(0, ImagePayload::new("image/png", vec![0]))
            .with_payload_for_slot(1, ImagePayload::new("image/png", vec![1]))
            .with_payload_for_slot(2, ImagePayload::new("image/png", vec![2]))
            .with_payload_for_slot(3, ImagePayload::new("image/png", vec![3]));

        let generator = BatchGenerator::new(Arc::new(mock));
        let images = generator.generate(&settings()).await.unwrap();

        assert_eq!(images.len(), BATCH_SIZE);
        let bytes: Vec<u8> = images.iter().map(|p| p.bytes[0]).collect();
        assert_eq!(bytes, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_partial_failure_preserves_slot_order() {
        let mock = MockImageClient::new()
            .with_payload_for_slot(0, ImagePayload::new("image/png", vec![0]))
            .with_failure_for_slot(1, "transport error")
            .with_payload_for_slot(2, ImagePayload::new("image/png", vec![2]))
            .with_failure_for_slot(3, "no image in response");

        let generator = BatchGenerator::new(Arc::new(mock));
        let images = generator.generate(&settings()).await.unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].bytes, vec![0]);
        assert_eq!(images[1].bytes, vec![2]);
    }

    #[tokio::test]
    async fn test_total_failure_returns_batch_failed() {
        let mock = MockImageClient::new().failing_all_slots("provider down");

        let generator = BatchGenerator::new(Arc::new(mock));
        let err = generator.generate(&settings()).await.unwrap_err();

        match err {
            Error::BatchFailed(message) => assert!(!message.is_empty()),
            other => panic!("expected BatchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_every_slot_is_attempted_despite_failures() {
        let mock_ref;
        let generator = {
            let mock = MockImageClient::new()
                .with_failure_for_slot(0, "boom")
                .with_failure_for_slot(1, "boom");
            let arc = Arc::new(mock);
            mock_ref = Arc::clone(&arc);
            BatchGenerator::new(arc)
        };

        generator.generate(&settings()).await.unwrap();
        assert_eq!(mock_ref.call_count(), BATCH_SIZE);
    }
}
