use super::ImageGenerationService;
use crate::models::ImagePayload;
use crate::prompt::SlotRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

enum SlotOutcome {
    Payload(ImagePayload),
    Failure(String),
}

/// Scripted [`ImageGenerationService`] for tests.
///
/// Outcomes are keyed by slot index rather than call order, since batch
/// dispatch is concurrent and call order is not deterministic.
pub struct MockImageClient {
    outcomes: Arc<Mutex<HashMap<usize, SlotOutcome>>>,
    requests: Arc<Mutex<Vec<SlotRequest>>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_payload_for_slot(self, index: usize, payload: ImagePayload) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(index, SlotOutcome::Payload(payload));
        self
    }

    pub fn with_failure_for_slot(self, index: usize, message: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .insert(index, SlotOutcome::Failure(message.into()));
        self
    }

    pub fn failing_all_slots(self, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut outcomes = self.outcomes.lock().unwrap();
        for index in 0..crate::prompt::BATCH_SIZE {
            outcomes.insert(index, SlotOutcome::Failure(message.clone()));
        }
        drop(outcomes);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests seen so far, sorted by slot index for stable assertions.
    pub fn recorded_requests(&self) -> Vec<SlotRequest> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort_by_key(|r| r.index);
        requests
    }

    fn default_payload(index: usize) -> ImagePayload {
        // Tiny valid PNG header plus the slot index, so payloads differ per slot.
        ImagePayload::new(
            "image/png",
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, index as u8],
        )
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageClient {
    async fn generate_image(&self, request: &SlotRequest) -> Result<ImagePayload> {
        self.requests.lock().unwrap().push(request.clone());

        let outcomes = self.outcomes.lock().unwrap();
        match outcomes.get(&request.index) {
            Some(SlotOutcome::Payload(payload)) => Ok(payload.clone()),
            Some(SlotOutcome::Failure(message)) => Err(Error::AiProvider(message.clone())),
            None => Ok(Self::default_payload(request.index)),
        }
    }
}
