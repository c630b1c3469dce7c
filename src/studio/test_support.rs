use crate::{
    error::{Result, StudioError},
    models::ImagePayload,
    provider::{CredentialGate, ImageCall, ImageProvider, TextCall},
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Outcome = Box<dyn Fn(usize) -> Result<ImagePayload> + Send + Sync>;
type Latency = Box<dyn Fn(usize) -> Duration + Send + Sync>;

pub fn image(index: usize) -> ImagePayload {
    ImagePayload::new("image/png", format!("img-{}", index))
}

/// Provider whose outcome is a function of the call's issuance index.
pub struct ScriptedProvider {
    outcome: Outcome,
    latency: Latency,
    text: Mutex<Option<Result<String>>>,
    issued: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<ImageCall>>,
    text_calls: Mutex<Vec<TextCall>>,
}

impl ScriptedProvider {
    pub fn new(outcome: impl Fn(usize) -> Result<ImagePayload> + Send + Sync + 'static) -> Self {
        Self {
            outcome: Box::new(outcome),
            latency: Box::new(|_| Duration::ZERO),
            text: Mutex::new(None),
            issued: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(|index| Ok(image(index)))
    }

    pub fn with_latency(mut self, latency: impl Fn(usize) -> Duration + Send + Sync + 'static) -> Self {
        self.latency = Box::new(latency);
        self
    }

    pub fn with_text(self, text: Result<String>) -> Self {
        *self.text.lock().unwrap() = Some(text);
        self
    }

    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<ImageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn text_calls(&self) -> Vec<TextCall> {
        self.text_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for ScriptedProvider {
    async fn generate_image(&self, call: &ImageCall) -> Result<ImagePayload> {
        let index = self.issued.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(call.clone());

        tokio::time::sleep((self.latency)(index)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.outcome)(index)
    }

    async fn generate_text(&self, call: &TextCall) -> Result<String> {
        self.text_calls.lock().unwrap().push(call.clone());
        self.text
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Err(StudioError::EmptyResponse))
    }
}

#[derive(Default)]
pub struct RecordingGate {
    pub has_key: AtomicBool,
    pub prompts: AtomicUsize,
}

impl RecordingGate {
    pub fn with_key(has_key: bool) -> Self {
        Self {
            has_key: AtomicBool::new(has_key),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialGate for RecordingGate {
    async fn has_selected_key(&self) -> bool {
        self.has_key.load(Ordering::SeqCst)
    }

    async fn open_select_key(&self) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
    }
}
