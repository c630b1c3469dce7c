use crate::config::StudioConfig;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Side-channel for credential selection. Consulted when switching to the
/// Pro tier and again after a batch fails authentication.
#[async_trait]
pub trait CredentialGate: Send + Sync {
    async fn has_selected_key(&self) -> bool;

    async fn open_select_key(&self);
}

/// Credentials come from the environment, so "selecting" a key means telling
/// the operator which variable to set.
pub struct EnvCredentialGate {
    has_key: bool,
    prompts: AtomicUsize,
}

impl EnvCredentialGate {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            has_key: config.has_api_key(),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialGate for EnvCredentialGate {
    async fn has_selected_key(&self) -> bool {
        self.has_key
    }

    async fn open_select_key(&self) {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        log::warn!(
            "🔑 Authentication failed or no key selected (401/403). Set GEMINI_API_KEY to a key with access to the selected model and retry."
        );
    }
}
