use crate::{
    config::StudioConfig,
    error::{Result, StudioError},
    models::{
        AspectRatio, GeneratedImage, GenerationRequest, ImagePayload, ImageSize, PresetKind, Tier,
    },
    provider::{CredentialGate, ImageProvider},
    studio::{
        export::export_image, history::HistoryCache, optimizer::PromptOptimizer,
        orchestrator::BatchOrchestrator, slots::AssetSlots,
    },
};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

const HISTORY_FALLBACK_LABEL: &str = "Ad Render";

/// Generation parameters chosen alongside the assets. Preset fields hold the
/// resolved prompt fragments, not catalog ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub style_preset: String,
    pub angle_preset: String,
    pub theme_preset: String,
    pub tier: Tier,
    pub batch_count: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::Square,
            image_size: ImageSize::OneK,
            style_preset: String::new(),
            angle_preset: String::new(),
            theme_preset: String::new(),
            tier: Tier::Flash,
            batch_count: 4,
        }
    }
}

/// Everything one studio user works with. Requests are snapshotted from this
/// state at submission, and `&mut self` keeps the state untouched while a
/// batch is in flight.
pub struct StudioSession {
    config: StudioConfig,
    slots: AssetSlots,
    prompt: String,
    settings: GenerationSettings,
    history: HistoryCache,
    current_batch: Vec<ImagePayload>,
    orchestrator: BatchOrchestrator,
    optimizer: PromptOptimizer,
    credentials: Arc<dyn CredentialGate>,
}

impl StudioSession {
    pub fn new(
        config: StudioConfig,
        provider: Arc<dyn ImageProvider>,
        credentials: Arc<dyn CredentialGate>,
    ) -> Self {
        Self {
            orchestrator: BatchOrchestrator::new(provider.clone(), &config),
            optimizer: PromptOptimizer::new(provider, config.optimizer_model.clone()),
            history: HistoryCache::new(config.history_capacity),
            slots: AssetSlots::new(),
            prompt: String::new(),
            settings: GenerationSettings::default(),
            current_batch: Vec::new(),
            credentials,
            config,
        }
    }

    pub fn slots(&self) -> &AssetSlots {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut AssetSlots {
        &mut self.slots
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }

    pub fn select_style(&mut self, id: &str) {
        self.settings.style_preset = PresetKind::Style.resolve(id).to_string();
    }

    pub fn select_angle(&mut self, id: &str) {
        self.settings.angle_preset = PresetKind::Angle.resolve(id).to_string();
    }

    pub fn select_theme(&mut self, id: &str) {
        self.settings.theme_preset = PresetKind::Theme.resolve(id).to_string();
    }

    /// Switching to Pro without a selected key prompts for one.
    pub async fn set_tier(&mut self, tier: Tier) {
        if tier.is_pro() && !self.credentials.has_selected_key().await {
            log::warn!("Pro tier selected without credentials");
            self.credentials.open_select_key().await;
        }
        self.settings.tier = tier;
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn current_batch(&self) -> &[ImagePayload] {
        &self.current_batch
    }

    pub fn wipe_history(&mut self) {
        self.history.wipe();
        log::info!("History cleared");
    }

    pub fn snapshot_request(&self) -> GenerationRequest {
        GenerationRequest {
            prompt: self.prompt.clone(),
            aspect_ratio: self.settings.aspect_ratio,
            image_size: self.settings.image_size,
            style_preset: self.settings.style_preset.clone(),
            angle_preset: self.settings.angle_preset.clone(),
            theme_preset: self.settings.theme_preset.clone(),
            tier: self.settings.tier,
            batch_count: self.settings.batch_count,
            product_images: self.slots.product().to_vec(),
            background_images: self.slots.background().to_vec(),
            reference_image: self.slots.reference().cloned(),
        }
    }

    pub async fn submit(&mut self) -> Result<Vec<GeneratedImage>> {
        let request = self.snapshot_request();
        if request.prompt.trim().is_empty() && !request.has_assets() {
            return Err(StudioError::NothingToGenerate);
        }
        self.run(request).await
    }

    /// Restores the entry's assets and settings, then resubmits its request unchanged.
    pub async fn quick_retry(&mut self, id: &str) -> Result<Vec<GeneratedImage>> {
        let request = self
            .history
            .replay_prerequisites(id)
            .cloned()
            .ok_or_else(|| StudioError::InputError(format!("No history entry {}", id)))?;

        self.restore_from(&request);
        self.run(request).await
    }

    /// Uses a history image as the base for refine mode.
    pub fn refine_from(&mut self, id: &str) -> Result<()> {
        let image = self
            .history
            .get(id)
            .map(|entry| entry.image.clone())
            .ok_or_else(|| StudioError::InputError(format!("No history entry {}", id)))?;
        self.slots.set_reference(Some(image));
        Ok(())
    }

    pub fn refine_from_current(&mut self, index: usize) -> Result<()> {
        let image = self.current_batch.get(index).cloned().ok_or_else(|| {
            StudioError::InputError(format!("No image {} in current batch", index))
        })?;
        self.slots.set_reference(Some(image));
        Ok(())
    }

    pub async fn optimize_prompt(&mut self) -> &str {
        let context = self.snapshot_request();
        self.prompt = self.optimizer.optimize(&context, &self.prompt).await;
        &self.prompt
    }

    pub async fn export(&self, id: &str) -> Result<PathBuf> {
        let entry = self
            .history
            .get(id)
            .ok_or_else(|| StudioError::InputError(format!("No history entry {}", id)))?;
        export_image(&entry.image, &self.config.export_dir).await
    }

    fn restore_from(&mut self, request: &GenerationRequest) {
        self.slots.restore(
            &request.product_images,
            &request.background_images,
            request.reference_image.as_ref(),
        );
        self.prompt = request.prompt.clone();
        self.settings = GenerationSettings {
            aspect_ratio: request.aspect_ratio,
            image_size: request.image_size,
            style_preset: request.style_preset.clone(),
            angle_preset: request.angle_preset.clone(),
            theme_preset: request.theme_preset.clone(),
            tier: request.tier,
            batch_count: request.batch_count,
        };
    }

    async fn run(&mut self, request: GenerationRequest) -> Result<Vec<GeneratedImage>> {
        let images = match self
            .orchestrator
            .generate_batch(&request, request.batch_count)
            .await
        {
            Ok(images) => images,
            Err(e) if e.is_auth() => {
                log::error!("Batch generation failed authentication: {}", e);
                self.credentials.open_select_key().await;
                return Err(e);
            }
            Err(e) => {
                log::error!("Batch generation failed: {}", e);
                return Err(e);
            }
        };

        self.current_batch = images.clone();

        let created_at = Utc::now();
        let prompt_used = if request.prompt.trim().is_empty() {
            HISTORY_FALLBACK_LABEL.to_string()
        } else {
            request.prompt.clone()
        };
        let entries: Vec<GeneratedImage> = images
            .into_iter()
            .map(|image| GeneratedImage {
                id: Uuid::new_v4().to_string(),
                image,
                prompt_used: prompt_used.clone(),
                created_at,
                aspect_ratio: request.aspect_ratio,
                originating_request: request.clone(),
            })
            .collect();

        self.history.append(entries.clone());
        log::info!(
            "Batch complete: {} image(s), {} in history",
            entries.len(),
            self.history.len()
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::input::InputFile;
    use crate::studio::slots::Slot;
    use crate::studio::test_support::{image, RecordingGate, ScriptedProvider};
    use std::time::Duration;

    fn session(provider: Arc<ScriptedProvider>, gate: Arc<RecordingGate>) -> StudioSession {
        let config = StudioConfig::new().with_chunk_pause(Duration::ZERO);
        StudioSession::new(config, provider, gate)
    }

    fn png(n: u8) -> InputFile {
        InputFile::new(format!("{}.png", n), "image/png", vec![n])
    }

    #[tokio::test]
    async fn test_submit_requires_prompt_or_assets() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let mut studio = session(provider.clone(), Arc::new(RecordingGate::with_key(true)));

        let err = studio.submit().await.unwrap_err();
        assert!(matches!(err, StudioError::NothingToGenerate));
        assert_eq!(provider.issued(), 0);

        studio.slots_mut().add(vec![png(1)], Slot::Product);
        let entries = studio.submit().await.unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.prompt_used == "Ad Render"));

        // a refine base alone is enough
        let mut studio = session(provider.clone(), Arc::new(RecordingGate::with_key(true)));
        studio.slots_mut().set_reference(Some(image(9)));
        assert!(studio.submit().await.is_ok());
    }

    #[tokio::test]
    async fn test_history_capacity_comes_from_config() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let config = StudioConfig::new()
            .with_chunk_pause(Duration::ZERO)
            .with_history_capacity(6);
        let mut studio =
            StudioSession::new(config, provider, Arc::new(RecordingGate::with_key(true)));
        studio.set_prompt("perfume bottle");

        studio.submit().await.unwrap();
        studio.submit().await.unwrap();

        assert_eq!(studio.history().capacity(), 6);
        assert_eq!(studio.history().len(), 6);
        assert_eq!(studio.current_batch().len(), 4);
    }

    #[tokio::test]
    async fn test_blue_sneaker_partial_batch() {
        let provider = Arc::new(ScriptedProvider::new(|index| {
            if index == 2 {
                Err(StudioError::EmptyResponse)
            } else {
                Ok(image(index))
            }
        }));
        let gate = Arc::new(RecordingGate::with_key(true));
        let mut studio = session(provider.clone(), gate.clone());
        studio.set_prompt("blue sneaker");
        studio.settings_mut().batch_count = 5;

        let entries = studio.submit().await.unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(studio.current_batch().len(), 4);
        assert_eq!(studio.history().len(), 4);
        assert_eq!(gate.prompts(), 0);
        assert_eq!(entries[0].prompt_used, "blue sneaker");
    }

    #[tokio::test]
    async fn test_auth_failure_offers_reselection_and_keeps_state() {
        let provider = Arc::new(ScriptedProvider::new(|_| {
            Err(StudioError::AuthError("401".into()))
        }));
        let gate = Arc::new(RecordingGate::with_key(true));
        let mut studio = session(provider, gate.clone());
        studio.set_prompt("x");

        let err = studio.submit().await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(gate.prompts(), 1);
        assert!(studio.history().is_empty());
        assert!(studio.current_batch().is_empty());
    }

    #[tokio::test]
    async fn test_quick_retry_replays_identical_request() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let mut studio = session(provider.clone(), Arc::new(RecordingGate::with_key(true)));
        studio.set_prompt("perfume bottle");
        studio.select_style("luxury");
        studio.select_angle("close-up");
        studio.settings_mut().batch_count = 2;
        studio.slots_mut().add(vec![png(1), png(2)], Slot::Product);
        studio.slots_mut().add(vec![png(3)], Slot::Background);

        let first = studio.submit().await.unwrap();
        let original = first[0].originating_request.clone();

        // edit the workspace, then retry the stored entry
        studio.set_prompt("something else");
        studio.slots_mut().clear(Slot::Product);
        studio.select_style("none");

        let retried = studio.quick_retry(&first[0].id).await.unwrap();
        assert_eq!(retried.len(), 2);
        assert_eq!(retried[0].originating_request, original);
        assert_eq!(studio.snapshot_request(), original);
        assert_eq!(studio.history().len(), 4);

        let calls = provider.calls();
        assert_eq!(calls[0], calls[3]);
    }

    #[tokio::test]
    async fn test_refine_from_history_switches_to_refine_mode() {
        let provider = Arc::new(ScriptedProvider::succeeding());
        let mut studio = session(provider, Arc::new(RecordingGate::with_key(true)));
        studio.set_prompt("watch");
        studio.settings_mut().batch_count = 1;

        let entries = studio.submit().await.unwrap();
        studio.refine_from(&entries[0].id).unwrap();
        assert_eq!(studio.slots().reference(), Some(&entries[0].image));
        assert!(studio.refine_from("missing").is_err());

        studio.refine_from_current(0).unwrap();
        assert!(studio.refine_from_current(3).is_err());
    }

    #[tokio::test]
    async fn test_switching_to_pro_without_key_prompts() {
        let gate = Arc::new(RecordingGate::with_key(false));
        let mut studio = session(Arc::new(ScriptedProvider::succeeding()), gate.clone());

        studio.set_tier(Tier::Flash).await;
        assert_eq!(gate.prompts(), 0);

        studio.set_tier(Tier::Pro).await;
        assert_eq!(gate.prompts(), 1);
        assert_eq!(studio.settings().tier, Tier::Pro);
    }

    #[tokio::test]
    async fn test_optimize_prompt_replaces_draft() {
        let provider =
            Arc::new(ScriptedProvider::succeeding().with_text(Ok("better prompt".into())));
        let mut studio = session(provider, Arc::new(RecordingGate::with_key(true)));
        studio.set_prompt("draft");

        assert_eq!(studio.optimize_prompt().await, "better prompt");
        assert_eq!(studio.prompt(), "better prompt");
    }

    #[tokio::test]
    async fn test_export_history_entry() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider::new(|_| {
            Ok(ImagePayload::from_bytes("image/png", b"img"))
        }));
        let config = StudioConfig::new().with_export_dir(dir.path());
        let mut studio =
            StudioSession::new(config, provider, Arc::new(RecordingGate::with_key(true)));
        studio.set_prompt("x");
        studio.settings_mut().batch_count = 1;

        let entries = studio.submit().await.unwrap();
        let path = studio.export(&entries[0].id).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"img");
    }
}
