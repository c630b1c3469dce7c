use crate::{
    config::StudioConfig,
    error::{Result, StudioError},
    logger,
    models::{GenerationRequest, ImagePayload},
    provider::ImageProvider,
    studio::prompt::build_image_call,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Sizes of the sequential chunks needed for `count` calls.
pub fn chunk_plan(count: usize, chunk_size: usize) -> Vec<usize> {
    let chunk_size = chunk_size.max(1);
    (0..count)
        .step_by(chunk_size)
        .map(|start| chunk_size.min(count - start))
        .collect()
}

/// Splits one "generate N" request into sequential chunks of concurrent
/// provider calls sized to the tier's concurrency ceiling.
///
/// Within a chunk every call is issued before any is awaited and all of them
/// settle before the next chunk starts; a failing call never cancels its
/// siblings. Results keep issuance order. There is no timeout here: a hung
/// call holds its chunk until the transport gives up.
#[derive(Clone)]
pub struct BatchOrchestrator {
    provider: Arc<dyn ImageProvider>,
    config: StudioConfig,
    chunk_pause: Duration,
}

impl BatchOrchestrator {
    pub fn new(provider: Arc<dyn ImageProvider>, config: &StudioConfig) -> Self {
        Self {
            provider,
            config: config.clone(),
            chunk_pause: config.chunk_pause,
        }
    }

    pub fn with_chunk_pause(mut self, pause: Duration) -> Self {
        self.chunk_pause = pause;
        self
    }

    /// Returns every successful image, possibly fewer than `count`.
    ///
    /// Fails with the authentication error as soon as a chunk contains one,
    /// or with the first recorded failure when nothing succeeded.
    pub async fn generate_batch(
        &self,
        request: &GenerationRequest,
        count: usize,
    ) -> Result<Vec<ImagePayload>> {
        if count == 0 {
            return Err(StudioError::InputError(
                "Batch count must be at least 1".into(),
            ));
        }

        let call = build_image_call(request, self.config.model_for(request.tier));

        if count == 1 {
            log::info!("Generating single image on {} tier", request.tier);
            let image = self.provider.generate_image(&call).await?;
            return Ok(vec![image]);
        }

        let _timer = logger::timer("batch generation");
        let plan = chunk_plan(count, request.tier.chunk_size());
        log::info!(
            "Generating {} images on {} tier in {} chunk(s)",
            count,
            request.tier,
            plan.len()
        );

        let mut results = Vec::with_capacity(count);
        let mut failures: Vec<StudioError> = Vec::new();

        for (chunk_index, &chunk_len) in plan.iter().enumerate() {
            log::debug!(
                "Chunk {}/{}: issuing {} call(s)",
                chunk_index + 1,
                plan.len(),
                chunk_len
            );

            let calls = (0..chunk_len).map(|_| self.provider.generate_image(&call));
            let settled = join_all(calls).await;

            for outcome in settled {
                match outcome {
                    Ok(image) => results.push(image),
                    Err(e) => {
                        log::warn!("Chunk {} call failed: {}", chunk_index + 1, e);
                        failures.push(e);
                    }
                }
            }

            if let Some(position) = failures.iter().position(StudioError::is_auth) {
                log::error!(
                    "Authentication failure in chunk {}; skipping {} remaining chunk(s)",
                    chunk_index + 1,
                    plan.len() - chunk_index - 1
                );
                return Err(failures.swap_remove(position));
            }

            if chunk_index + 1 < plan.len() {
                tokio::time::sleep(self.chunk_pause).await;
            }
        }

        if results.is_empty() {
            if let Some(first) = failures.into_iter().next() {
                return Err(first);
            }
        } else if !failures.is_empty() {
            log::info!(
                "Batch finished with {} of {} images ({} failed)",
                results.len(),
                count,
                failures.len()
            );
        }

        Ok(results)
    }
}
