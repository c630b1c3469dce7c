pub mod export;
pub mod history;
pub mod input;
pub mod optimizer;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod slots;

#[cfg(test)]
pub(crate) mod test_support;

pub use export::{export_batch, export_image};
pub use history::HistoryCache;
pub use input::{accept_images, InputFile};
pub use optimizer::PromptOptimizer;
pub use orchestrator::{chunk_plan, BatchOrchestrator};
pub use session::{GenerationSettings, StudioSession};
pub use slots::{AssetSlots, Slot, MAX_SLOT_IMAGES};
