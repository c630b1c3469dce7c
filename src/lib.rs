pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod provider;
pub mod studio;

pub use config::StudioConfig;
pub use error::{Result, StudioError};
pub use models::{
    AspectRatio, GeneratedImage, GenerationMode, GenerationRequest, ImagePayload, ImageSize,
    PresetKind, Tier,
};
pub use provider::{CredentialGate, EnvCredentialGate, GeminiClient, ImageProvider};
pub use studio::{
    AssetSlots, BatchOrchestrator, HistoryCache, InputFile, PromptOptimizer, Slot, StudioSession,
};
