pub mod cache;
pub mod signature;
pub mod state;

pub use cache::{CacheKey, TranslationCache};
pub use signature::{ChangeDetector, FrameSignature, signature};
pub use state::{AppState, PipelineStatus};
