use std::time::Duration;

use scholariq_core::domain::ModelTier;
use scholariq_core::error::AppError;

/// Sampling and budget parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// The external text generator.
///
/// Implementations report failures as `GENERATION_UNAVAILABLE` (transport problems are
/// `retryable`) and overruns as `GENERATION_TIMEOUT`. They must be shareable across threads
/// because the orchestrator bounds each call on a worker thread.
pub trait Llm: Send + Sync {
    fn generate(
        &self,
        prompt: &str,
        model: ModelTier,
        params: &GenerationParams,
    ) -> Result<String, AppError>;
}

pub mod gemini_llm;
