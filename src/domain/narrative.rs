use crate::domain::errors::NarrativeProviderError;
use async_trait::async_trait;

/// External text-completion capability (typically an LLM) used to narrate a prediction.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Complete the given prompt into analysis text.
    async fn complete(&self, prompt: &str) -> Result<String, NarrativeProviderError>;

    /// Provider name recorded as the narrative source.
    fn name(&self) -> &str;
}
