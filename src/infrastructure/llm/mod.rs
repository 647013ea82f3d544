mod openai_compatible;

pub use openai_compatible::{ANALYST_SYSTEM_PROMPT, OpenAiCompatibleProvider};
