pub mod config;
pub mod gemini;
pub mod guardrails;
pub mod llm;
pub mod prompts;
pub mod write;
