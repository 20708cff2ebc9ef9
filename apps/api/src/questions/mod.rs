// Interview question generation service.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod generator;
pub mod prompts;
