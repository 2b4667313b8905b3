pub mod messages;
pub mod persona_prompts;
pub mod prompts;
