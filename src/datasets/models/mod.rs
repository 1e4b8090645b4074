pub mod class_prompts;
pub mod generation_result;
