pub mod gradio;
pub mod image_generator;
