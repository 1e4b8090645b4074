use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    pub image_path: Option<String>,
    pub message: String,
}

impl GenerationResult {
    pub fn saved(image_path: &str, image_name: &str, prompt: &str) -> Self {
        Self {
            success: true,
            image_path: Some(image_path.to_string()),
            message: format!("Image {} saved for prompt: {}", image_name, prompt),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            image_path: None,
            message: message.into(),
        }
    }
}

/// Body returned when at least one prompt of a batch failed.
#[derive(Debug, Serialize)]
pub struct BatchFailureResponse {
    pub success: bool,
    pub results: Vec<GenerationResult>,
}
