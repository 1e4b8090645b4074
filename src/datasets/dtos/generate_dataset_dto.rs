use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateDatasetDto {
    #[validate(required, length(min = 1, message = "Prompt is missing"))]
    pub prompt: Option<String>,
}
