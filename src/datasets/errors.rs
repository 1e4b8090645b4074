use axum::http::StatusCode;

use crate::app::models::api_error::ApiError;

#[derive(Debug)]
pub enum DatasetApiError {
    MissingPrompt,
    NoImagesProduced,
    ArchiveCreationFailure,
    WorkspaceFailure,
}

impl DatasetApiError {
    pub fn value(&self) -> ApiError {
        match *self {
            Self::MissingPrompt => ApiError {
                code: StatusCode::BAD_REQUEST,
                message: "Prompt is missing".to_string(),
            },
            Self::NoImagesProduced => ApiError {
                code: StatusCode::INTERNAL_SERVER_ERROR,
                message: "No images generated".to_string(),
            },
            Self::ArchiveCreationFailure => ApiError {
                code: StatusCode::INTERNAL_SERVER_ERROR,
                message: "ZIP file creation failed".to_string(),
            },
            Self::WorkspaceFailure => ApiError {
                code: StatusCode::INTERNAL_SERVER_ERROR,
                message: "Failed to prepare the dataset directory".to_string(),
            },
        }
    }
}
