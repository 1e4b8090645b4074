use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::media::errors::GeneratorError;

/// A remote text-to-image service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image for `prompt` and stores it somewhere under
    /// `download_dir`. Returns the local path of the stored file.
    async fn generate(&self, prompt: &str, download_dir: &Path)
        -> Result<PathBuf, GeneratorError>;
}
