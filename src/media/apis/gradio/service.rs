use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use mime::Mime;
use tokio::fs;
use uuid::Uuid;

use crate::media::{apis::image_generator::ImageGenerator, errors::GeneratorError};

use super::{
    config::{absolute_url, file_url, predict_url},
    models::input_spec::{InputSpec, PredictRequest},
    structs::gradio_predict_response::{GradioOutput, GradioPredictResponse},
};

/// Client for a text-to-image app served by Gradio.
pub struct GradioClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GradioClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn predict(&self, input: &InputSpec) -> Result<GradioOutput, GeneratorError> {
        let session_hash = Uuid::new_v4().to_string();
        let body = PredictRequest::new(input, &session_hash);

        let response = self
            .client
            .post(predict_url(&self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let predict_response: GradioPredictResponse = response.json().await?;

        if let Some(error) = predict_response.error {
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: error,
            });
        }

        if let Some(duration) = predict_response.duration {
            tracing::debug!("gradio predicted in {:.2}s", duration);
        }

        let Some(first) = predict_response.data.first() else {
            return Err(GeneratorError::MalformedResponse(
                "prediction returned no data".to_string(),
            ));
        };

        GradioOutput::from_value(first)
            .ok_or_else(|| GeneratorError::MalformedResponse(format!("unexpected output: {}", first)))
    }

    async fn store_output(
        &self,
        output: GradioOutput,
        download_dir: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        fs::create_dir_all(download_dir).await?;

        match output {
            GradioOutput::DataUrl(data_url) => {
                let (extension, bytes) = decode_data_url(&data_url)?;
                let path = download_dir.join(format!("{}.{}", Uuid::new_v4(), extension));
                fs::write(&path, bytes).await?;

                Ok(path)
            }
            GradioOutput::RemotePath(remote_path) => {
                let url = file_url(&self.base_url, &remote_path);
                self.download(&url, &remote_path, download_dir).await
            }
            GradioOutput::Url(url) => {
                let url = absolute_url(&self.base_url, &url);
                let name = url.split('?').next().unwrap_or(&url).to_string();
                self.download(&url, &name, download_dir).await
            }
        }
    }

    async fn download(
        &self,
        url: &str,
        remote_name: &str,
        download_dir: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let bytes = response.bytes().await?;
        let path = download_dir.join(format!(
            "{}.{}",
            Uuid::new_v4(),
            extension_of(remote_name)
        ));
        fs::write(&path, &bytes).await?;

        Ok(path)
    }
}

#[async_trait]
impl ImageGenerator for GradioClient {
    async fn generate(
        &self,
        prompt: &str,
        download_dir: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        let input = InputSpec::from_prompt(prompt);

        let result = tokio::time::timeout(self.timeout, async {
            let output = self.predict(&input).await?;
            self.store_output(output, download_dir).await
        })
        .await;

        match result {
            Ok(path) => path,
            Err(_) => Err(GeneratorError::Timeout(self.timeout)),
        }
    }
}

fn extension_of(remote_name: &str) -> String {
    let name = remote_name.rsplit(['/', '\\']).next().unwrap_or(remote_name);

    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(extension) if !extension.is_empty() => extension.to_lowercase(),
        _ => "png".to_string(),
    }
}

fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), GeneratorError> {
    let Some((header, payload)) = data_url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    else {
        return Err(GeneratorError::Decode("invalid data url".to_string()));
    };

    let Some(mime_type) = header.strip_suffix(";base64") else {
        return Err(GeneratorError::Decode(
            "data url is not base64 encoded".to_string(),
        ));
    };

    let extension = match mime_type.parse::<Mime>() {
        Ok(mime) if mime.type_() == mime::IMAGE => mime.subtype().as_str().to_string(),
        _ => "png".to_string(),
    };

    match base64::decode(payload) {
        Ok(bytes) => Ok((extension, bytes)),
        Err(e) => Err(GeneratorError::Decode(e.to_string())),
    }
}
