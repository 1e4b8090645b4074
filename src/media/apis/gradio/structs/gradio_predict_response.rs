use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct GradioPredictResponse {
    #[serde(default)]
    pub data: Vec<Value>,
    pub duration: Option<f64>,
    pub error: Option<String>,
}

/// Where the generated image of a prediction can be fetched from.
#[derive(Debug, Clone, PartialEq)]
pub enum GradioOutput {
    /// `data:image/png;base64,...`
    DataUrl(String),
    /// A path on the Gradio host, served under `/file=`.
    RemotePath(String),
    /// A fully formed (or host-relative) download URL.
    Url(String),
}

impl GradioOutput {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if s.starts_with("data:") => Some(Self::DataUrl(s.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self::RemotePath(s.to_string())),
            Value::Object(map) => {
                if let Some(Value::String(url)) = map.get("url") {
                    return Some(Self::Url(url.to_string()));
                }
                if let Some(Value::String(data)) = map.get("data") {
                    if data.starts_with("data:") {
                        return Some(Self::DataUrl(data.to_string()));
                    }
                }

                ["path", "name"]
                    .iter()
                    .find_map(|key| match map.get(*key) {
                        Some(Value::String(path)) if !path.is_empty() => {
                            Some(Self::RemotePath(path.to_string()))
                        }
                        _ => None,
                    })
            }
            _ => None,
        }
    }
}
