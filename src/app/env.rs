use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Envy {
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    pub port: Option<u16>,

    pub gradio_url: String,
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
    #[serde(default = "default_generation_concurrency")]
    pub generation_concurrency: usize,

    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    #[serde(default = "default_workspace_ttl_secs")]
    pub workspace_ttl_secs: u64,
    #[serde(default)]
    pub keep_workspaces: bool,
}

impl Envy {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn workspace_ttl(&self) -> Duration {
        Duration::from_secs(self.workspace_ttl_secs)
    }

    pub fn requests_dir(&self) -> PathBuf {
        self.base_dir.join("requests")
    }
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    60
}

fn default_generation_concurrency() -> usize {
    1
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_workspace_ttl_secs() -> u64 {
    600
}
