use serde::Serialize;
use serde_json::{json, Value};

use crate::media::apis::gradio::config::FN_INDEX;

/// Positional inputs of the text-to-image function exposed by the Gradio app.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub prompt: String,
    pub width: u16,
    pub height: u16,
    pub seed: u64,
    pub steps: u16,
    pub sampler: String,
    pub scheduler: String,
    pub guidance: f32,
    pub reserved: [u8; 2],
}

impl InputSpec {
    pub fn from_prompt(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            width: 512,
            height: 512,
            seed: 0,
            steps: 20,
            sampler: "euler".to_string(),
            scheduler: "normal".to_string(),
            guidance: 7.5,
            reserved: [0, 0],
        }
    }

    pub fn to_data(&self) -> Vec<Value> {
        vec![
            json!(self.prompt),
            json!(self.width),
            json!(self.height),
            json!(self.seed),
            json!(self.steps),
            json!(self.sampler),
            json!(self.scheduler),
            json!(self.guidance),
            json!(self.reserved[0]),
            json!(self.reserved[1]),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct PredictRequest {
    pub fn_index: u32,
    pub session_hash: String,
    pub data: Vec<Value>,
}

impl PredictRequest {
    pub fn new(input: &InputSpec, session_hash: &str) -> Self {
        Self {
            fn_index: FN_INDEX,
            session_hash: session_hash.to_string(),
            data: input.to_data(),
        }
    }
}
