use std::{path::Path, sync::Arc, time::Duration};

use bytes::Bytes;
use futures::{stream, StreamExt};
use tokio::fs;

use crate::{
    app::models::api_error::ApiError,
    media::apis::image_generator::ImageGenerator,
    AppState,
};

use super::{
    dtos::generate_dataset_dto::GenerateDatasetDto,
    errors::DatasetApiError,
    models::{class_prompts::ClassPrompts, generation_result::GenerationResult},
    util::{
        archive,
        prompt_parser::{parse_prompt_block, sanitize_class_name},
        workspace::Workspace,
    },
    FIRST_IMAGE_ID,
};

pub enum DatasetOutcome {
    Archive(Bytes),
    Failed(Vec<GenerationResult>),
}

/// One prompt with the image id it was assigned before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationJob {
    pub image_id: u32,
    pub class_name: String,
    pub prompt: String,
}

pub async fn generate_dataset(
    dto: &GenerateDatasetDto,
    request_id: &str,
    state: &Arc<AppState>,
) -> Result<DatasetOutcome, ApiError> {
    state
        .active_requests
        .write()
        .await
        .insert(request_id.to_string());

    let outcome = generate_in_workspace(dto, request_id, state).await;

    state.active_requests.write().await.remove(request_id);

    outcome
}

async fn generate_in_workspace(
    dto: &GenerateDatasetDto,
    request_id: &str,
    state: &Arc<AppState>,
) -> Result<DatasetOutcome, ApiError> {
    let envy = &state.envy;

    let workspace = match Workspace::create(&envy.requests_dir(), request_id).await {
        Ok(workspace) => workspace,
        Err(e) => {
            tracing::error!(%e);
            return Err(DatasetApiError::WorkspaceFailure.value());
        }
    };

    let class_prompts = parse_prompt_block(dto.prompt.as_deref().unwrap_or_default());
    let jobs = plan_jobs(&class_prompts);
    tracing::info!(
        request_id,
        classes = class_prompts.len(),
        prompts = jobs.len(),
        "generating dataset"
    );

    let outcome = run_in_workspace(
        &jobs,
        &workspace,
        state.generator.as_ref(),
        envy.generation_concurrency,
        envy.generation_timeout(),
    )
    .await;

    if !envy.keep_workspaces {
        if let Err(e) = workspace.remove().await {
            tracing::warn!("failed to remove workspace {:?}: {}", workspace.root(), e);
        }
    }

    outcome
}

/// Assigns image ids in processing order, starting at `FIRST_IMAGE_ID`.
pub fn plan_jobs(class_prompts: &[ClassPrompts]) -> Vec<GenerationJob> {
    let mut jobs = Vec::new();
    let mut image_id = FIRST_IMAGE_ID;

    for class in class_prompts {
        for prompt in &class.prompts {
            jobs.push(GenerationJob {
                image_id,
                class_name: class.class_name.to_string(),
                prompt: prompt.to_string(),
            });
            image_id += 1;
        }
    }

    jobs
}

pub async fn run_in_workspace(
    jobs: &[GenerationJob],
    workspace: &Workspace,
    generator: &dyn ImageGenerator,
    concurrency: usize,
    timeout: Duration,
) -> Result<DatasetOutcome, ApiError> {
    let results = generate_images(jobs, workspace, generator, concurrency, timeout).await;

    let failures = results.iter().filter(|r| !r.success).count();
    if failures > 0 {
        tracing::warn!("{} of {} prompt(s) failed", failures, results.len());
        return Ok(DatasetOutcome::Failed(results));
    }

    let archive_path = archive::create_archive(workspace).await?;

    match fs::read(&archive_path).await {
        Ok(bytes) => {
            tracing::info!("archive ready ({} bytes)", bytes.len());
            Ok(DatasetOutcome::Archive(Bytes::from(bytes)))
        }
        Err(e) => {
            tracing::error!(%e);
            Err(DatasetApiError::ArchiveCreationFailure.value())
        }
    }
}

/// Runs every job, at most `concurrency` at a time. Results come back in job
/// order whatever order the calls complete in.
pub async fn generate_images(
    jobs: &[GenerationJob],
    workspace: &Workspace,
    generator: &dyn ImageGenerator,
    concurrency: usize,
    timeout: Duration,
) -> Vec<GenerationResult> {
    let futures: Vec<_> = jobs
        .iter()
        .map(|job| generate_image(job, workspace, generator, timeout))
        .collect();

    stream::iter(futures)
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn generate_image(
    job: &GenerationJob,
    workspace: &Workspace,
    generator: &dyn ImageGenerator,
    timeout: Duration,
) -> GenerationResult {
    let class_dir = workspace.class_dir(&sanitize_class_name(&job.class_name));
    if let Err(e) = fs::create_dir_all(&class_dir).await {
        tracing::error!(%e);
        return GenerationResult::failed(e.to_string());
    }

    let generated = tokio::time::timeout(
        timeout,
        generator.generate(&job.prompt, &workspace.cache_dir()),
    )
    .await;

    let source = match generated {
        Ok(Ok(path)) => path,
        Ok(Err(e)) => {
            tracing::error!(image_id = job.image_id, "generation failed: {}", e);
            return GenerationResult::failed(e.to_string());
        }
        Err(_) => {
            tracing::error!(image_id = job.image_id, "generation timed out");
            return GenerationResult::failed(format!(
                "generation timed out after {:?}",
                timeout
            ));
        }
    };

    let image_name = format!("{}.png", job.image_id);
    let destination = class_dir.join(&image_name);

    match copy_image(&source, &destination).await {
        Ok(_) => {
            tracing::info!(image_id = job.image_id, class = %job.class_name, "image saved");
            GenerationResult::saved(&destination.to_string_lossy(), &image_name, &job.prompt)
        }
        Err(message) => {
            tracing::error!(image_id = job.image_id, "{}", message);
            GenerationResult::failed(message)
        }
    }
}

async fn copy_image(source: &Path, destination: &Path) -> Result<(), String> {
    if !fs::try_exists(source).await.unwrap_or(false) {
        return Err(format!("File not found: {}", source.display()));
    }

    match fs::read(source).await {
        Ok(bytes) => fs::write(destination, bytes).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}
