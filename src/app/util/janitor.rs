use std::{collections::HashSet, path::Path, sync::Arc, time::Duration};

use tokio::{
    fs, task,
    time::{interval, sleep},
};

use crate::{app::util::time::secs_since, AppState};

pub fn spawn(state: Arc<AppState>) {
    tracing::debug!("janitor spawned");

    task::spawn(async move {
        let ttl = state.envy.workspace_ttl();
        let period = ttl.max(Duration::from_secs(1));
        sleep(period).await;
        let mut interval = interval(period);

        loop {
            interval.tick().await;
            let active = state.active_requests.read().await.clone();
            cleanup_workspaces(&state.envy.requests_dir(), ttl, &active).await;
        }
    });
}

/// Removes request workspaces that have not been touched for longer than `ttl`.
/// Workspaces of requests listed in `active` are never removed, whatever their
/// age. Returns how many were removed.
pub async fn cleanup_workspaces(
    requests_dir: &Path,
    ttl: Duration,
    active: &HashSet<String>,
) -> usize {
    let mut entries = match fs::read_dir(requests_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
        Err(e) => {
            tracing::error!("cleanup_workspaces: {:?}", e);
            return 0;
        }
    };

    let mut removed = 0;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("cleanup_workspaces: {:?}", e);
                break;
            }
        };

        let name = entry.file_name().to_string_lossy().to_string();
        if active.contains(&name) {
            continue;
        }

        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }

        let Ok(modified) = metadata.modified() else {
            continue;
        };
        if secs_since(modified) < ttl.as_secs() {
            continue;
        }

        match fs::remove_dir_all(entry.path()).await {
            Ok(_) => removed += 1,
            Err(e) => tracing::warn!("failed to remove {:?}: {}", entry.path(), e),
        }
    }

    if removed > 0 {
        tracing::debug!("removed {} stale workspace(s)", removed);
    }

    removed
}
