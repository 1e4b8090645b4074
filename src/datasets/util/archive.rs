use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use zip::{write::FileOptions, CompressionMethod, ZipWriter};

use crate::{
    app::{errors::DefaultApiError, models::api_error::ApiError},
    datasets::{errors::DatasetApiError, util::workspace::Workspace},
};

/// Zips the dataset tree of `workspace` into its archive path. Entry names are
/// relative to the workspace root, e.g. `Dataset/CAT/64.png`.
pub async fn create_archive(workspace: &Workspace) -> Result<PathBuf, ApiError> {
    let workspace = workspace.clone();

    let task = tokio::task::spawn_blocking(move || {
        let files = collect_files(&workspace.dataset_dir())?;
        if files.is_empty() {
            return Ok(None);
        }

        write_archive(workspace.root(), &files, &workspace.archive_path())?;
        Ok::<_, zip::result::ZipError>(Some((workspace.archive_path(), files.len())))
    });

    let written = match task.await {
        Ok(Ok(written)) => written,
        Ok(Err(e)) => {
            tracing::error!(%e);
            return Err(DatasetApiError::ArchiveCreationFailure.value());
        }
        Err(e) => {
            tracing::error!(%e);
            return Err(DefaultApiError::InternalServerError.value());
        }
    };

    let Some((archive_path, count)) = written else {
        return Err(DatasetApiError::NoImagesProduced.value());
    };

    if !archive_path.is_file() {
        return Err(DatasetApiError::ArchiveCreationFailure.value());
    }

    tracing::debug!("archived {} file(s) into {:?}", count, archive_path);

    Ok(archive_path)
}

fn collect_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if !dir.is_dir() {
        return Ok(files);
    }

    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            files.extend(collect_files(&path)?);
        } else {
            files.push(path);
        }
    }

    Ok(files)
}

fn write_archive(base: &Path, files: &[PathBuf], archive_path: &Path) -> zip::result::ZipResult<()> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        let relative = file.strip_prefix(base).unwrap_or(file);
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        io::copy(&mut File::open(file)?, &mut zip)?;
    }

    zip.finish()?;

    Ok(())
}
