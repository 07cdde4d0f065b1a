use std::path::{Path, PathBuf};

use anyhow::Context;
use nanoid::nanoid;
use tracing::instrument;

use crate::errors::AppError;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// URL prefix stored files are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Clone, Debug)]
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an image under a fresh random name and returns its public URL.
    #[instrument(name = "Service: Store image", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store_image(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("No file was uploaded".into()));
        }
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(AppError::Validation("Only image uploads are accepted".into()));
        }
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Image extension must be one of: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ))
            })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("could not create uploads dir {}", self.dir.display()))?;

        let stored_name = format!("recipe-{}.{extension}", nanoid!(12));
        tokio::fs::write(self.dir.join(&stored_name), bytes)
            .await
            .context("could not write uploaded image")?;

        tracing::info!(file = %stored_name, "Image stored");
        Ok(format!("{UPLOADS_ROUTE}/{stored_name}"))
    }
}
