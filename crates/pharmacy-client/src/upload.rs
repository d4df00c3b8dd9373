//! File upload (prescriptions, product images).

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Reply of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    /// Public URL of the stored file.
    pub secure_url: String,
}

impl ApiClient {
    /// Uploads the file at `path` as the multipart field `file`.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn upload_file(&self, path: &Path) -> ClientResult<UploadResult> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::File {
            path: path.display().to_string(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let size = bytes.len();

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let request = self.authed(Method::POST, "/api/upload")?.multipart(form);
        let result: UploadResult = self.send_json(request).await?;

        info!(bytes = size, url = %result.secure_url, "File uploaded");
        Ok(result)
    }
}
