use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use super::{expect_success, ApiClient};
use crate::error::Result;
use crate::models::{FileFormat, ImportSource, SourceFile};

/// One file staged for upload, read into memory up front so a bad
/// path fails before any request is made.
#[derive(Debug, Clone)]
pub struct UploadPart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadPart {
    pub async fn read_all(paths: &[PathBuf]) -> Result<Vec<UploadPart>> {
        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("file")
                .to_string();
            parts.push(UploadPart { file_name, bytes });
        }
        Ok(parts)
    }
}

#[derive(Debug, Deserialize)]
struct UploadFilesResponse {
    #[allow(dead_code)]
    #[serde(default)]
    message: String,
    uploaded_files: Vec<SourceFile>,
}

impl ApiClient {
    pub async fn list_files(&self, notebook_id: &str) -> Result<Vec<SourceFile>> {
        let response = self
            .client()
            .get(self.endpoint(&["files", notebook_id]))
            .send()
            .await?;
        let response = expect_success("list files", response).await?;
        Ok(response.json().await?)
    }

    pub async fn upload_files(
        &self,
        notebook_id: &str,
        parts: Vec<UploadPart>,
    ) -> Result<Vec<SourceFile>> {
        let mut form = Form::new();
        for part in parts {
            form = form.part("files", Part::bytes(part.bytes).file_name(part.file_name));
        }
        let response = self
            .client()
            .post(self.endpoint(&["files", "upload_files", notebook_id]))
            .multipart(form)
            .send()
            .await?;
        let response = expect_success("upload files", response).await?;
        let body: UploadFilesResponse = response.json().await?;
        Ok(body.uploaded_files)
    }

    /// Import link sources. The backend enriches each record with its
    /// own timestamps and returns the stored rows.
    pub async fn import_links(
        &self,
        notebook_id: &str,
        sources: &[ImportSource],
    ) -> Result<Vec<SourceFile>> {
        let response = self
            .client()
            .post(self.endpoint(&["files", "upload_url", notebook_id]))
            .json(sources)
            .send()
            .await?;
        let response = expect_success("import links", response).await?;
        Ok(response.json().await?)
    }

    pub async fn set_file_checked(
        &self,
        notebook_id: &str,
        public_id: &str,
        checked: bool,
    ) -> Result<()> {
        let response = self
            .client()
            .patch(self.endpoint(&["files", "update_checked", notebook_id, public_id]))
            .query(&[("checked", checked)])
            .send()
            .await?;
        expect_success("update selection", response).await?;
        Ok(())
    }

    pub async fn rename_file(
        &self,
        notebook_id: &str,
        public_id: &str,
        title: &str,
    ) -> Result<()> {
        let response = self
            .client()
            .patch(self.endpoint(&["files", "update_title", notebook_id, public_id]))
            .query(&[("title", title)])
            .send()
            .await?;
        expect_success("rename source", response).await?;
        Ok(())
    }

    /// Deletion is keyed by id and format together; the format decides
    /// whether a stored blob has to be removed as well.
    pub async fn delete_file(
        &self,
        notebook_id: &str,
        public_id: &str,
        format: &FileFormat,
    ) -> Result<()> {
        let response = self
            .client()
            .delete(self.endpoint(&["files", "delete", notebook_id, public_id, format.as_str()]))
            .send()
            .await?;
        expect_success("delete source", response).await?;
        Ok(())
    }

    pub fn file_download_url(&self, notebook_id: &str, public_id: &str) -> Url {
        self.endpoint(&["files", "download_file", notebook_id, public_id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_all_loads_bytes_and_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"entropy notes").unwrap();

        let parts = tokio_test::block_on(UploadPart::read_all(&[path])).unwrap();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].file_name, "notes.txt");
        assert_eq!(parts[0].bytes, b"entropy notes");
    }

    #[test]
    fn read_all_fails_before_any_request_when_a_path_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.txt");
        std::fs::write(&good, b"ok").unwrap();
        let missing = dir.path().join("nope.txt");

        let err = tokio_test::block_on(UploadPart::read_all(&[good, missing])).unwrap_err();
        assert!(matches!(err, crate::error::AppError::Io(_)));
    }
}
