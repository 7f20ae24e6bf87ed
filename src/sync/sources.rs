use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use super::mirror::Mirror;
use super::notices::NoticeSender;
use crate::api::ApiClient;
use crate::error::Result;
use crate::models::{ImportSource, SourceFile};

// Max concurrent selection round trips during a bulk toggle.
const MAX_CONCURRENT_TOGGLES: usize = 5;

// How long the cosmetic download marker stays visible. Completion is
// not observable once the file is handed to the system opener.
const DOWNLOAD_MARKER_TTL: Duration = Duration::from_secs(1);

/// Local mirror of a notebook's source files plus the operations that
/// keep it synchronized with the backend.
///
/// Every mutation confirms with the server before touching the mirror,
/// so a failed round trip leaves the local state at server truth.
/// Failures are reported through the notice channel and never escape.
pub struct SourceList {
    api: ApiClient,
    notebook_id: String,
    mirror: Mirror<SourceFile>,
    notices: NoticeSender,
    download_marker: Option<(String, Instant)>,
}

impl SourceList {
    pub fn new(
        api: ApiClient,
        notebook_id: String,
        seed: Vec<SourceFile>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            api,
            notebook_id,
            mirror: Mirror::new(seed),
            notices,
            download_marker: None,
        }
    }

    pub fn files(&self) -> &[SourceFile] {
        self.mirror.items()
    }

    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    /// Header checkbox state: true only when there is at least one
    /// file and every file is checked.
    pub fn all_checked(&self) -> bool {
        !self.mirror.is_empty() && self.mirror.items().iter().all(|f| f.checked)
    }

    /// Ids of the checked files, in current list order. These scope
    /// retrieval for chat queries.
    pub fn checked_ids(&self) -> Vec<String> {
        self.mirror
            .items()
            .iter()
            .filter(|f| f.checked)
            .map(|f| f.public_id.clone())
            .collect()
    }

    /// Flip one file's selection. The new value is committed on the
    /// backend first and applied locally only on success.
    pub async fn toggle_checked(&mut self, public_id: &str) {
        let target = match self.mirror.get(public_id) {
            Some(file) => !file.checked,
            None => return,
        };
        match self
            .api
            .set_file_checked(&self.notebook_id, public_id, target)
            .await
        {
            Ok(()) => {
                self.mirror.patch(public_id, |f| f.checked = target);
            }
            Err(e) => {
                tracing::error!("Failed to update selection for {}: {}", public_id, e);
                self.notices.error("Failed to update source selection");
            }
        }
    }

    /// Bulk toggle: when every file is checked the target is "uncheck
    /// all", otherwise "check all". One round trip per file, issued
    /// concurrently; each outcome is applied independently by id, so a
    /// partial failure leaves a mixed collection. Failures are rolled
    /// up into a single notice.
    pub async fn toggle_all(&mut self) {
        if self.mirror.is_empty() {
            return;
        }
        let target = !self.all_checked();
        let ids: Vec<String> = self
            .mirror
            .items()
            .iter()
            .map(|f| f.public_id.clone())
            .collect();
        let total = ids.len();

        let api = &self.api;
        let notebook_id = self.notebook_id.as_str();
        let outcomes: Vec<(String, bool)> = stream::iter(ids)
            .map(|id| async move {
                let ok = match api.set_file_checked(notebook_id, &id, target).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!("Failed to update selection for {}: {}", id, e);
                        false
                    }
                };
                (id, ok)
            })
            .buffer_unordered(MAX_CONCURRENT_TOGGLES)
            .collect()
            .await;

        let mut failures = 0;
        for (id, ok) in outcomes {
            if ok {
                self.mirror.patch(&id, |f| f.checked = target);
            } else {
                failures += 1;
            }
        }
        if failures > 0 {
            self.notices
                .error(format!("Failed to update {} of {} sources", failures, total));
        }
    }

    /// Read the given paths and upload them as one multipart request.
    /// The backend returns the stored records, which land at the front
    /// of the mirror. Errors propagate so the caller can run this off
    /// the UI loop and report once.
    pub async fn upload(api: &ApiClient, notebook_id: &str, paths: &[std::path::PathBuf]) -> Result<Vec<SourceFile>> {
        let parts = crate::api::UploadPart::read_all(paths).await?;
        api.upload_files(notebook_id, parts).await
    }

    /// Merge freshly uploaded records into the mirror.
    pub fn apply_uploaded(&mut self, files: Vec<SourceFile>) {
        self.mirror.prepend_all(files);
    }

    /// Batch-import link sources from the discover wizard.
    pub async fn import(&mut self, sources: &[ImportSource]) {
        if sources.is_empty() {
            return;
        }
        match self.api.import_links(&self.notebook_id, sources).await {
            Ok(stored) => {
                self.mirror.prepend_all(stored);
            }
            Err(e) => {
                tracing::error!("Failed to import sources: {}", e);
                self.notices.error("Failed to import sources");
            }
        }
    }

    /// Delete a source. The backend keys deletion on id plus format,
    /// since only stored documents have a blob to clean up.
    pub async fn delete(&mut self, public_id: &str) {
        let format = match self.mirror.get(public_id) {
            Some(file) => file.format.clone(),
            None => return,
        };
        match self
            .api
            .delete_file(&self.notebook_id, public_id, &format)
            .await
        {
            Ok(()) => {
                self.mirror.remove(public_id);
            }
            Err(e) => {
                tracing::error!("Failed to delete source {}: {}", public_id, e);
                self.notices.error("Failed to delete source");
            }
        }
    }

    pub async fn rename(&mut self, public_id: &str, title: &str) {
        match self
            .api
            .rename_file(&self.notebook_id, public_id, title)
            .await
        {
            Ok(()) => {
                self.mirror.patch(public_id, |f| f.title = title.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to rename source {}: {}", public_id, e);
                self.notices.error("Failed to rename source");
            }
        }
    }

    /// Hand a source to the system opener: links go straight to their
    /// URL, stored documents to the download endpoint. Fire and
    /// forget; only a short-lived marker records that it happened.
    pub fn download(&mut self, public_id: &str) {
        let Some(file) = self.mirror.get(public_id) else {
            return;
        };
        if file.format.is_link() {
            let _ = open::that(&file.url);
        } else {
            let url = self.api.file_download_url(&self.notebook_id, public_id);
            let _ = open::that(url.as_str());
        }
        self.download_marker = Some((public_id.to_string(), Instant::now()));
    }

    pub fn downloading(&self, public_id: &str) -> bool {
        matches!(&self.download_marker, Some((id, _)) if id == public_id)
    }

    /// Expire the download marker. Called once per UI tick.
    pub fn tick(&mut self) {
        if let Some((_, started)) = &self.download_marker {
            if started.elapsed() >= DOWNLOAD_MARKER_TTL {
                self.download_marker = None;
            }
        }
    }
}
