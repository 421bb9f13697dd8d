use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use stockwatch_core::{Destination, MonitorSpec, StockVerdict};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::alert::Alert;
use crate::{Notifier, NotifyError};

/// Appends one JSON object per alert to a local file.
///
/// Writes are serialized through a mutex so lines from concurrent monitors
/// never interleave.
#[derive(Debug)]
pub struct ArtifactNotifier {
    path: PathBuf,
    write_lock: Mutex<()>,
}

#[derive(Serialize)]
struct ArtifactRecord<'a> {
    destination: &'a str,
    #[serde(flatten)]
    alert: &'a Alert,
}

impl ArtifactNotifier {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_line(&self, line: &[u8]) -> Result<(), NotifyError> {
        let to_err = |source| NotifyError::Artifact {
            path: self.path.display().to_string(),
            source,
        };

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(to_err)?;
        file.write_all(line).await.map_err(to_err)?;
        file.flush().await.map_err(to_err)
    }
}

#[async_trait]
impl Notifier for ArtifactNotifier {
    async fn notify(
        &self,
        destination: &Destination,
        verdict: &StockVerdict,
        spec: &MonitorSpec,
    ) -> Result<(), NotifyError> {
        let alert = Alert::new(spec, verdict);
        let record = ArtifactRecord {
            destination: destination.as_str(),
            alert: &alert,
        };
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        self.append_line(&line).await?;

        tracing::info!(
            monitor = %spec.friendly_name,
            path = %self.path.display(),
            "IN STOCK alert written to artifact"
        );
        Ok(())
    }
}
