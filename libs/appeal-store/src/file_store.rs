use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use appeal_shared::Appeal;
use async_trait::async_trait;
use chrono::Local;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{AppealStore, Result, StoreError, slot};

/// Directory of `appeal<N>.js` files.
///
/// `insert` holds `slot_lock` across the probe and the write, and every write
/// uses create-new semantics, so a slot is never overwritten even when a
/// second process shares the directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    slot_lock: Mutex<()>,
}

impl FileStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !fs::try_exists(&dir).await? {
            fs::create_dir_all(&dir).await?;
            info!("Created appeals folder {}", dir.display());
        }

        Ok(Self {
            dir,
            slot_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, id: u64) -> PathBuf {
        self.dir.join(slot::file_name(id))
    }

    async fn probe_from(&self, start: u64) -> Result<u64> {
        let mut id = start.max(1);
        while fs::try_exists(self.slot_path(id)).await? {
            id += 1;
        }
        Ok(id)
    }
}

#[async_trait]
impl AppealStore for FileStore {
    async fn next_id(&self) -> Result<u64> {
        self.probe_from(1).await
    }

    async fn write(&self, id: u64, appeal: &Appeal) -> Result<()> {
        let content = slot::encode(appeal, Local::now())?;
        let path = self.slot_path(id);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StoreError::SlotTaken(id),
                _ => StoreError::Io(e),
            })?;

        let written = async {
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            // A half-written slot would otherwise block this id forever.
            if let Err(cleanup) = fs::remove_file(&path).await {
                warn!("Failed to remove partial slot {}: {}", path.display(), cleanup);
            }
            return Err(e.into());
        }

        debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn read(&self, id: u64) -> Result<Appeal> {
        let content = match fs::read_to_string(self.slot_path(id)).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => return Err(e.into()),
        };

        slot::decode(&content).map_err(|reason| StoreError::Corrupt { id, reason })
    }

    async fn list(&self) -> Result<Vec<u64>> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if let Some(id) = entry.file_name().to_str().and_then(slot::parse_file_name) {
                ids.push(id);
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }

    async fn insert(&self, appeal: &Appeal) -> Result<u64> {
        let _guard = self.slot_lock.lock().await;

        let mut id = self.probe_from(1).await?;
        loop {
            match self.write(id, appeal).await {
                Ok(()) => return Ok(id),
                Err(StoreError::SlotTaken(taken)) => {
                    debug!("Slot {} claimed elsewhere, probing on", taken);
                    id = self.probe_from(taken + 1).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
