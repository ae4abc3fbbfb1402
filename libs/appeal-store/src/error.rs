use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("appeal {0} not found")]
    NotFound(u64),

    #[error("slot {0} is already taken")]
    SlotTaken(u64),

    #[error("slot {id} is corrupt: {reason}")]
    Corrupt { id: u64, reason: String },

    #[error("failed to encode appeal: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
