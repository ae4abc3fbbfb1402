pub mod error;
pub mod file_store;
pub mod slot;

use appeal_shared::Appeal;
use async_trait::async_trait;

pub use error::StoreError;
pub use file_store::FileStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for appeal records, one immutable record per numbered slot.
#[async_trait]
pub trait AppealStore: Send + Sync {
    /// Lowest positive identifier whose slot does not exist yet.
    async fn next_id(&self) -> Result<u64>;

    /// Persists `appeal` into a new slot. Fails with [`StoreError::SlotTaken`]
    /// instead of overwriting.
    async fn write(&self, id: u64, appeal: &Appeal) -> Result<()>;

    async fn read(&self, id: u64) -> Result<Appeal>;

    /// Identifiers of all stored records, ascending.
    async fn list(&self) -> Result<Vec<u64>>;

    /// Claims the next free slot and writes `appeal` into it.
    async fn insert(&self, appeal: &Appeal) -> Result<u64>;
}
