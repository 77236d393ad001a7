pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;
use async_trait::async_trait;

/// Keys of the persisted device-local state.
pub mod keys {
    pub const BALANCE: &str = "balance";
    pub const HISTORY: &str = "history";
    pub const PAYOUT_TAG: &str = "payout_tag";
    pub const WELCOME_BONUS: &str = "welcome_bonus";
    pub const LAST_SEEN_LT: &str = "last_seen_lt";
}

/// Device-local key/value store.
///
/// In-memory state is the source of truth; components write through to the
/// store after every mutation and tolerate absent keys on load.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn clear(&self) -> Result<()>;
}
