//! Cryptoflip core - account state, device-local storage, and top-up
//! detection for the coin flip betting demo.
//!
//! This library keeps in-memory state as the source of truth and mirrors
//! every mutation into an injected key/value store, so the settlement and
//! top-up components stay testable without a real storage backend.

pub mod account;
pub mod config;
pub mod error;
pub mod explorer;
pub mod storage;
pub mod topup;
pub mod types;

pub use account::PlayerAccount;
pub use config::Config;
pub use error::{CryptoflipError, Result};
pub use explorer::{ExplorerClient, TransactionFeed};
pub use storage::{MemoryStore, SqliteStore, StateStore};
pub use topup::{TopupHandle, TopupRequest, TopupWatcher};
pub use types::{Credit, TxRecord};
