//! upsync-core: Core library for the upsync uploader
//!
//! This crate provides the core functionality for upsync, including:
//! - Credential file loading
//! - Remote key derivation
//! - ObjectStore trait for S3 operations
//! - The idempotent directory upload engine
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod credentials;
pub mod error;
pub mod key;
pub mod sync;
pub mod traits;

pub use credentials::{load_credentials, Credentials, DEFAULT_CREDENTIALS_FILE, DEFAULT_REGION};
pub use error::{Error, Result};
pub use key::derive_key;
pub use sync::{FileOutcome, SyncEvent, SyncReporter, SyncSummary, Synchronizer};
pub use traits::{ObjectInfo, ObjectStore};
