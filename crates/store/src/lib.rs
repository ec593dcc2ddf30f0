//! File-backed named-entity storage.
//!
//! One directory per store, one file per entry (`<prefix><name>.json`).
//! The directory is the persistent state; there is no cache in front of it.

pub mod errors;
pub mod file_store;
pub mod window;

pub use errors::StoreError;
pub use file_store::FileStore;
pub use window::Window;
