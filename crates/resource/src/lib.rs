//! Asset providers for the diplo asset server.
//!
//! - [`FilesystemAssetProvider`]: Serves the webapp directory from disk
//! - [`InMemoryAssetProvider`]: Pre-populated in-memory storage (re-exported
//!   from diplo-traits)

mod filesystem;

pub use filesystem::FilesystemAssetProvider;

pub use diplo_traits::InMemoryAssetProvider;
