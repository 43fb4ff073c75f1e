//! Service container for dependency injection
//!
//! Wires settings and the filesystem into the address book.

use std::sync::Arc;

use crate::application::services::AddressBook;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding settings and I/O dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Open the address book at the configured data file.
    pub fn address_book(&self) -> ApplicationResult<AddressBook> {
        AddressBook::open(Arc::clone(&self.fs), &self.settings.data_file)
    }
}
