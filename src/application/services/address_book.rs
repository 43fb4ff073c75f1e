//! Address book service
//!
//! Owns the contact tree together with the CSV file it is loaded from and
//! saved to. This is the context object the CLI and the interactive menu work
//! against; nothing about it is global.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::codec;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{render, AvlTree, Contact, ContactId, RenderStyle};
use crate::infrastructure::traits::FileSystem;

/// What happened when the data file was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The data file did not exist; the book starts empty.
    pub missing: bool,
    /// Contacts inserted into the tree.
    pub loaded: usize,
    /// Ids that appeared more than once in the file; first occurrence wins.
    pub duplicates: Vec<ContactId>,
}

/// Contacts keyed by id, backed by a CSV data file.
pub struct AddressBook {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    tree: AvlTree,
    dirty: bool,
    report: LoadReport,
}

/// Data files must carry a `.csv` suffix.
pub fn validate_data_file(path: &Path) -> ApplicationResult<()> {
    let is_csv = path
        .file_name()
        .map(|n| n.to_string_lossy().ends_with(".csv"))
        .unwrap_or(false);
    if is_csv {
        Ok(())
    } else {
        Err(ApplicationError::InvalidDataFile(path.to_path_buf()))
    }
}

impl AddressBook {
    /// Opens the book stored at `path`, starting empty if the file is missing.
    ///
    /// Records are inserted in file order, so the resulting tree shape need not
    /// match the one that was saved; the key set and balance do.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub fn open(fs: Arc<dyn FileSystem>, path: &Path) -> ApplicationResult<Self> {
        validate_data_file(path)?;

        let mut tree = AvlTree::new();
        let mut report = LoadReport::default();

        if fs.exists(path) {
            let content = fs
                .read_to_string(path)
                .with_path_context("read contacts", path)?;
            for contact in codec::decode(&content)? {
                let id = contact.id;
                if tree.insert(contact) {
                    report.loaded += 1;
                } else {
                    warn!(id, "duplicate id in data file, keeping first occurrence");
                    report.duplicates.push(id);
                }
            }
            info!(count = report.loaded, height = tree.height(), "loaded contacts");
        } else {
            warn!("no existing data file, starting with an empty address book");
            report.missing = true;
        }

        Ok(Self {
            fs,
            path: path.to_path_buf(),
            tree,
            dirty: false,
            report,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn height(&self) -> i32 {
        self.tree.height()
    }

    /// True when there are changes not yet written by [`save`](Self::save).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Adds a contact, refusing ids that are already taken.
    #[instrument(level = "debug", skip(self, contact), fields(id = contact.id))]
    pub fn add(&mut self, contact: Contact) -> ApplicationResult<()> {
        if self.tree.contains(contact.id) {
            return Err(ApplicationError::DuplicateId(contact.id));
        }
        self.tree.insert(contact);
        self.dirty = true;
        debug!(len = self.tree.len(), height = self.tree.height(), "contact added");
        Ok(())
    }

    pub fn find(&self, id: ContactId) -> Option<&Contact> {
        self.tree.get(id)
    }

    /// Deletes and returns the contact with `id`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: ContactId) -> ApplicationResult<Contact> {
        let removed = self
            .tree
            .remove(id)
            .ok_or(ApplicationError::ContactNotFound(id))?;
        self.dirty = true;
        debug!(len = self.tree.len(), height = self.tree.height(), "contact deleted");
        Ok(removed)
    }

    /// All contacts, ascending by id.
    pub fn list(&self) -> Vec<&Contact> {
        self.tree.in_order()
    }

    pub fn render(&self, style: RenderStyle, indent: usize) -> String {
        render(&self.tree, style, indent)
    }

    /// Confirms the tree invariants still hold.
    pub fn verify(&self) -> ApplicationResult<()> {
        Ok(self.tree.check_invariants()?)
    }

    /// Writes all contacts to the data file in ascending id order.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn save(&mut self) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(&self.path)
            .with_path_context("create data directory", &self.path)?;
        let content = codec::encode(self.tree.in_order());
        self.fs
            .write(&self.path, &content)
            .with_path_context("write contacts", &self.path)?;
        self.dirty = false;
        info!(count = self.tree.len(), "saved contacts");
        Ok(())
    }
}
