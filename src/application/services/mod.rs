//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod address_book;

pub use address_book::{validate_data_file, AddressBook, LoadReport};
