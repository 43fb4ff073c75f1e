//! Domain layer: contacts and the balanced tree that stores them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod contact;
pub mod error;
pub mod render;
pub mod tree;

pub use contact::{Contact, ContactId};
pub use error::DomainError;
pub use render::{render, RenderStyle, TreeNodeConvert};
pub use tree::{AvlTree, Node};
