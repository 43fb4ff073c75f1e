//! addrbook: contacts kept in a self-balancing AVL tree keyed by id.
//!
//! Layered the usual way:
//! - `domain`: contact record, AVL tree, rendering
//! - `application`: CSV codec and the `AddressBook` service
//! - `infrastructure`: filesystem boundary and service wiring
//! - `cli`: clap commands and the numbered menu

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
