//! # Snapshot Testing Support
//!
//! Utilities for inspecting token trees in tests and from the CLI.
//!
//! ## Modules
//!
//! - **`dump`**: renders a tree as an indented listing (for `insta`
//!   snapshots and `bbweave --to tree`) or as a one-line outline (for
//!   compact `assert_eq!` checks)
//! - **`invariants`**: runtime checks for tree correctness (leaf tokens
//!   have no children, only registered tags stay open, no block tag under an
//!   inline one after repair)

pub mod dump;
pub mod invariants;

pub use dump::{dump, outline};
pub use invariants::{check as invariants, check_repaired};
