//! GPA/CGPA engine and semester record store behind the `gpad` sidecar.
//!
//! The front-end sends grade rows; the core turns them into [`model::Grade`]
//! and [`model::Semester`] values, persists them through
//! [`store::StudentRecordStore`], and rebuilds the [`model::StudentSummary`]
//! from the full semester list after every change.

pub mod calc;
pub mod config;
pub mod db;
pub mod ipc;
pub mod logging;
pub mod model;
pub mod policy;
pub mod store;

pub use model::{Grade, GradeRow, Semester, StudentSummary, Term};
pub use policy::Honours;
pub use store::{KeyValueStore, MemoryStore, StoreError, StudentRecordStore};
