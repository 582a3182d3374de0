//! Plan and track college applications from the terminal.
//!
//! The library holds the student data model, the readiness scorer and the
//! read-side views (timeline, college list, dashboard). The `college-ready`
//! binary wires them to a snapshot file on disk.

pub mod colleges;
pub mod config;
pub mod dashboard;
pub mod output;
pub mod scoring;
pub mod student;
pub mod timeline;
