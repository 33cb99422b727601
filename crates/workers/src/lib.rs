#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `workers` is the bounded parallel job handler shared by the massive
//! ingest path (`add_massive`) and the synchronization engine's copy
//! dispatch. A [`WorkerPool`] fixes its worker count at construction,
//! accepts label-tagged fallible jobs via [`WorkerPool::submit`], and
//! blocks callers in [`WorkerPool::process`] until the round completes.
//!
//! # Design
//!
//! Task outcomes — successes and failures alike — are delivered through an
//! internal result channel rather than `process`'s return value: `process`
//! tells you whether the round succeeded, and [`WorkerPool::drain_results`]
//! gives you every [`TaskResult`], so a caller that needs both (for example
//! the synchronization engine, which must refresh marks for the transfers
//! that succeeded while still reporting the ones that failed) does not have
//! to choose between the two. This mirrors the bounded worker pool pattern
//! used elsewhere in the teacher workspace for parallel file transfer.
//!
//! # Errors
//!
//! All fallible operations return [`WorkerError`].

mod error;
mod pool;

pub use error::WorkerError;
pub use pool::{TaskResult, WorkerPool};
