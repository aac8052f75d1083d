//! Bounded parallel execution of keyed tasks.
//!
//! Callers register operations in an [`OperationTable`], queue [`Task`]s by
//! key, and receive each result on the submitting thread as workers finish.
//! Parallel runs require a worker bootstrap passed to the runner up front;
//! with a single thread everything runs inline.

pub mod error;
pub mod runner;
pub mod threads;

pub use error::{Result, RunnerError};
pub use runner::{Bootstrap, Operation, OperationTable, Task, TaskRunner};
pub use threads::ThreadCount;
