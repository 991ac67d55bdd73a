//! Route handlers.

pub mod report;
