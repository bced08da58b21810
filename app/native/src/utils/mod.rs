//! Small process-level helpers.

pub mod thread;
