/// Per-file driver and batch runner.
pub mod batch;
