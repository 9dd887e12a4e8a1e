//! Utility functions shared by the output side of the pipeline.

pub mod safe_cast;
