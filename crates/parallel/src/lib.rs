//! # texel parallel
//!
//! Parallel processing strategies for neighborhood algorithms.
//!
//! This crate provides:
//! - Static partitioning of a region into contiguous worker slabs
//! - Sequential / rayon execution selected by [`ProcessingMode`]
//! - A shared progress counter for long-running scans

pub mod partition;
pub mod progress;
pub mod strategy;

pub use partition::split_region;
pub use progress::Progress;
pub use strategy::{ParallelStrategy, ProcessingMode};
