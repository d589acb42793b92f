//! Integration tests for rasterbuf crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between raster-math, raster-core, raster-ops and raster-io.
