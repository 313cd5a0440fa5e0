//! # Asset Report Analytics
//!
//! This crate computes the descriptive risk/return metrics of a price series:
//! volatility, maximum drawdown and performance, over the trailing windows of a report.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of external systems.
//!   It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The metric functions and the `AnalyticsEngine` hold no state.
//!   They take price bars as input and produce an `AssetSummary` as output.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: summarizes one slice, or every trailing window of a series.
//! - `AssetSummary`: the three rounded metrics of one slice.
//! - `metrics`: the individual metric functions.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::AssetSummary;
