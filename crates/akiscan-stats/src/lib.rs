//! Statistical utilities for the akiscan project.
//!
//! This crate provides the small numeric kernel used to summarize a patient's
//! creatinine history:
//!
//! - **Descriptive statistics**: minimum, maximum, mean and median of a dataset
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ```
//! use akiscan_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.min, 1.0);
//! assert_eq!(stats.median, 2.5);
//! ```

pub mod descriptive;
