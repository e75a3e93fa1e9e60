//! Jobswp - a terminal swipe feed for job vacancies
//!
//! This crate provides the core functionality for the jobswp application:
//! the vacancy model, the filter stage, the swipe controller, vacancy
//! sources and remote refresh.

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod refresh;
pub mod source;
pub mod tui;

// Re-export primary types for convenience
pub use config::UserConfig;
pub use domain::{
    filter_and_sort, EmployerTier, FeedFilter, FeedView, Provenance, SwipeController,
    SwipeOutcome, VacancyItem, VacancyStatus, WrapPolicy,
};
pub use error::{JobswpError, Result};
pub use source::{LocalCache, MemorySource, VacancySource};
