//! srpa - filter links and term highlighting for the SRPA search page.
//!
//! The search results page lets users stack filters (report, author, date,
//! ministry, management area) on top of a text or similarity query. This crate
//! derives every href the filter panel needs from an explicit [`QueryContext`]
//! and marks search terms inside rendered results.

pub mod config;
pub mod error;
pub mod filters;
pub mod highlight;
pub mod query;
pub mod server;

pub use error::{Error, Result};
pub use filters::{
    ComparisonOperator, FilterBehaviour, FilterEdit, FilterName, FilterValue, PickerState,
    Selections,
};
pub use highlight::{HighlightConfig, HighlightedResult, Highlighter, ResultBlock};
pub use query::{DerivedUrl, LinkBuilder, QueryContext, SortOrder};
