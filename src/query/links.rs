//! Derived hrefs for the filter panel and pagination.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::{QueryArgs, QueryContext, KEY_ORDER, KEY_PAGE};
use crate::filters::{comparison_key, ComparisonOperator, FilterEdit, FilterName};

/// Default path of the search endpoint.
pub const DEFAULT_SEARCH_PATH: &str = "/search";

/// A search URL computed from the context. Recomputed on every change and
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DerivedUrl(String);

impl DerivedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Query string without the leading path and `?`.
    pub fn query(&self) -> &str {
        self.0.split_once('?').map(|(_, q)| q).unwrap_or("")
    }
}

impl fmt::Display for DerivedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DerivedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A filter currently constraining the query, as shown on a remove chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFilter {
    pub filter: FilterName,
    pub value: String,
    pub comparison: Option<ComparisonOperator>,
}

/// Builds search URLs rooted at a configurable endpoint path.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    search_path: String,
}

impl Default for LinkBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_PATH)
    }
}

impl LinkBuilder {
    pub fn new(search_path: impl Into<String>) -> Self {
        Self {
            search_path: search_path.into(),
        }
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    /// Serialize arguments into a search URL.
    ///
    /// Keys with an empty value are left out entirely; that is how
    /// `without-value` filters end up absent from the URL.
    pub fn build(&self, args: &QueryArgs) -> DerivedUrl {
        let query = args
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        DerivedUrl(format!("{}?{}", self.search_path, query))
    }

    /// Href for the "apply filter" button.
    pub fn apply(&self, context: &QueryContext, edit: &FilterEdit) -> DerivedUrl {
        let mut args = context.current_args();
        let name = edit.filter().wire_name();

        match edit {
            FilterEdit::HasValue {
                value, comparison, ..
            } => {
                args.insert(name.to_string(), value.to_wire());
                args.insert(comparison_key(name), comparison.wire_token().to_string());
            }
            FilterEdit::WithoutValue { .. } => {
                args.insert(name.to_string(), String::new());
            }
        }

        let url = self.build(&args);
        debug!("Apply link for {} ({}): {}", name, edit.behaviour().label(), url);
        url
    }

    /// Href for the remove control of the filter with wire name `name`.
    pub fn remove(&self, context: &QueryContext, name: &str) -> DerivedUrl {
        let mut args = context.current_args();
        args.shift_remove(name);
        args.shift_remove(&comparison_key(name));

        let url = self.build(&args);
        debug!("Remove link for {}: {}", name, url);
        url
    }

    /// Remove hrefs for every applied filter, paired with the filter they drop.
    pub fn remove_all(&self, context: &QueryContext) -> Vec<(AppliedFilter, DerivedUrl)> {
        context
            .applied_filters()
            .into_iter()
            .map(|applied| {
                let url = self.remove(context, applied.filter.wire_name());
                (applied, url)
            })
            .collect()
    }

    /// Href for another results page, keeping filters, text and ordering.
    pub fn page(&self, context: &QueryContext, page: u32) -> DerivedUrl {
        let mut args = context.current_args();
        args.insert(KEY_ORDER.to_string(), context.order.wire_token().to_string());
        args.insert(KEY_PAGE.to_string(), page.to_string());
        self.build(&args)
    }
}
