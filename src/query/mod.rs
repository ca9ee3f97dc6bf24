//! Query context of the search results page.
//!
//! The context is built once per request (usually from the incoming query
//! string) and passed by reference to the link builders. It is never mutated;
//! links are derived from copies of its argument mapping.

mod links;

pub use links::{AppliedFilter, DerivedUrl, LinkBuilder, DEFAULT_SEARCH_PATH};

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::filters::{comparison_key, ComparisonOperator, FilterName};

pub const KEY_BASED_ON: &str = "buscar-usando";
pub const KEY_TARGET: &str = "buscar-dentro-de";
pub const KEY_TEXT: &str = "q";
pub const KEY_PAGE: &str = "pagina";
pub const KEY_ORDER: &str = "orden";
pub const KEY_PER_PAGE: &str = "por-pagina";

/// Filter keys read back from a search URL. Anything else is ignored.
const FILTER_KEYS: &[&str] = &[
    "ministerio",
    "ministerio-comparacion",
    "area",
    "area-comparacion",
    "autor",
    "autor-comparacion",
    "informe",
    "informe-comparacion",
    "fecha",
    "fecha-comparacion",
    "organismo-requerido",
    "pregunta",
    "creado-en",
];

/// Insertion-ordered query arguments.
///
/// Re-inserting a key keeps its original position, which keeps derived URLs
/// stable when a new filter overrides an existing one.
pub type QueryArgs = IndexMap<String, String>;

/// Result ordering accepted by the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
    DateAsc,
    DateDesc,
}

impl SortOrder {
    pub fn wire_token(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::DateDesc => "date-desc",
        }
    }

    /// Unknown orders fall back to the default, as the search endpoint does.
    pub fn from_wire_token(token: &str) -> Self {
        match token {
            "desc" => SortOrder::Desc,
            "date-asc" => SortOrder::DateAsc,
            "date-desc" => SortOrder::DateDesc,
            _ => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_token())
    }
}

/// Search state the results page was rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryContext {
    /// Applied filters keyed by wire name, including `*-comparacion` keys.
    #[serde(default)]
    pub filters: QueryArgs,
    #[serde(default)]
    pub based_on: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_page")]
    pub current_page: u32,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub per_page: Option<u32>,
}

fn default_page() -> u32 {
    1
}

impl Default for QueryContext {
    fn default() -> Self {
        Self {
            filters: QueryArgs::new(),
            based_on: String::new(),
            target: String::new(),
            text: None,
            current_page: default_page(),
            order: SortOrder::default(),
            per_page: None,
        }
    }
}

impl QueryContext {
    pub fn new(based_on: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            based_on: based_on.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.current_page = page;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Parse the query string of a search URL (with or without the leading `?`).
    ///
    /// Filter values are lowercased because stored names are lowercase.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut context = QueryContext::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_TEXT => context.text = Some(value.into_owned()),
                KEY_TARGET => context.target = value.into_owned(),
                KEY_BASED_ON => context.based_on = value.into_owned(),
                KEY_ORDER => context.order = SortOrder::from_wire_token(&value),
                KEY_PAGE => context.current_page = parse_page(&value)?,
                KEY_PER_PAGE => {
                    if !value.is_empty() {
                        context.per_page = Some(parse_page(&value)?);
                    }
                }
                other if FILTER_KEYS.contains(&other) => {
                    context
                        .filters
                        .insert(other.to_string(), value.to_lowercase());
                }
                other => debug!("Ignoring unknown query parameter {:?}", other),
            }
        }

        Ok(context)
    }

    /// Arguments every derived link starts from: filters, then the search
    /// mode, then the free text when present.
    pub fn current_args(&self) -> QueryArgs {
        let mut args = self.filters.clone();
        args.insert(KEY_BASED_ON.to_string(), self.based_on.clone());
        args.insert(KEY_TARGET.to_string(), self.target.clone());
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            args.insert(KEY_TEXT.to_string(), text.to_string());
        }
        args
    }

    /// Known filters currently present in the context, in context order.
    pub fn applied_filters(&self) -> Vec<AppliedFilter> {
        self.filters
            .iter()
            .filter_map(|(key, value)| {
                let filter = FilterName::from_wire_name(key)?;
                let comparison = self
                    .filters
                    .get(&comparison_key(key))
                    .and_then(|token| ComparisonOperator::from_wire_token(token));
                Some(AppliedFilter {
                    filter,
                    value: value.clone(),
                    comparison,
                })
            })
            .collect()
    }
}

fn parse_page(value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(Error::InvalidPage(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reads_search_mode_and_filters() {
        let context = QueryContext::parse(
            "?buscar-usando=titulo&buscar-dentro-de=informes&autor=P%C3%A9rez&autor-comparacion=igualdad&q=ley+de+presupuesto",
        )
        .unwrap();

        assert_eq!(context.based_on, "titulo");
        assert_eq!(context.target, "informes");
        assert_eq!(context.text.as_deref(), Some("ley de presupuesto"));
        assert_eq!(context.filters.get("autor").map(String::as_str), Some("pérez"));
        assert_eq!(
            context.filters.get("autor-comparacion").map(String::as_str),
            Some("igualdad")
        );
        assert_eq!(context.current_page, 1);
        assert_eq!(context.order, SortOrder::Asc);
    }

    #[test]
    fn test_parse_ignores_unknown_keys() {
        let context = QueryContext::parse("foo=bar&area=salud").unwrap();
        assert_eq!(context.filters.len(), 1);
        assert!(context.filters.contains_key("area"));
    }

    #[test]
    fn test_parse_page_and_order() {
        let context = QueryContext::parse("pagina=3&orden=date-desc&por-pagina=25").unwrap();
        assert_eq!(context.current_page, 3);
        assert_eq!(context.order, SortOrder::DateDesc);
        assert_eq!(context.per_page, Some(25));

        let context = QueryContext::parse("orden=sideways").unwrap();
        assert_eq!(context.order, SortOrder::Asc);
    }

    #[test]
    fn test_parse_rejects_bad_page() {
        assert!(matches!(
            QueryContext::parse("pagina=0"),
            Err(Error::InvalidPage(_))
        ));
        assert!(matches!(
            QueryContext::parse("pagina=dos"),
            Err(Error::InvalidPage(_))
        ));
    }

    #[test]
    fn test_current_args_order() {
        let context = QueryContext::new("titulo", "informes")
            .with_filter("ministerio", "salud")
            .with_text("vacunas");
        let args = context.current_args();
        let keys: Vec<&str> = args.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ministerio", "buscar-usando", "buscar-dentro-de", "q"]);
    }

    #[test]
    fn test_current_args_skips_empty_text() {
        let context = QueryContext::new("titulo", "informes").with_text("");
        assert!(!context.current_args().contains_key(KEY_TEXT));
    }

    #[test]
    fn test_applied_filters() {
        let context = QueryContext::new("", "")
            .with_filter("autor", "perez")
            .with_filter("autor-comparacion", "diferencia")
            .with_filter("creado-en", "2017-05-02 10:00:00")
            .with_filter("area", "");

        let applied = context.applied_filters();
        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].filter, FilterName::Autor);
        assert_eq!(applied[0].comparison, Some(ComparisonOperator::DifferentTo));
        assert_eq!(applied[1].filter, FilterName::AreaDeGestion);
        assert_eq!(applied[1].comparison, None);
    }
}
