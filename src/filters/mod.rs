//! Filter vocabulary of the search page.
//!
//! The UI labels (`área de gestión`, `equal-to`, ...) differ from the parameter
//! names the search endpoint understands (`area`, `igualdad`, ...). Every label
//! maps to exactly one wire name through an exhaustive match, so an unlisted
//! label is rejected when it is parsed instead of silently producing `undefined`
//! parameters.

mod picker;

pub use picker::PickerState;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Suffix appended to a filter's wire name to carry its comparison operator.
pub const COMPARISON_SUFFIX: &str = "-comparacion";

/// Wire date format for the `fecha` filter.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters selectable in the "add filter" picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterName {
    #[serde(rename = "informe")]
    Informe,
    #[serde(rename = "autor")]
    Autor,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "ministerio")]
    Ministerio,
    #[serde(rename = "área de gestión")]
    AreaDeGestion,
}

impl FilterName {
    pub const ALL: [FilterName; 5] = [
        FilterName::Informe,
        FilterName::Autor,
        FilterName::Date,
        FilterName::Ministerio,
        FilterName::AreaDeGestion,
    ];

    /// Label used by the filter-type dropdown.
    pub fn label(self) -> &'static str {
        match self {
            FilterName::Informe => "informe",
            FilterName::Autor => "autor",
            FilterName::Date => "date",
            FilterName::Ministerio => "ministerio",
            FilterName::AreaDeGestion => "área de gestión",
        }
    }

    /// Query parameter name sent to the search endpoint.
    pub fn wire_name(self) -> &'static str {
        match self {
            FilterName::Informe => "informe",
            FilterName::Autor => "autor",
            FilterName::Date => "fecha",
            FilterName::Ministerio => "ministerio",
            FilterName::AreaDeGestion => "area",
        }
    }

    /// Query parameter carrying this filter's comparison operator.
    pub fn comparison_key(self) -> String {
        comparison_key(self.wire_name())
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wire_name() == name)
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// Build the comparison key for any wire name, including ones outside
/// [`FilterName`] (remove controls carry raw names).
pub fn comparison_key(wire_name: &str) -> String {
    format!("{}{}", wire_name, COMPARISON_SUFFIX)
}

/// Relational qualifier applied to a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOperator {
    DifferentTo,
    EqualTo,
    GreaterThan,
    LessThan,
}

impl ComparisonOperator {
    pub const ALL: [ComparisonOperator; 4] = [
        ComparisonOperator::DifferentTo,
        ComparisonOperator::EqualTo,
        ComparisonOperator::GreaterThan,
        ComparisonOperator::LessThan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComparisonOperator::DifferentTo => "different-to",
            ComparisonOperator::EqualTo => "equal-to",
            ComparisonOperator::GreaterThan => "greater-than",
            ComparisonOperator::LessThan => "less-than",
        }
    }

    pub fn wire_token(self) -> &'static str {
        match self {
            ComparisonOperator::DifferentTo => "diferencia",
            ComparisonOperator::EqualTo => "igualdad",
            ComparisonOperator::GreaterThan => "mayorigual",
            ComparisonOperator::LessThan => "menorigual",
        }
    }

    pub fn from_wire_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_token() == token)
    }

    /// Short Spanish phrase shown on applied-filter chips.
    pub fn chip_text(self) -> &'static str {
        match self {
            ComparisonOperator::DifferentTo => "distinto de",
            ComparisonOperator::EqualTo => "igual a",
            ComparisonOperator::GreaterThan => "desde",
            ComparisonOperator::LessThan => "hasta",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComparisonOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| Error::UnknownComparison(s.to_string()))
    }
}

/// Whether a filter constrains by value or only asserts presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterBehaviour {
    HasValue,
    WithoutValue,
}

impl FilterBehaviour {
    pub fn label(self) -> &'static str {
        match self {
            FilterBehaviour::HasValue => "has-value",
            FilterBehaviour::WithoutValue => "without-value",
        }
    }
}

impl FromStr for FilterBehaviour {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "has-value" => Ok(FilterBehaviour::HasValue),
            "without-value" => Ok(FilterBehaviour::WithoutValue),
            other => Err(Error::UnknownBehaviour(other.to_string())),
        }
    }
}

/// Snapshot of the value controls in the filter picker.
///
/// The picker keeps separate comparison dropdowns for dates and for everything
/// else; which one is read depends on the selected filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub comparison: Option<ComparisonOperator>,
    #[serde(default)]
    pub date_comparison: Option<ComparisonOperator>,
}

impl Selections {
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_comparison(mut self, comparison: ComparisonOperator) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_date_comparison(mut self, comparison: ComparisonOperator) -> Self {
        self.date_comparison = Some(comparison);
        self
    }
}

/// Parse a `YYYY-MM-DD` date coming from a date control.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| Error::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// Value attached to a `has-value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDate),
}

impl FilterValue {
    /// Serialized form used as the query parameter value.
    pub fn to_wire(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Date(date) => date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// A validated pending filter edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    HasValue {
        filter: FilterName,
        value: FilterValue,
        comparison: ComparisonOperator,
    },
    WithoutValue {
        filter: FilterName,
    },
}

impl FilterEdit {
    /// Resolve the picker controls into an edit.
    ///
    /// `has-value` edits read the date control and the date comparison for the
    /// `date` filter, and the value control and generic comparison otherwise.
    pub fn from_selections(
        behaviour: FilterBehaviour,
        filter: FilterName,
        selections: &Selections,
    ) -> Result<Self> {
        match behaviour {
            FilterBehaviour::WithoutValue => Ok(FilterEdit::WithoutValue { filter }),
            FilterBehaviour::HasValue => {
                let (value, comparison) = if filter == FilterName::Date {
                    let date = selections.date.ok_or(Error::MissingSelection("date"))?;
                    (FilterValue::Date(date), selections.date_comparison)
                } else {
                    let value = selections
                        .value
                        .clone()
                        .ok_or(Error::MissingSelection("value"))?;
                    (FilterValue::Text(value), selections.comparison)
                };
                let comparison = comparison.ok_or(Error::MissingSelection("comparison"))?;
                Ok(FilterEdit::HasValue {
                    filter,
                    value,
                    comparison,
                })
            }
        }
    }

    pub fn filter(&self) -> FilterName {
        match self {
            FilterEdit::HasValue { filter, .. } | FilterEdit::WithoutValue { filter } => *filter,
        }
    }

    pub fn behaviour(&self) -> FilterBehaviour {
        match self {
            FilterEdit::HasValue { .. } => FilterBehaviour::HasValue,
            FilterEdit::WithoutValue { .. } => FilterBehaviour::WithoutValue,
        }
    }
}
