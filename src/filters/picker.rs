//! Visibility of the value picker and comparison dropdowns.

use serde::Serialize;

use super::{FilterBehaviour, FilterName};

/// Which value control the filter picker shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "filter", rename_all = "kebab-case")]
pub enum PickerState {
    Hidden,
    ShownSelect(FilterName),
    ShownDate,
}

impl PickerState {
    pub fn for_selection(behaviour: FilterBehaviour, filter: FilterName) -> Self {
        match (behaviour, filter) {
            (FilterBehaviour::WithoutValue, _) => PickerState::Hidden,
            (FilterBehaviour::HasValue, FilterName::Date) => PickerState::ShownDate,
            (FilterBehaviour::HasValue, other) => PickerState::ShownSelect(other),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PickerState::Hidden => "hidden",
            PickerState::ShownSelect(_) => "shown-select",
            PickerState::ShownDate => "shown-date",
        }
    }

    /// The filter whose value dropdown is active, if any.
    pub fn active_value_picker(self) -> Option<FilterName> {
        match self {
            PickerState::Hidden => None,
            PickerState::ShownSelect(filter) => Some(filter),
            PickerState::ShownDate => Some(FilterName::Date),
        }
    }

    pub fn shows_generic_comparison(self) -> bool {
        matches!(self, PickerState::ShownSelect(_))
    }

    pub fn shows_date_comparison(self) -> bool {
        matches!(self, PickerState::ShownDate)
    }

    /// Hiding the picker also resets both comparison dropdowns.
    pub fn clears_comparisons(self) -> bool {
        matches!(self, PickerState::Hidden)
    }
}
