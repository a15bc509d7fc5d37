/// Filter definitions and the active filter state
///
/// The definition table is fixed at compile time. `FilterState` holds the
/// formatted value of every active filter, always in definition order, so the
/// composed filter string is deterministic no matter which slider moved last.

use std::fmt;

/// Identifies one of the fixed filters
///
/// The id doubles as the filter function name in the composed string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterId {
    Brightness,
    Contrast,
    Saturate,
    Grayscale,
    Sepia,
    Invert,
    HueRotate,
    Blur,
}

impl FilterId {
    /// All filters, in definition (and composition) order
    pub const ALL: [FilterId; 8] = [
        FilterId::Brightness,
        FilterId::Contrast,
        FilterId::Saturate,
        FilterId::Grayscale,
        FilterId::Sepia,
        FilterId::Invert,
        FilterId::HueRotate,
        FilterId::Blur,
    ];

    /// Function name used in the composed filter string
    pub fn as_str(self) -> &'static str {
        match self {
            FilterId::Brightness => "brightness",
            FilterId::Contrast => "contrast",
            FilterId::Saturate => "saturate",
            FilterId::Grayscale => "grayscale",
            FilterId::Sepia => "sepia",
            FilterId::Invert => "invert",
            FilterId::HueRotate => "hue-rotate",
            FilterId::Blur => "blur",
        }
    }

    pub fn from_name(name: &str) -> Option<FilterId> {
        FilterId::ALL.into_iter().find(|id| id.as_str() == name)
    }

    /// Position of this filter in the definition table
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn definition(self) -> &'static FilterDefinition {
        &FILTERS[self.index()]
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static, read-only descriptor of a filter slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDefinition {
    pub id: FilterId,
    /// Label shown next to the slider
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    /// Value the slider starts at and returns to on reset
    pub initial: f32,
    /// Unit suffix appended to the value ("%", "deg", "px")
    pub unit: &'static str,
}

impl FilterDefinition {
    /// Format a slider value with this filter's unit, e.g. `150%`
    pub fn format_value(&self, value: f32) -> String {
        format!("{}{}", format_number(value), self.unit)
    }

    /// Format a slider value as a filter function, e.g. `brightness(150%)`
    pub fn format_entry(&self, value: f32) -> String {
        format!("{}({})", self.id, self.format_value(value))
    }
}

/// The fixed filter set, indexed by `FilterId::index`
pub static FILTERS: [FilterDefinition; 8] = [
    FilterDefinition { id: FilterId::Brightness, label: "Brightness", min: 0.0, max: 200.0, initial: 100.0, unit: "%" },
    FilterDefinition { id: FilterId::Contrast, label: "Contrast", min: 0.0, max: 200.0, initial: 100.0, unit: "%" },
    FilterDefinition { id: FilterId::Saturate, label: "Saturation", min: 0.0, max: 200.0, initial: 100.0, unit: "%" },
    FilterDefinition { id: FilterId::Grayscale, label: "Grayscale", min: 0.0, max: 100.0, initial: 0.0, unit: "%" },
    FilterDefinition { id: FilterId::Sepia, label: "Sepia", min: 0.0, max: 100.0, initial: 0.0, unit: "%" },
    FilterDefinition { id: FilterId::Invert, label: "Invert", min: 0.0, max: 100.0, initial: 0.0, unit: "%" },
    FilterDefinition { id: FilterId::HueRotate, label: "Hue", min: 0.0, max: 360.0, initial: 0.0, unit: "deg" },
    FilterDefinition { id: FilterId::Blur, label: "Blur", min: 0.0, max: 20.0, initial: 0.0, unit: "px" },
];

/// Whole numbers print without a fractional part
fn format_number(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Active filter values as ordered `(id, formatted entry)` pairs
///
/// Empty while no image is loaded; fully populated with initial values after
/// a load or reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    entries: Vec<(FilterId, String)>,
}

impl FilterState {
    /// Every filter at its initial value
    pub fn initial() -> Self {
        Self {
            entries: FILTERS
                .iter()
                .map(|def| (def.id, def.format_entry(def.initial)))
                .collect(),
        }
    }

    /// Replace the entry for `id`, keeping definition order
    pub fn set(&mut self, id: FilterId, value: f32) {
        let entry = id.definition().format_entry(value);
        match self.entries.binary_search_by_key(&id.index(), |(e, _)| e.index()) {
            Ok(pos) => self.entries[pos].1 = entry,
            Err(pos) => self.entries.insert(pos, (id, entry)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, id: FilterId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(e, _)| *e == id)
            .map(|(_, s)| s.as_str())
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(FilterId, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether every entry sits at its initial value
    #[cfg(test)]
    pub fn is_unedited(&self) -> bool {
        *self == Self::initial()
    }

    /// Join all entries with spaces, e.g. `brightness(150%) contrast(100%)`
    pub fn compose(&self) -> String {
        self.entries
            .iter()
            .map(|(_, s)| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
