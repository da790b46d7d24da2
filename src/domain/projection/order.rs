use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Column of the board a sort can be keyed on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize,
)]
pub enum SortField {
    #[strum(serialize = "market")]
    #[serde(rename = "market")]
    Market,

    #[strum(serialize = "last")]
    #[serde(rename = "last")]
    Last,

    #[strum(serialize = "volumeQuote")]
    #[serde(rename = "volumeQuote")]
    VolumeQuote,

    #[strum(serialize = "change24h")]
    #[serde(rename = "change24h")]
    Change24h,
}

impl SortField {
    /// Column heading used by the table header.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Market => "Market",
            Self::Last => "Price",
            Self::VolumeQuote => "Volume (24H)",
            Self::Change24h => "Change (24H)",
        }
    }

    /// Whether values of this column are compared as numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Market)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize)]
pub enum SortDirection {
    #[strum(serialize = "asc")]
    #[serde(rename = "asc")]
    Ascending,

    #[strum(serialize = "desc")]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The single active sort directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: SortField,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    /// Same field flips the direction, another field starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.direction.flipped())
        } else {
            Self::ascending(field)
        }
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::ascending(SortField::Market)
    }
}
