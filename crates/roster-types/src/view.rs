use serde::{Deserialize, Serialize};

// ============================================================================
// Page size
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid page size '{0}' (allowed: 5, 10, 20, 50)")]
pub struct InvalidPageSize(pub String);

impl PageSize {
    pub const OPTIONS: [u32; 4] = [5, 10, 20, 50];

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(5)
    }
}

impl TryFrom<u32> for PageSize {
    type Error = InvalidPageSize;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if Self::OPTIONS.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(InvalidPageSize(value.to_string()))
        }
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        size.0
    }
}

impl std::str::FromStr for PageSize {
    type Err = InvalidPageSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| InvalidPageSize(s.to_string()))?;
        PageSize::try_from(value)
    }
}

impl std::fmt::Display for PageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortColumn {
    FirstName,
    LastName,
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot sort by '{0}' (sortable: first-name, last-name, email)")]
pub struct UnknownSortColumn(pub String);

impl std::str::FromStr for SortColumn {
    type Err = UnknownSortColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first-name" | "first_name" => Ok(SortColumn::FirstName),
            "last-name" | "last_name" => Ok(SortColumn::LastName),
            "email" => Ok(SortColumn::Email),
            other => Err(UnknownSortColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}
