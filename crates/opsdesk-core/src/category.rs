//! The closed set of search index partitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A named partition of the search index.
///
/// Declaration order is significant: queries report hits category by
/// category in exactly this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Navigation,
    Employees,
    Projects,
    Finances,
    Events,
    Activities,
    Vacations,
    InfoPortal,
    Workload,
    Documents,
    Announcements,
    Conversations,
}

impl Category {
    pub const COUNT: usize = 12;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Navigation,
        Category::Employees,
        Category::Projects,
        Category::Finances,
        Category::Events,
        Category::Activities,
        Category::Vacations,
        Category::InfoPortal,
        Category::Workload,
        Category::Documents,
        Category::Announcements,
        Category::Conversations,
    ];

    /// Position in enumeration order, usable as a dense array index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name, as used in snapshot files and hit payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Navigation => "navigation",
            Category::Employees => "employees",
            Category::Projects => "projects",
            Category::Finances => "finances",
            Category::Events => "events",
            Category::Activities => "activities",
            Category::Vacations => "vacations",
            Category::InfoPortal => "infoPortal",
            Category::Workload => "workload",
            Category::Documents => "documents",
            Category::Announcements => "announcements",
            Category::Conversations => "conversations",
        }
    }

    /// Human readable label for result lists.
    pub fn label(self) -> &'static str {
        match self {
            Category::Navigation => "Navigation",
            Category::Employees => "Employees",
            Category::Projects => "Projects",
            Category::Finances => "Finances",
            Category::Events => "Events",
            Category::Activities => "Activities",
            Category::Vacations => "Vacations",
            Category::InfoPortal => "Info Portal",
            Category::Workload => "Workload",
            Category::Documents => "Documents",
            Category::Announcements => "Announcements",
            Category::Conversations => "Conversations",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts the wire name, plus snake/kebab spellings of `infoPortal`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(category) = Category::ALL.iter().copied().find(|c| c.as_str() == trimmed) {
            return Ok(category);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "infoportal" | "info_portal" | "info-portal" => Ok(Category::InfoPortal),
            other => Category::ALL
                .iter()
                .copied()
                .find(|c| c.as_str() == other)
                .ok_or_else(|| Error::UnknownCategory(s.to_string())),
        }
    }
}
