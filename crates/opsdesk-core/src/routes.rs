//! The single category -> navigation route table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::Category;

pub const GLOBAL_DEFAULT_ROUTE: &str = "/dashboard";

/// Resolves where a hit navigates to.
///
/// Resolution order: explicit record path, then the category's default
/// route, then the global default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    default_route: String,
    routes: BTreeMap<Category, String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        let routes = [
            (Category::Employees, "/employees"),
            (Category::Projects, "/projects"),
            (Category::Finances, "/finances"),
            (Category::Events, "/calendar"),
            (Category::Activities, "/tasks"),
            (Category::Vacations, "/vacations"),
            (Category::InfoPortal, "/info-portal"),
            (Category::Workload, "/workload"),
            (Category::Documents, "/documents"),
            (Category::Announcements, "/notifications"),
            (Category::Conversations, "/messages"),
        ]
        .into_iter()
        .map(|(c, r)| (c, r.to_string()))
        .collect();
        Self { default_route: GLOBAL_DEFAULT_ROUTE.to_string(), routes }
    }
}

impl RouteTable {
    /// A table with no per-category routes at all.
    pub fn empty(default_route: impl Into<String>) -> Self {
        Self { default_route: default_route.into(), routes: BTreeMap::new() }
    }

    #[must_use]
    pub fn with_route(mut self, category: Category, route: impl Into<String>) -> Self {
        self.routes.insert(category, route.into());
        self
    }

    #[must_use]
    pub fn with_default_route(mut self, route: impl Into<String>) -> Self {
        self.default_route = route.into();
        self
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    pub fn route_for(&self, category: Category) -> Option<&str> {
        self.routes.get(&category).map(String::as_str)
    }

    pub fn resolve<'a>(&'a self, category: Category, explicit: Option<&'a str>) -> &'a str {
        explicit
            .filter(|p| !p.is_empty())
            .or_else(|| self.route_for(category))
            .unwrap_or(&self.default_route)
    }
}
