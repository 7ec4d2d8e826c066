//! Query identities addressing cached pages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Filter;

/// (collection name, active filter). Each identity owns an independent
/// cached snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryIdentity {
    pub collection: String,
    pub filter: Filter,
}

impl QueryIdentity {
    pub fn new(collection: impl Into<String>, filter: Filter) -> Self {
        Self { collection: collection.into(), filter }
    }

    /// Same collection, different filter.
    pub fn with_filter(&self, filter: Filter) -> Self {
        Self { collection: self.collection.clone(), filter }
    }
}

impl fmt::Display for QueryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.filter)
    }
}
