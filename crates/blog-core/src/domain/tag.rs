use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Tag entity - attached to posts through the `post_tag` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

/// Changes needed to turn one set of tag links into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSync {
    /// Wanted but not linked yet.
    pub attach: Vec<i64>,
    /// Linked but no longer wanted.
    pub detach: Vec<i64>,
}

impl TagSync {
    /// Links present in both sets are left out of the plan.
    pub fn plan(current: &[i64], wanted: &[i64]) -> Self {
        let current: BTreeSet<i64> = current.iter().copied().collect();
        let wanted: BTreeSet<i64> = wanted.iter().copied().collect();

        Self {
            attach: wanted.difference(&current).copied().collect(),
            detach: current.difference(&wanted).copied().collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.attach.is_empty() && self.detach.is_empty()
    }
}
