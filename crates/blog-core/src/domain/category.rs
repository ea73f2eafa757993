use serde::{Deserialize, Serialize};

/// Category entity - every post is filed under exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
