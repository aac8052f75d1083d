//! Column identity used in issue messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a schema column by its 0-based position and optional header name.
///
/// Renders as `index:name`, or just `index` when the column is unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId {
    pub index: usize,
    pub name: String,
}

impl ColumnId {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.index)
        } else {
            write!(f, "{}:{}", self.index, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_index_and_name() {
        assert_eq!(ColumnId::new(0, "Birthday").to_string(), "0:Birthday");
        assert_eq!(ColumnId::new(3, "").to_string(), "3");
    }
}
