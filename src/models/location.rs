use serde::{Deserialize, Serialize};

/// One ancestor entry in a record's location path, root-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub pk: i64,
    pub name: String,
}
