use serde::{Deserialize, Serialize};

/// Embedded part detail, present when the record is fetched with
/// `part_detail` expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PartDetail {
    pub pk: i64,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub trackable: bool,
    #[serde(default)]
    pub assembly: bool,
    #[serde(default)]
    pub salable: bool,
    #[serde(default)]
    pub component: bool,
}

impl PartDetail {
    /// Display name, preferring the fully qualified variant.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}
