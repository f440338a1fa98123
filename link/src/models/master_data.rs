use serde::{Deserialize, Serialize};

/// Option lists for the create-indent form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterData {
    #[serde(default)]
    pub indentor_names: Vec<String>,
    #[serde(default)]
    pub group_heads: Vec<String>,
    #[serde(default)]
    pub product_names: Vec<String>,
}

impl MasterData {
    pub fn is_empty(&self) -> bool {
        self.indentor_names.is_empty() && self.group_heads.is_empty() && self.product_names.is_empty()
    }
}
