use serde::Deserialize;

use super::track::string_or_number;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "updateFrequency")]
    pub update_frequency: Option<String>,
}

impl ChartSummary {
    pub fn frequency_label(&self) -> &str {
        self.update_frequency
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or("Updated regularly")
    }
}
