use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A weighted label to be laid out in the cloud.
///
/// Field names follow the JSON option shape accepted by the front end
/// (`customClass`, `dataAttributes`, `adjustedWeight`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub weight: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data_attributes: BTreeMap<String, String>,
    /// Size tier in 1..=10, written by the weight normalizer on every pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_weight: Option<u8>,
}

impl Topic {
    pub fn new(text: impl Into<String>, weight: f64) -> Self {
        Self {
            weight,
            text: text.into(),
            url: None,
            title: None,
            custom_class: None,
            data_attributes: BTreeMap::new(),
            adjusted_weight: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_custom_class(mut self, class: impl Into<String>) -> Self {
        self.custom_class = Some(class.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data_attributes.insert(key.into(), value.into());
        self
    }

    /// Anchor target, `#` when the topic has no URL or an empty one.
    pub fn href(&self) -> &str {
        self.url.as_deref().filter(|s| !s.is_empty()).unwrap_or("#")
    }

    /// Tooltip text, the topic text when the title is missing or empty.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.text)
    }
}
