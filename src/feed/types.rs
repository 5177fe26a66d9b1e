use serde::Deserialize;

/// One search hit, normalized away from the provider's wire format.
/// Identity is the link; title and description are display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: Option<String>,
    pub link: String,
    pub description: Option<String>,
}

impl SearchResult {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            title: None,
            link: link.into(),
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Title for display; falls back to the link when the provider sent none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.link)
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Custom Search JSON API v1 response. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct CustomSearchResponse {
    #[serde(default)]
    pub items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct CustomSearchItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}
