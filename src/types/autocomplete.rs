use serde::{Deserialize, Serialize};

/// Results per page, the widget's default.
pub const PAGE_SIZE: u64 = 10;

#[derive(Deserialize, Debug, Default)]
pub struct AutocompleteQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
}

impl AutocompleteQuery {
    /// Trimmed search term, `None` when nothing useful was typed.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Zero-based page index; the widget counts from 1.
    pub fn page_index(&self) -> u64 {
        self.page.unwrap_or(1).max(1) - 1
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AutocompleteResult {
    pub id: String,
    pub text: String,
    pub selected_text: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Pagination {
    pub more: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AutocompleteResponse {
    pub results: Vec<AutocompleteResult>,
    pub pagination: Pagination,
}
