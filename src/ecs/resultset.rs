//! Ordered record collection plus the response envelope around it.

use serde::{Deserialize, Serialize};

/// A request-level error reported inside a successful response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Records parsed from one response, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultSet<T> {
    items: Vec<T>,
    /// `OperationRequest/RequestId`
    pub request_id: Option<String>,
    /// `Request/IsValid`
    pub is_valid: Option<bool>,
    pub total_results: Option<u32>,
    pub total_pages: Option<u32>,
    pub more_search_results_url: Option<String>,
    /// Errors the service reported alongside the records.
    pub errors: Vec<ApiError>,
    #[serde(skip)]
    pending_error: Option<ApiError>,
}

impl<T> ResultSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            request_id: None,
            is_valid: None,
            total_results: None,
            total_pages: None,
            more_search_results_url: None,
            errors: Vec::new(),
            pending_error: None,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Envelope element opened outside any record.
    pub(crate) fn start_element(&mut self, name: &str) {
        if name == "Error" {
            self.pending_error = Some(ApiError::default());
        }
    }

    /// Envelope element closed outside any record, with its trimmed text.
    pub(crate) fn end_element(&mut self, name: &str, text: &str) {
        match name {
            "Code" => {
                if let Some(err) = self.pending_error.as_mut() {
                    err.code = text.to_string();
                }
            }
            "Message" => {
                if let Some(err) = self.pending_error.as_mut() {
                    err.message = text.to_string();
                }
            }
            "Error" => {
                if let Some(err) = self.pending_error.take() {
                    self.errors.push(err);
                }
            }
            "RequestId" => self.request_id = Some(text.to_string()),
            "IsValid" => self.is_valid = Some(text.eq_ignore_ascii_case("true")),
            "TotalResults" => self.total_results = text.parse().ok(),
            "TotalPages" => self.total_pages = text.parse().ok(),
            "MoreSearchResultsUrl" => self.more_search_results_url = Some(text.to_string()),
            _ => {}
        }
    }
}

impl<T> Default for ResultSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
