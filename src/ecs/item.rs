//! The `Item` record returned by item searches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ecs::handler::XmlRecord;

/// A catalogue item as returned inside an `<Item>` element.
///
/// The identifying fields are lifted out; every other leaf element is kept
/// under its dotted path relative to `<Item>`, e.g. `ItemAttributes.Title`.
/// Repeated elements (several `Author`s) keep every value in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Amazon Standard Identification Number
    pub asin: Option<String>,
    pub parent_asin: Option<String>,
    pub detail_page_url: Option<String>,
    pub attributes: BTreeMap<String, Vec<String>>,
    #[serde(skip)]
    path: Vec<String>,
}

impl Item {
    /// Returns the first value stored under `path`.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.attributes.get(path).and_then(|v| v.first()).map(String::as_str)
    }

    /// Returns every value stored under `path`.
    pub fn get_all(&self, path: &str) -> &[String] {
        self.attributes.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.get("ItemAttributes.Title")
    }

    pub fn authors(&self) -> &[String] {
        self.get_all("ItemAttributes.Author")
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.get("ItemAttributes.Manufacturer")
    }

    pub fn product_group(&self) -> Option<&str> {
        self.get("ItemAttributes.ProductGroup")
    }

    /// Authors if any, otherwise the manufacturer.
    pub fn byline(&self) -> Option<String> {
        if self.authors().is_empty() {
            self.manufacturer().map(String::from)
        } else {
            Some(self.authors().join(", "))
        }
    }
}

impl XmlRecord for Item {
    fn start_element(&mut self, name: &str) {
        self.path.push(name.to_string());
    }

    fn end_element(&mut self, name: &str, text: &str) {
        self.path.pop();

        if self.path.is_empty() {
            match name {
                "ASIN" => {
                    self.asin = Some(text.to_string());
                    return;
                }
                "ParentASIN" => {
                    self.parent_asin = Some(text.to_string());
                    return;
                }
                "DetailPageURL" => {
                    self.detail_page_url = Some(text.to_string());
                    return;
                }
                _ => {}
            }
        }

        // Containers close with no text of their own
        if text.is_empty() {
            return;
        }

        let key = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path.join("."), name)
        };
        self.attributes.entry(key).or_default().push(text.to_string());
    }
}
