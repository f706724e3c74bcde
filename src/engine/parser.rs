//! HTML element selection for `on_html` hooks
//!
//! `scraper::Html` is not `Send`, so the document is parsed and dropped inside
//! a plain function and only owned element data leaves this module.

use scraper::{Html, Selector};
use std::collections::HashMap;

/// Owned copy of a matched element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
}

/// Parses a CSS selector, reporting the selector text on failure
pub fn parse_selector(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|_| selector.to_string())
}

/// Runs every selector against the document
///
/// Returns one entry per selector, in the same order, each holding the
/// matched elements in document order.
pub fn select_elements(html: &str, selectors: &[&Selector]) -> Vec<Vec<ElementData>> {
    let document = Html::parse_document(html);

    selectors
        .iter()
        .map(|selector| {
            document
                .select(selector)
                .map(|element| ElementData {
                    name: element.value().name().to_string(),
                    attributes: element
                        .value()
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    text: element.text().collect::<String>().trim().to_string(),
                })
                .collect()
        })
        .collect()
}
