//! Stock detection strategies.
//!
//! A [`DetectionRule`] is resolved from the monitors file once at startup;
//! this module only interprets markup against it. Both strategies are pure
//! and synchronous, so the parsed document never lives across an `.await`.

use scraper::{ElementRef, Html};
use stockwatch_core::{CssSelector, DetectionRule, SelectorRule, StockVerdict, SubstringRule};

use crate::error::DetectError;

/// Turns fetched markup into a [`StockVerdict`].
pub trait StockDetector {
    /// # Errors
    ///
    /// Returns [`DetectError`] when the markup cannot be evaluated at all.
    /// "Evaluated and out of stock" is an `Ok` verdict with `in_stock == false`.
    fn detect(&self, markup: &str) -> Result<StockVerdict, DetectError>;
}

impl StockDetector for DetectionRule {
    fn detect(&self, markup: &str) -> Result<StockVerdict, DetectError> {
        match self {
            DetectionRule::Substring(rule) => rule.detect(markup),
            DetectionRule::Selector(rule) => rule.detect(markup),
        }
    }
}

impl StockDetector for SubstringRule {
    /// Never fails: the markup is not parsed, so an empty body simply lacks
    /// the keyword.
    fn detect(&self, markup: &str) -> Result<StockVerdict, DetectError> {
        let in_stock = !markup.contains(&self.out_of_stock_keyword);
        Ok(StockVerdict::bare(in_stock))
    }
}

impl StockDetector for SelectorRule {
    fn detect(&self, markup: &str) -> Result<StockVerdict, DetectError> {
        ensure_not_empty(markup)?;
        let document = Html::parse_document(markup);

        // Every match is inspected: a page may render the same button twice
        // (sticky header + body) with only one of them enabled.
        let mut in_stock = false;
        for element in document.select(self.selector.selector()) {
            let text = element_text(element);
            tracing::debug!(selector = %self.selector.as_str(), text = %text, "stock element");
            if is_positive(self, &text) {
                in_stock = true;
            }
        }

        Ok(StockVerdict {
            price: first_text(&document, self.price_selector.as_ref()).map(|p| extract_price(&p)),
            sku: first_text(&document, self.sku_selector.as_ref()),
            item_type: first_text(&document, self.type_selector.as_ref()),
            ..StockVerdict::bare(in_stock)
        })
    }
}

fn is_positive(rule: &SelectorRule, text: &str) -> bool {
    text == rule.positive || rule.always_in_stock_text.as_deref() == Some(text)
}

fn ensure_not_empty(markup: &str) -> Result<(), DetectError> {
    if markup.trim().is_empty() {
        return Err(DetectError::EmptyDocument);
    }
    Ok(())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matched by `selector`, if any.
/// An element with only whitespace counts as absent.
fn first_text(document: &Html, selector: Option<&CssSelector>) -> Option<String> {
    let selector = selector?;
    document
        .select(selector.selector())
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

/// Drops everything before the first `$`, keeping the amount and whatever
/// follows it. Text without a `$` is returned unchanged.
pub(crate) fn extract_price(text: &str) -> String {
    match text.find('$') {
        Some(idx) => text[idx..].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "detect_test.rs"]
mod tests;
