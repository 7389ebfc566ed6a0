//! Table location and text extraction over parsed HTML.
//!
//! The scraped pages are not under our control, so "which table" is behind
//! the [`TableLocator`] trait and each fetcher is handed the locator it uses.
//! Structural drift on a page then only means swapping a locator.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScanError};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("static selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("static selector"));
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));

/// Finds the one table a page's data lives in.
pub trait TableLocator: Send + Sync {
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>>;
}

/// The first `<table>` in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTable;

impl TableLocator for FirstTable {
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&TABLE).next()
    }
}

/// The first table whose flattened text contains a literal label.
#[derive(Debug, Clone)]
pub struct TableWithLabel {
    pub label: String,
}

impl TableWithLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl TableLocator for TableWithLabel {
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .select(&TABLE)
            .find(|table| table.text().collect::<Vec<_>>().join("|").contains(&self.label))
    }
}

/// The first table carrying a given CSS class.
#[derive(Debug, Clone)]
pub struct TableWithClass {
    selector: Selector,
}

impl TableWithClass {
    pub fn new(class: &str) -> Result<Self> {
        let selector = Selector::parse(&format!("table.{class}"))
            .map_err(|e| ScanError::Selector(format!("table.{class}: {e:?}")))?;
        Ok(Self { selector })
    }
}

impl TableLocator for TableWithClass {
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

/// All `<tr>` elements under `table`, nested tables included.
pub fn rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    table.select(&ROW).collect()
}

/// Trimmed text of every `<th>` in a row.
pub fn header_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&HEADER_CELL).map(cell_text).collect()
}

/// Trimmed text of every `<td>` in a row.
pub fn data_cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&DATA_CELL).map(cell_text).collect()
}

/// Concatenated text content of an element, trimmed.
pub fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text fragments of an element in document order, trimmed, blanks dropped.
pub fn flatten_text(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The fragment right after the first fragment equal to `label`.
pub fn value_after_label(element: ElementRef<'_>, label: &str) -> Option<String> {
    let fragments = flatten_text(element);
    let pos = fragments.iter().position(|f| f == label)?;
    fragments.into_iter().nth(pos + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <table id="nav"><tr><td>Home</td><td>Screener</td></tr></table>
          <table id="snapshot">
            <tr><td>Market Cap</td><td><b>12.3M</b></td></tr>
            <tr><td>Shs Float</td><td><b>2.1M</b></td></tr>
          </table>
          <table class="fullview-news-outer">
            <tr><td>Oct-18-26 08:00AM</td><td><a href="/n">Acme beats estimates</a></td></tr>
          </table>
        </body></html>
    "#;

    fn id_of(table: ElementRef<'_>) -> Option<&str> {
        table.value().attr("id")
    }

    #[test]
    fn first_table_is_document_order() {
        let doc = Html::parse_document(PAGE);
        let table = FirstTable.locate(&doc).unwrap();
        assert_eq!(id_of(table), Some("nav"));
    }

    #[test]
    fn label_locator_skips_tables_without_label() {
        let doc = Html::parse_document(PAGE);
        let table = TableWithLabel::new("Shs Float").locate(&doc).unwrap();
        assert_eq!(id_of(table), Some("snapshot"));
        assert!(TableWithLabel::new("Short Float").locate(&doc).is_none());
    }

    #[test]
    fn class_locator_matches_class() {
        let doc = Html::parse_document(PAGE);
        let table = TableWithClass::new("fullview-news-outer").unwrap().locate(&doc).unwrap();
        assert_eq!(rows(table).len(), 1);
        assert!(TableWithClass::new("missing").unwrap().locate(&doc).is_none());
    }

    #[test]
    fn invalid_class_is_a_selector_error() {
        assert!(matches!(TableWithClass::new("1bad"), Err(ScanError::Selector(_))));
    }

    #[test]
    fn value_follows_label_across_markup() {
        let doc = Html::parse_document(PAGE);
        let table = TableWithLabel::new("Shs Float").locate(&doc).unwrap();
        assert_eq!(value_after_label(table, "Shs Float").as_deref(), Some("2.1M"));
        assert_eq!(value_after_label(table, "Market Cap").as_deref(), Some("12.3M"));
        assert_eq!(value_after_label(table, "Float %"), None);
    }

    #[test]
    fn label_in_last_cell_has_no_value() {
        let doc = Html::parse_document("<table><tr><td>Shs Float</td></tr></table>");
        let table = FirstTable.locate(&doc).unwrap();
        assert_eq!(value_after_label(table, "Shs Float"), None);
    }

    #[test]
    fn cells_are_trimmed() {
        let doc = Html::parse_document(
            "<table><tr><th> Ticker </th><th>Company</th></tr><tr><td>\n ABCD </td><td><a>Abc</a> Corp</td></tr></table>",
        );
        let table = FirstTable.locate(&doc).unwrap();
        let rows = rows(table);
        assert_eq!(header_cells(rows[0]), vec!["Ticker", "Company"]);
        assert_eq!(data_cells(rows[1]), vec!["ABCD", "Abc Corp"]);
    }
}
