//! Transformation functions for Dealmap API responses

use crate::attributes::{AttributeSet, SearchResult};
use crate::error::ParseError;
use crate::inflector::underscore;
use crate::xml::{Document, Element};

/// Element wrapping a single deal.
pub const DEAL_TAG: &str = "Deal";

/// Element wrapping a single business.
pub const BUSINESS_TAG: &str = "Business";

/// Element carrying the server-side match count.
pub const TOTAL_TAG: &str = "TotalResults";

/// Build a record from the immediate children of `element`.
///
/// Each child contributes one entry: its tag name run through
/// [`underscore`] as the key, its whole text content trimmed as the value.
pub fn attribute_set(element: &Element) -> AttributeSet {
    element
        .child_elements()
        .map(|child| (underscore(child.name()), child.text().trim().to_string()))
        .collect()
}

/// Transform a search response body into its records and total.
///
/// `record_tag` is [`DEAL_TAG`] or [`BUSINESS_TAG`]. Records may sit at any
/// depth. The first `<TotalResults>` must be present and hold an unsigned
/// integer; there is no fallback to zero.
pub fn transform_search_response(body: &str, record_tag: &str) -> Result<SearchResult, ParseError> {
    let doc = Document::parse(body)?;

    let total = parse_total(&doc)?;
    let records = doc.descendants(record_tag).map(attribute_set).collect();

    Ok(SearchResult { records, total })
}

/// Transform a deal details response body into the deal's record.
///
/// Returns `Ok(None)` when the document is well-formed but holds no `<Deal>`.
pub fn transform_deal_details(body: &str) -> Result<Option<AttributeSet>, ParseError> {
    let doc = Document::parse(body)?;
    Ok(doc.find(DEAL_TAG).map(attribute_set))
}

fn parse_total(doc: &Document) -> Result<u64, ParseError> {
    let element = doc
        .find(TOTAL_TAG)
        .ok_or(ParseError::MissingElement(TOTAL_TAG))?;

    let text = element.text();
    let value = text.trim();
    value.parse::<u64>().map_err(|_| ParseError::InvalidTotal {
        element: TOTAL_TAG,
        value: value.to_string(),
    })
}
