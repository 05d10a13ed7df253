//! Product record type shared by the parser, controller, and output sink

use serde::Serialize;

/// One scraped product listing.
///
/// Field order is the column order of the aggregate CSV: downstream
/// consumers rely on exactly `title, product_url, brand, price, rating,
/// review_count, shipping` with a header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    /// Product title text. A listing block without a title never becomes a
    /// record, so this is always non-empty.
    pub title: String,

    /// Link target of the title element. Empty string if the anchor had no
    /// href; title presence, not href presence, gates record emission.
    pub product_url: String,

    /// Brand name from the brand-logo image title attribute, falling back
    /// to the first whitespace token of the title. Never absent.
    pub brand: String,

    /// Listing price in dollars. `None` means unextractable, which is
    /// distinct from a price of zero.
    pub price: Option<f64>,

    /// Star rating on a 0.0-5.0 scale, if the block carried one.
    pub rating: Option<f64>,

    /// Number of reviews, if the block carried a review-count node.
    pub review_count: Option<u64>,

    /// Shipping cost as free text ("Free Shipping", "$9.99 Shipping", ...).
    /// Empty string when the block has no shipping node.
    pub shipping: String,
}

impl ProductRecord {
    /// Derives the brand for a record: the brand-logo title attribute when
    /// present, otherwise the first whitespace-delimited token of the title.
    pub fn derive_brand(logo_title: Option<&str>, title: &str) -> String {
        match logo_title {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => title.split_whitespace().next().unwrap_or("").to_string(),
        }
    }
}
