//! HTML parser for search-result pages
//!
//! This module turns one page of search-result markup into typed product
//! records plus an optional total-page count. It is the single place where
//! source-site markup quirks are absorbed: every extraction rule tolerates
//! its element being absent, and only a missing title excludes a listing
//! block from the output.
//!
//! The parser is a pure function of its input: parsing the same body twice
//! yields the same records.

use crate::record::ProductRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Extracted information from one search-result page
#[derive(Debug, Clone)]
pub struct ParsedSearchPage {
    /// Product records in document order
    pub records: Vec<ProductRecord>,

    /// Total page count from the pagination summary, if one was parseable
    pub total_pages: Option<u32>,
}

static ITEM_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("div.item-cell").unwrap());
static ITEM_TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("a.item-title").unwrap());
static PAGE_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.list-wrap nav.pagination span.page-title").unwrap());
static PRICE_CURRENT: Lazy<Selector> = Lazy::new(|| Selector::parse("li.price-current").unwrap());
static PRICE_STRONG: Lazy<Selector> = Lazy::new(|| Selector::parse("strong").unwrap());
static PRICE_SUP: Lazy<Selector> = Lazy::new(|| Selector::parse("sup").unwrap());
static PRICE_AREA: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".item-action .price-area").unwrap());
static DATA_PRICE_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.item-cell[data-price]").unwrap());
static RATING_ICON: Lazy<Selector> = Lazy::new(|| Selector::parse("i.rating").unwrap());
static RATING_NUM: Lazy<Selector> = Lazy::new(|| Selector::parse("span.item-rating-num").unwrap());
static PRICE_SHIP: Lazy<Selector> = Lazy::new(|| Selector::parse("li.price-ship").unwrap());
static BRAND_IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("a.item-brand img").unwrap());

static TOTAL_PAGES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"of\s+(\d+)").unwrap());
static PRICE_DECIMAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\s*([\d,]+\.\d{2})").unwrap());
static PRICE_WHOLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\s*([\d,]+)").unwrap());
static RATING_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Rated\s+([\d\.]+)\s+out").unwrap());
static RATING_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"rating-(\d)").unwrap());
static REVIEW_COUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([\d,]+)\)").unwrap());

/// Parses one search-result page into records and an optional total-page count
///
/// Listing blocks lacking a title element are skipped silently; they are
/// typically promotional tiles, not products. All other fields are
/// best-effort and independently optional.
///
/// # Arguments
///
/// * `html` - The raw page body
///
/// # Returns
///
/// A ParsedSearchPage with records in document order
pub fn parse_search_page(html: &str) -> ParsedSearchPage {
    let document = Html::parse_document(html);

    let total_pages = extract_total_pages(&document);

    let mut records = Vec::new();
    for item in document.select(&ITEM_CELL) {
        if let Some(record) = parse_listing_block(&item) {
            records.push(record);
        }
    }

    ParsedSearchPage {
        records,
        total_pages,
    }
}

/// Extracts the total page count from the pagination summary text
///
/// The summary reads like "Page 1 of 8"; the integer after "of" is the
/// count. An absent or unparsable summary yields `None`, and the caller
/// falls back to discovering the end of the result set incrementally.
fn extract_total_pages(document: &Html) -> Option<u32> {
    let span = document.select(&PAGE_TITLE).next()?;
    let text = element_text(&span);
    let captures = TOTAL_PAGES_RE.captures(&text)?;
    captures[1].parse().ok()
}

/// Parses a single listing block, or `None` if it has no title
fn parse_listing_block(block: &ElementRef) -> Option<ProductRecord> {
    let title_a = block.select(&ITEM_TITLE).next()?;

    let title = element_text(&title_a);
    if title.is_empty() {
        return None;
    }

    let product_url = title_a.value().attr("href").unwrap_or("").to_string();
    let price = extract_price(block);
    let (rating, review_count) = extract_rating_and_reviews(block);
    let shipping = block
        .select(&PRICE_SHIP)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default();

    let logo_title = block
        .select(&BRAND_IMG)
        .next()
        .and_then(|img| img.value().attr("title"));
    let brand = ProductRecord::derive_brand(logo_title, &title);

    Some(ProductRecord {
        title,
        product_url,
        brand,
        price,
        rating,
        review_count,
        shipping,
    })
}

/// Extracts a price from a listing block, first rule that yields a value wins:
///
/// 1. Composite current-price element: whole-number part in `<strong>`,
///    two-digit cents in `<sup>`, spliced digit-wise.
/// 2. Dollar regex with two decimals, scoped to the price area if present.
/// 3. Dollar regex without decimals (whole dollars).
/// 4. `data-price` attribute on a price-bearing cell.
fn extract_price(block: &ElementRef) -> Option<f64> {
    if let Some(price) = price_from_current_element(block) {
        return Some(price);
    }

    // Narrow the regex scope to the price area when the block has one
    let search_scope = block
        .select(&PRICE_AREA)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_else(|| block.text().collect::<String>());

    let m = PRICE_DECIMAL_RE
        .captures(&search_scope)
        .or_else(|| PRICE_WHOLE_RE.captures(&search_scope));
    if let Some(captures) = m {
        if let Ok(price) = captures[1].replace(',', "").parse::<f64>() {
            return Some(price);
        }
    }

    price_from_data_attribute(block)
}

/// Price rule 1: the composite current-price element
///
/// The markup renders "$1,299" in `<strong>` with a "99" cents superscript.
/// Digits are concatenated, commas stripped, and the last two digits become
/// cents: whole "1,299" + frac "99" is exactly 1299.99. This digit splice
/// mirrors the visual markup and must not be replaced by a generic money
/// parser. A missing superscript means whole dollars ("999" -> 999.00).
fn price_from_current_element(block: &ElementRef) -> Option<f64> {
    let price_li = block.select(&PRICE_CURRENT).next()?;
    let strong = price_li.select(&PRICE_STRONG).next()?;

    let main = element_text(&strong);
    let frac = price_li
        .select(&PRICE_SUP)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_else(|| "00".to_string());
    // The superscript renders as ".99"; only its digits take part in the splice
    let frac = frac.trim_start_matches('.');

    let num_str = format!("{}{}", main, frac).replace(',', "");
    if num_str.len() < 3 || !num_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (dollars, cents) = num_str.split_at(num_str.len() - 2);
    format!("{}.{}", dollars, cents).parse().ok()
}

/// Price rule 4: a machine-readable data-price attribute
///
/// The attribute sits on the listing cell itself in current markup, but
/// older snapshots carry it on a nested cell, so both are checked.
fn price_from_data_attribute(block: &ElementRef) -> Option<f64> {
    let value = block.value().attr("data-price").or_else(|| {
        block
            .select(&DATA_PRICE_CELL)
            .next()
            .and_then(|el| el.value().attr("data-price"))
    })?;
    value.trim().parse().ok()
}

/// Extracts the star rating and review count from a listing block
///
/// The rating prefers the machine-readable accessibility label
/// ("Rated 4.5 out of 5") and falls back to the class-encoded integer
/// ("rating-4"). The review count is a parenthesized, comma-grouped
/// integer in its own text node. Either may be absent independently.
fn extract_rating_and_reviews(block: &ElementRef) -> (Option<f64>, Option<u64>) {
    let mut rating = None;

    if let Some(icon) = block.select(&RATING_ICON).next() {
        if let Some(label) = icon.value().attr("aria-label") {
            rating = RATING_LABEL_RE
                .captures(label)
                .and_then(|c| c[1].parse::<f64>().ok());
        }

        if rating.is_none() {
            let classes = icon.value().classes().collect::<Vec<_>>().join(" ");
            rating = RATING_CLASS_RE
                .captures(&classes)
                .and_then(|c| c[1].parse::<f64>().ok());
        }
    }

    let reviews = block
        .select(&RATING_NUM)
        .next()
        .and_then(|el| {
            let text = element_text(&el);
            REVIEW_COUNT_RE
                .captures(&text)
                .map(|c| c[1].replace(',', ""))
        })
        .and_then(|digits| digits.parse::<u64>().ok());

    (rating, reviews)
}

/// Collects and trims the text content of an element
fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
