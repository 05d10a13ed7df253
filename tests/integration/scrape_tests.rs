//! Integration tests for the pagination loop and persistence sink
//!
//! Each test mounts synthetic search-result pages on a wiremock server and
//! runs the controller against them. Page-2+ mocks are mounted before the
//! page-1 mock because wiremock picks the first mock that matches.

use shelf_scrape::config::Config;
use shelf_scrape::output::CsvSink;
use shelf_scrape::scraper::{run_job, PaginationController, StopReason};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a listing block with a composite price element
fn listing(title: &str, whole: &str, frac: &str) -> String {
    format!(
        r#"<div class="item-cell">
             <a class="item-title" href="/p/{id}">{title}</a>
             <li class="price-current">$<strong>{whole}</strong><sup>.{frac}</sup></li>
             <li class="price-ship">Free Shipping</li>
           </div>"#,
        id = title.replace(' ', "-").to_lowercase(),
        title = title,
        whole = whole,
        frac = frac,
    )
}

/// A promotional tile: an item cell with no title element
fn title_less_block() -> String {
    r#"<div class="item-cell"><span>Sponsored: save big today</span></div>"#.to_string()
}

/// Wraps listing blocks in a full search-result page
///
/// `total_pages` controls whether the page carries a pagination summary.
fn page_html(blocks: &str, total_pages: Option<u32>) -> String {
    let summary = match total_pages {
        Some(n) => format!(
            r#"<nav class="pagination"><span class="page-title">Page 1 of {}</span></nav>"#,
            n
        ),
        None => String::new(),
    };
    format!(
        r#"<html><body><div class="list-wrap">{}{}</div></body></html>"#,
        summary, blocks
    )
}

/// Creates a test configuration pointed at the mock server
fn create_test_config(server_uri: &str, page_limit: u32, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.search.base_url = format!("{}/p/pl", server_uri);
    config.search.page_limit = page_limit;
    config.fetcher.timeout_secs = 5;
    config.fetcher.user_agents = vec!["TestAgent/1.0".to_string()];
    config.scraper.delay_min_ms = 1;
    config.scraper.delay_max_ms = 2;
    config.output.raw_dir = dir
        .path()
        .join("raw")
        .to_string_lossy()
        .to_string();
    config.output.data_dir = dir.path().join("data").to_string_lossy().to_string();
    config
}

/// Mounts a page-N response; page 1 matches the bare search URL
async fn mount_page(server: &MockServer, keyword: &str, page: u32, body: &str) {
    let mock = Mock::given(method("GET"))
        .and(path("/p/pl"))
        .and(query_param("d", keyword));
    let mock = if page > 1 {
        mock.and(query_param("page", page.to_string()))
    } else {
        mock
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_page_limit_stops_before_reported_total() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // The site claims 8 pages; the run is limited to 2
    mount_page(
        &server,
        "gpu",
        2,
        &page_html(&listing("MSI Card", "1,299", "99"), Some(8)),
    )
    .await;
    mount_page(
        &server,
        "gpu",
        1,
        &page_html(&listing("ASUS Card", "999", "00"), Some(8)),
    )
    .await;

    let config = create_test_config(&server.uri(), 2, &dir);
    let sink = CsvSink::new(&config.output.raw_dir).unwrap();
    let controller = PaginationController::new(&config, sink).unwrap();

    let outcome = controller.run("gpu").await;

    assert_eq!(outcome.stop_reason, StopReason::PageLimit);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.total_pages, Some(8));
    let titles: Vec<_> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["ASUS Card", "MSI Card"]);
}

#[tokio::test]
async fn test_empty_page_stops_even_when_more_pages_reported() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Pages 1-2 have data, page 3 is empty although the summary says 8
    mount_page(
        &server,
        "ssd",
        3,
        &page_html("", Some(8)),
    )
    .await;
    mount_page(
        &server,
        "ssd",
        2,
        &page_html(&listing("Crucial SSD", "149", "99"), Some(8)),
    )
    .await;
    mount_page(
        &server,
        "ssd",
        1,
        &page_html(&listing("Samsung SSD", "199", "99"), Some(8)),
    )
    .await;

    let config = create_test_config(&server.uri(), 0, &dir);
    let sink = CsvSink::new(&config.output.raw_dir).unwrap();
    let controller = PaginationController::new(&config, sink).unwrap();

    let outcome = controller.run("ssd").await;

    assert_eq!(outcome.stop_reason, StopReason::NoResults);
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].title, "Samsung SSD");
    assert_eq!(outcome.records[1].title, "Crucial SSD");
}

#[tokio::test]
async fn test_fetch_error_preserves_prior_pages() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Page 2 answers with a server error; mounted first so it wins
    Mock::given(method("GET"))
        .and(path("/p/pl"))
        .and(query_param("d", "cpu"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "cpu",
        1,
        &page_html(&listing("Ryzen CPU", "549", "99"), Some(8)),
    )
    .await;

    let config = create_test_config(&server.uri(), 0, &dir);
    let sink = CsvSink::new(&config.output.raw_dir).unwrap();
    let controller = PaginationController::new(&config, sink).unwrap();

    let outcome = controller.run("cpu").await;

    assert_eq!(outcome.stop_reason, StopReason::FetchError);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "Ryzen CPU");
}

#[tokio::test]
async fn test_reported_last_page_ends_full_scan() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &server,
        "ram",
        2,
        &page_html(&listing("Kingston RAM", "89", "99"), Some(2)),
    )
    .await;
    mount_page(
        &server,
        "ram",
        1,
        &page_html(&listing("Corsair RAM", "99", "99"), Some(2)),
    )
    .await;

    let config = create_test_config(&server.uri(), 0, &dir);
    let sink = CsvSink::new(&config.output.raw_dir).unwrap();
    let controller = PaginationController::new(&config, sink).unwrap();

    let outcome = controller.run("ram").await;

    assert_eq!(outcome.stop_reason, StopReason::LastPage);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.total_pages, Some(2));
    assert_eq!(outcome.records.len(), 2);
}

#[tokio::test]
async fn test_missing_summary_falls_back_to_empty_page_stop() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // No pagination summary anywhere; the empty page is the only stop
    mount_page(&server, "case", 2, &page_html("", None)).await;
    mount_page(
        &server,
        "case",
        1,
        &page_html(&listing("NZXT Case", "129", "99"), None),
    )
    .await;

    let config = create_test_config(&server.uri(), 0, &dir);
    let sink = CsvSink::new(&config.output.raw_dir).unwrap();
    let controller = PaginationController::new(&config, sink).unwrap();

    let outcome = controller.run("case").await;

    assert_eq!(outcome.stop_reason, StopReason::NoResults);
    assert_eq!(outcome.total_pages, None);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_end_to_end_job_writes_snapshots_and_csv() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Two pages, each with one real listing and one title-less tile
    let blocks_p1 = format!(
        "{}{}",
        listing("Brand X Widget", "199", "99"),
        title_less_block()
    );
    let blocks_p2 = format!(
        "{}{}",
        title_less_block(),
        listing("Brand X Widget", "199", "99")
    );
    mount_page(
        &server,
        "brand widget",
        2,
        &page_html(&blocks_p2, Some(2)),
    )
    .await;
    mount_page(
        &server,
        "brand widget",
        1,
        &page_html(&blocks_p1, Some(2)),
    )
    .await;

    let config = create_test_config(&server.uri(), 2, &dir);

    let outcome = run_job(&config, "brand widget").await.unwrap();

    assert_eq!(outcome.records.len(), 2);
    for record in &outcome.records {
        assert_eq!(record.title, "Brand X Widget");
        assert_eq!(record.brand, "Brand");
        assert_eq!(record.price, Some(199.99));
    }

    // Raw snapshots, one per fetched page
    let raw_dir = dir.path().join("raw");
    assert!(raw_dir.join("Raw_brand_widget_p_1.html").exists());
    assert!(raw_dir.join("Raw_brand_widget_p_2.html").exists());

    // Aggregate CSV: header plus exactly two rows
    let csv_path = dir.path().join("data").join("Raw_brand_widget_p2.csv");
    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(
        lines[0],
        "title,product_url,brand,price,rating,review_count,shipping"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("199.99"));
    assert!(lines[2].contains("199.99"));
}

#[tokio::test]
async fn test_job_with_no_results_writes_no_csv() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(&server, "nothing", 1, &page_html("", Some(1))).await;

    let config = create_test_config(&server.uri(), 0, &dir);

    let outcome = run_job(&config, "nothing").await.unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::NoResults);
    let csv_path = dir.path().join("data").join("Raw_nothing_p0.csv");
    assert!(!csv_path.exists());
}
