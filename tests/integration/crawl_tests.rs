//! Integration tests for the crawler
//!
//! Most tests crawl an in-memory site through a fixture fetcher so the crawl
//! order and request log are exact. The HTTP tests use wiremock to exercise
//! the reqwest-backed fetcher end-to-end.

use clinic_seo::config::{FetcherConfig, UserAgentConfig};
use clinic_seo::crawler::{
    scrape_clinic_site, CrawlResult, Crawler, FetchedPage, HttpFetcher, PageFetcher, PAGE_BUDGET,
};
use clinic_seo::FetchError;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An in-memory site: exact URL -> HTML, anything else is a 404
struct SiteGraph {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl SiteGraph {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PageFetcher for SiteGraph {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(html) => Ok(FetchedPage {
                url: url.to_string(),
                body: html.as_bytes().to_vec(),
                declared_encoding: Some("utf-8".to_string()),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn links(hrefs: &[&str]) -> String {
    hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect()
}

async fn crawl(site: &SiteGraph, seed: &str) -> (CrawlResult, Vec<(f64, String)>) {
    let mut reports = Vec::new();
    let pages = scrape_clinic_site(site, seed, |progress, message| {
        reports.push((progress, message.to_string()))
    })
    .await;
    (pages, reports)
}

#[tokio::test]
async fn test_equivalent_urls_fetched_once() {
    let site = SiteGraph::new()
        .page(
            "http://x.com/",
            links(&["/a", "/a/index.html", "/a/", "/a#section", "/a?ref=top"]),
        )
        .page("http://x.com/a", links(&["/", "/a"]));

    let (pages, _) = crawl(&site, "http://x.com/").await;

    assert_eq!(site.requested(), vec!["http://x.com/", "http://x.com/a"]);
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_other_domains_never_fetched() {
    let site = SiteGraph::new()
        .page(
            "http://x.com/",
            links(&["http://other.com/page", "http://www.x.com/", "/access"]),
        )
        .page("http://x.com/access", "<title>Access</title>")
        .page("http://other.com/page", "<title>Other</title>");

    let (pages, _) = crawl(&site, "http://x.com/").await;

    let requested = site.requested();
    assert!(!requested.iter().any(|url| url.contains("other.com")));
    assert!(!requested.iter().any(|url| url.contains("www.x.com")));
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_blog_file_and_news_rules() {
    let site = SiteGraph::new()
        .page(
            "http://x.com/",
            links(&[
                "/blog/2024/post",
                "/my-blog-info",
                "/news/",
                "/news/2024/article",
                "/topics/1",
                "/files/price.pdf",
                "/files/form.DOCX",
            ]),
        )
        .page("http://x.com/news/", "<title>News</title>")
        .page("http://x.com/blog/2024/post", "<title>Post</title>")
        .page("http://x.com/my-blog-info", "<title>Info</title>")
        .page("http://x.com/news/2024/article", "<title>Article</title>")
        .page("http://x.com/topics/1", "<title>Topic</title>");

    let (pages, _) = crawl(&site, "http://x.com/").await;

    assert_eq!(site.requested(), vec!["http://x.com/", "http://x.com/news/"]);
    assert_eq!(pages["http://x.com/news/"].title, "News");
}

#[tokio::test]
async fn test_page_budget_caps_results() {
    let hrefs: Vec<String> = (0..50).map(|i| format!("/page{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    let mut site = SiteGraph::new().page("http://x.com/", links(&href_refs));
    for i in 0..50 {
        site = site.page(
            &format!("http://x.com/page{}", i),
            format!("<title>Page {}</title>", i),
        );
    }

    let (pages, reports) = crawl(&site, "http://x.com/").await;

    assert_eq!(pages.len(), PAGE_BUDGET);
    assert_eq!(site.requested().len(), PAGE_BUDGET);
    assert_eq!(reports.len(), PAGE_BUDGET);
}

#[tokio::test]
async fn test_progress_is_monotonic_and_ends_at_one() {
    let hrefs: Vec<String> = (0..40).map(|i| format!("/p{}", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    let mut site = SiteGraph::new().page("http://x.com/", links(&href_refs));
    for i in 0..40 {
        site = site.page(&format!("http://x.com/p{}", i), "<title>p</title>");
    }

    let (_, reports) = crawl(&site, "http://x.com/").await;

    for pair in reports.windows(2) {
        assert!(pair[1].0 >= pair[0].0, "progress went backwards: {:?}", pair);
    }
    assert_eq!(reports.last().map(|r| r.0), Some(1.0));
    assert_eq!(reports[0].0, 1.0 / PAGE_BUDGET as f64);
    assert_eq!(reports[0].1, "Scraping: http://x.com/");
}

#[tokio::test]
async fn test_failed_page_does_not_abort_crawl() {
    // Page 2 of 5 is missing and always fails
    let site = SiteGraph::new()
        .page("http://x.com/", links(&["/p2", "/p3", "/p4", "/p5"]))
        .page("http://x.com/p3", "<title>3</title>")
        .page("http://x.com/p4", "<title>4</title>")
        .page("http://x.com/p5", "<title>5</title>");

    let (pages, reports) = crawl(&site, "http://x.com/").await;

    let keys: Vec<&str> = pages.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "http://x.com/",
            "http://x.com/p3",
            "http://x.com/p4",
            "http://x.com/p5"
        ]
    );

    assert_eq!(reports.len(), 5);
    let (failed_progress, failed_message) = &reports[1];
    assert_eq!(*failed_progress, reports[0].0);
    assert!(failed_message.starts_with("Error"));
    assert!(failed_message.contains("http://x.com/p2"));
    assert!(failed_message.contains("HTTP 404"));
}

#[tokio::test]
async fn test_display_urls_are_decoded_and_index_stripped() {
    let site = SiteGraph::new()
        .page(
            "http://x.com/index.html",
            links(&["/%E8%A8%BA%E7%99%82/index.html", "/診療/"]),
        )
        .page(
            "http://x.com/%E8%A8%BA%E7%99%82/index.html",
            "<title>診療案内</title>",
        );

    let (pages, _) = crawl(&site, "http://x.com/index.html").await;

    let keys: Vec<&str> = pages.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["http://x.com/", "http://x.com/診療/"]);
    assert_eq!(site.requested().len(), 2);
}

/// Resolves `href` against `seed` the way discovered links are resolved
fn resolved(seed: &str, href: &str) -> String {
    Url::parse(seed).unwrap().join(href).unwrap().to_string()
}

#[tokio::test]
async fn test_idn_seed_crawls_in_site_links() {
    let seed = "http://山田クリニック.jp/";
    let home = resolved(seed, "/");
    let access = resolved(seed, "/access");

    let site = SiteGraph::new()
        .page(&home, links(&["/access", "/"]))
        .page(&access, "<title>アクセス</title>");

    let (pages, _) = crawl(&site, seed).await;

    assert_eq!(site.requested(), vec![home, access]);
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_mixed_case_seed_crawls_in_site_links() {
    let site = SiteGraph::new()
        .page("http://clinic.jp/", links(&["/access", "http://CLINIC.jp/"]))
        .page("http://clinic.jp/access", "<title>Access</title>");

    let (pages, _) = crawl(&site, "http://Clinic.jp/").await;

    assert_eq!(
        site.requested(),
        vec!["http://clinic.jp/", "http://clinic.jp/access"]
    );
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_default_port_seed_crawls_in_site_links() {
    let site = SiteGraph::new()
        .page("http://x.com/", links(&["/access", "http://x.com:8080/admin"]))
        .page("http://x.com/access", "<title>Access</title>");

    let (pages, _) = crawl(&site, "http://x.com:80/").await;

    assert_eq!(site.requested(), vec!["http://x.com/", "http://x.com/access"]);
    assert_eq!(pages.len(), 2);
}

#[tokio::test]
async fn test_custom_budget() {
    let site = SiteGraph::new()
        .page("http://x.com/", links(&["/a", "/b", "/c"]))
        .page("http://x.com/a", "a")
        .page("http://x.com/b", "b")
        .page("http://x.com/c", "c");

    let pages = Crawler::new(&site)
        .with_page_budget(2)
        .run("http://x.com/", |_, _| {})
        .await;

    assert_eq!(pages.len(), 2);
    assert_eq!(site.requested(), vec!["http://x.com/", "http://x.com/a"]);
}

fn test_user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

fn http_fetcher() -> HttpFetcher {
    HttpFetcher::from_config(&test_user_agent(), &FetcherConfig::default())
        .expect("Failed to build HTTP client")
}

#[tokio::test]
async fn test_http_crawl_redetects_undeclared_charset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No charset in Content-Type: declared ISO-8859-1, actually UTF-8
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>山田内科クリニック</title>
                <meta name="description" content="世田谷区の内科・小児科"></head>
                <body><address>東京都世田谷区桜新町1-2-3</address>
                <a href="/access">アクセス</a>
                <a href="/missing">壊れたリンク</a>
                <a href="/docs/guide.pdf">案内PDF</a>
                </body></html>"#
                .as_bytes()
                .to_vec(),
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/access"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>アクセス</title></head><body>駅から徒歩3分</body></html>"
                .as_bytes()
                .to_vec(),
            "text/html; charset=utf-8",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/guide.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = http_fetcher();
    let seed = format!("{}/", base_url);
    let mut reports = Vec::new();
    let pages = scrape_clinic_site(&fetcher, &seed, |p, m| reports.push((p, m.to_string()))).await;

    assert_eq!(pages.len(), 2);

    let home = &pages[seed.as_str()];
    assert_eq!(home.title, "山田内科クリニック");
    assert_eq!(home.description, "世田谷区の内科・小児科");
    assert_eq!(home.address, "東京都世田谷区桜新町1-2-3");

    let access = &pages[format!("{}/access", base_url).as_str()];
    assert_eq!(access.title, "アクセス");
    assert!(access.content.contains("駅から徒歩3分"));

    assert_eq!(reports.len(), 3);
    assert!(reports
        .iter()
        .any(|(_, m)| m.contains("/missing") && m.contains("HTTP 500")));
}

#[tokio::test]
async fn test_http_declared_shift_jis_is_honoured() {
    let mock_server = MockServer::start().await;

    let (body, _, _) =
        encoding_rs::SHIFT_JIS.encode("<html><head><title>診療時間のご案内</title></head></html>");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.into_owned(), "text/html; charset=Shift_JIS"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = http_fetcher();
    let seed = format!("{}/", mock_server.uri());
    let pages = scrape_clinic_site(&fetcher, &seed, |_, _| {}).await;

    assert_eq!(pages[seed.as_str()].title, "診療時間のご案内");
}

#[tokio::test]
async fn test_http_fetcher_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = http_fetcher();
    let url = format!("{}/gone", mock_server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(err.url(), url);
}

#[tokio::test]
async fn test_http_fetcher_reports_connection_errors() {
    // Bind an ephemeral port, then release it so nothing is listening there
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
        listener.local_addr().expect("No local address").port()
    };

    let fetcher = http_fetcher();
    let url = format!("http://127.0.0.1:{}/", port);
    let err = fetcher.fetch(&url).await.unwrap_err();

    assert!(matches!(err, FetchError::Request { .. }));
    assert_eq!(err.url(), url);
}

#[tokio::test]
async fn test_http_fetcher_reports_final_url_after_redirect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<title>New</title>".as_bytes().to_vec(),
            "text/html; charset=utf-8",
        ))
        .mount(&mock_server)
        .await;

    let fetcher = http_fetcher();
    let page = fetcher.fetch(&format!("{}/old", base_url)).await.unwrap();
    assert_eq!(page.url, format!("{}/new", base_url));
    assert_eq!(page.text(), "<title>New</title>");

    // The crawl keys the page by the URL it requested
    let seed = format!("{}/old", base_url);
    let pages = scrape_clinic_site(&fetcher, &seed, |_, _| {}).await;
    assert_eq!(pages[seed.as_str()].title, "New");
}
