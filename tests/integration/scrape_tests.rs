//! End-to-end scrapes against mock sites

use sitescope::config::{EngineConfig, ScraperConfig};
use sitescope::crawler::scrape;
use sitescope::output::PageStats;
use sitescope::{ConfigError, ScopeError, Scraper};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a quiet scraper configuration for the given seed
fn create_test_config(website: &str, max_depth: u32, async_mode: bool) -> ScraperConfig {
    ScraperConfig {
        id: 7,
        website: website.to_string(),
        max_depth,
        recursively: true,
        print_logs: false,
        async_mode,
    }
}

fn engine_config() -> EngineConfig {
    EngineConfig {
        user_agent: "SitescopeTest/1.0".to_string(),
        request_timeout: 5,
        parallelism: 4,
    }
}

/// Serves `body` as HTML at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Serves `body` as HTML at `route` and asserts it is never requested
async fn mount_unreachable_page(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(server)
        .await;
}

fn find<'a>(stats: &'a [PageStats], url: &str) -> Option<&'a PageStats> {
    stats.iter().find(|s| s.url == url)
}

fn sorted_urls(stats: &[PageStats]) -> Vec<String> {
    let mut urls: Vec<String> = stats.iter().map(|s| s.url.clone()).collect();
    urls.sort();
    urls
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        &format!(
            r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            <a href="https://elsewhere.invalid/">Elsewhere</a>
            <a href="mailto:someone@example.com">Mail</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_page(
        &server,
        "/page1",
        r#"<html><body><a href="page3">Page 3</a><a href="/">Home</a></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/page2",
        r#"<html><body><a href="/page1#top">Page 1 again</a></body></html>"#,
    )
    .await;
    mount_page(&server, "/page3", "<html><body>Leaf</body></html>").await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 2, true), engine_config());
    scraper.scrape().await.expect("scrape should succeed");

    let stats = scraper.report();
    assert_eq!(
        sorted_urls(&stats),
        vec![
            format!("{}/", base),
            format!("{}/page1", base),
            format!("{}/page2", base),
            format!("{}/page3", base),
        ]
    );

    let home = find(&stats, &seed).unwrap();
    assert_eq!(home.depth, 0);
    assert_eq!(home.status_code, 200);
    assert_eq!(home.hits, 1);
    assert_eq!(home.content_type.as_deref(), Some("text/html"));
    assert!(home.total_bytes > 0);

    assert_eq!(find(&stats, &format!("{}/page1", base)).unwrap().depth, 1);
    assert_eq!(find(&stats, &format!("{}/page2", base)).unwrap().depth, 1);
    assert_eq!(find(&stats, &format!("{}/page3", base)).unwrap().depth, 2);

    // Every page is fetched exactly once, however many links point at it.
    assert!(stats.iter().all(|s| s.hits == 1));
}

#[tokio::test]
async fn test_crawl_respects_max_depth() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", r#"<a href="/b">B</a>"#).await;
    mount_unreachable_page(&server, "/b").await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 1, false), engine_config());
    scraper.scrape().await.unwrap();

    let stats = scraper.report();
    assert_eq!(stats.len(), 2);
    assert!(find(&stats, &format!("{}/b", base)).is_none());
}

#[tokio::test]
async fn test_max_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_unreachable_page(&server, "/a").await;

    let seed = format!("{}/", base);
    let pages = scrape(create_test_config(&seed, 0, true), engine_config())
        .await
        .unwrap();

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].url, seed);
}

#[tokio::test]
async fn test_no_follow_fetches_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/page1">Page 1</a>"#).await;
    mount_unreachable_page(&server, "/page1").await;

    let seed = format!("{}/", base);
    let mut config = create_test_config(&seed, 3, true);
    config.recursively = false;

    let scraper = Scraper::with_engine_config(config, engine_config());
    scraper.scrape().await.unwrap();

    assert_eq!(scraper.report().len(), 1);
}

#[tokio::test]
async fn test_malformed_seed_aborts_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = Scraper::with_engine_config(
        create_test_config("not a url at all", 2, true),
        engine_config(),
    );
    let result = scraper.scrape().await;

    assert!(matches!(
        result,
        Err(ScopeError::Config(ConfigError::InvalidUrl(_)))
    ));
    assert!(scraper.report().is_empty());

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_forbidden_seed_host_finishes_with_empty_report() {
    // Trimming leading 'w' characters turns "wally" into "ally", so the seed's
    // own host is not in the allowed set and nothing is fetched.
    let scraper = Scraper::with_engine_config(
        create_test_config("http://wally.example.com/", 2, true),
        engine_config(),
    );

    tokio::time::timeout(Duration::from_secs(5), scraper.scrape())
        .await
        .expect("scrape should terminate")
        .unwrap();

    assert!(scraper.report().is_empty());
}

#[tokio::test]
async fn test_report_is_idempotent() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/one">1</a><a href="/two">2</a>"#).await;
    mount_page(&server, "/one", "<p>one</p>").await;
    mount_page(&server, "/two", "<p>two</p>").await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 2, true), engine_config());
    scraper.scrape().await.unwrap();

    let mut first = scraper.report();
    let mut second = scraper.report();
    first.sort_by(|a, b| a.url.cmp(&b.url));
    second.sort_by(|a, b| a.url.cmp(&b.url));

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_error_status_is_not_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">Missing</a><a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 2, true), engine_config());
    scraper.scrape().await.unwrap();

    let stats = scraper.report();
    assert_eq!(
        sorted_urls(&stats),
        vec![format!("{}/", base), format!("{}/ok", base)]
    );
}

#[tokio::test]
async fn test_links_in_non_html_bodies_are_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/data.json">Data</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"html": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
        )
        .mount(&server)
        .await;
    mount_unreachable_page(&server, "/hidden").await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 3, true), engine_config());
    scraper.scrape().await.unwrap();

    let stats = scraper.report();
    let data = find(&stats, &format!("{}/data.json", base)).expect("JSON page recorded");
    assert_eq!(data.content_type.as_deref(), Some("application/json"));
    assert_eq!(stats.len(), 2);
}

#[tokio::test]
async fn test_fetch_duration_is_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>slow</p>", "text/html")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 0, false), engine_config());
    scraper.scrape().await.unwrap();

    let stats = scraper.report();
    assert_eq!(stats.len(), 1);
    assert!(stats[0].total_duration >= Duration::from_millis(100));
    assert_eq!(stats[0].max_duration, stats[0].total_duration);
}

#[tokio::test]
async fn test_sync_and_async_modes_agree() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/item/{}">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", &links).await;
    for i in 0..20 {
        mount_page(&server, &format!("/item/{}", i), "<p>item</p>").await;
    }

    let seed = format!("{}/", base);
    let sync_pages = scrape(create_test_config(&seed, 1, false), engine_config())
        .await
        .unwrap();
    let async_pages = scrape(create_test_config(&seed, 1, true), engine_config())
        .await
        .unwrap();

    assert_eq!(sync_pages.len(), 21);
    assert_eq!(sorted_urls(&sync_pages), sorted_urls(&async_pages));
}

#[tokio::test]
async fn test_second_scrape_is_rejected() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>home</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let seed = format!("{}/", base);
    let scraper = Scraper::with_engine_config(create_test_config(&seed, 1, true), engine_config());
    scraper.scrape().await.unwrap();

    let second = scraper.scrape().await;
    assert!(matches!(second, Err(ScopeError::AlreadyScraped { id: 7 })));
    assert_eq!(scraper.report().len(), 1);
}
