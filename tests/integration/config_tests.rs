//! Config file to finished scrape

use sitescope::config::{load_config_with_hash, validate};
use sitescope::{ConfigError, Scraper};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_scrape_from_config_file() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Only requests carrying the configured user agent are answered.
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "ConfigBot/2.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/next">next</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .and(header("user-agent", "ConfigBot/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>end</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let file = write_config(&format!(
        r#"
[scraper]
id = 3
website = "{}/"
max-depth = 1
print-logs = false
async = true

[engine]
user-agent = "ConfigBot/2.0"
request-timeout = 5
parallelism = 2
"#,
        base
    ));

    let (config, hash) = load_config_with_hash(file.path()).unwrap();
    validate(&config).unwrap();
    assert_eq!(hash.len(), 64);

    let scraper = Scraper::with_engine_config(config.scraper, config.engine);
    assert_eq!(scraper.id(), 3);
    scraper.scrape().await.unwrap();

    assert_eq!(scraper.report().len(), 2);
}

#[test]
fn test_config_with_bad_website_fails_validation() {
    let file = write_config(
        r#"
[scraper]
website = "example.com/no-scheme"
"#,
    );

    let result = load_config_with_hash(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
}
