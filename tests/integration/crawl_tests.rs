//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end against a temporary output root.

use sitemap_mirror::config::Config;
use sitemap_mirror::crawler::{Coordinator, FetchError};
use sitemap_mirror::output::PageFailure;
use sitemap_mirror::MirrorError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_MAIN: &str = "The <main> tag could not be found in the HTML content.";

async fn mount(server: &MockServer, route: &str, status: u16, body: String, content_type: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", content_type),
        )
        .mount(server)
        .await;
}

async fn mount_leaf(server: &MockServer, route: &str, pages: &[&str]) {
    let base = server.uri();
    let entries: String = pages
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base, p))
        .collect();
    mount(
        server,
        route,
        200,
        format!(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#, entries),
        "application/xml",
    )
    .await;
}

async fn mount_index(server: &MockServer, route: &str, children: &[&str]) {
    let base = server.uri();
    let entries: String = children
        .iter()
        .map(|c| format!("<sitemap><loc>{}{}</loc></sitemap>", base, c))
        .collect();
    mount(
        server,
        route,
        200,
        format!(r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#, entries),
        "application/xml",
    )
    .await;
}

async fn mount_page(server: &MockServer, route: &str, main_html: &str) {
    mount(
        server,
        route,
        200,
        format!(
            r#"<html><head><title>T</title><script>track()</script></head><body><nav>Menu</nav>{}<footer>(c)</footer></body></html>"#,
            main_html
        ),
        "text/html",
    )
    .await;
}

/// Lists every file under `root`, relative to it
fn list_files(root: &Path) -> BTreeSet<PathBuf> {
    fn walk(dir: &Path, root: &Path, files: &mut BTreeSet<PathBuf>) {
        for entry in std::fs::read_dir(dir).expect("Failed to read dir") {
            let entry = entry.expect("Failed to read entry");
            let path = entry.path();
            if path.is_dir() {
                walk(&path, root, files);
            } else {
                files.insert(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }

    let mut files = BTreeSet::new();
    walk(root, root, &mut files);
    files
}

fn sitemap_url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to parse sitemap URL")
}

#[tokio::test]
async fn test_full_mirror_through_index() {
    let server = MockServer::start().await;

    mount_index(&server, "/sitemap.xml", &["/sitemap-blog.xml", "/sitemap-pages.xml"]).await;
    mount_leaf(&server, "/sitemap-blog.xml", &["/blog/2024/hello", "/blog/caf%C3%A9/notes"]).await;
    mount_leaf(&server, "/sitemap-pages.xml", &["/", "/about.html"]).await;

    mount_page(
        &server,
        "/blog/2024/hello",
        r#"<main id="post"><h1>Hello</h1><script>x()</script><style>h1{}</style><p>First post</p></main>"#,
    )
    .await;
    mount_page(&server, "/blog/caf%C3%A9/notes", "<main><p>Notes</p><img src=\"n.png\"></main>").await;
    mount_page(&server, "/", "<main><p>Home</p><form><input></form></main>").await;
    mount_page(&server, "/about.html", "<main><p>About</p><svg></svg></main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 4);
    assert_eq!(report.pages_saved(), 4);
    assert_eq!(report.sitemaps_visited, 3);

    let expected: BTreeSet<PathBuf> = [
        "127.0.0.1/blog/2024/hello.html",
        "127.0.0.1/blog/café/notes.html",
        "127.0.0.1/index.html",
        "127.0.0.1/about.html",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(list_files(&out), expected);

    let hello = std::fs::read_to_string(out.join("127.0.0.1/blog/2024/hello.html")).unwrap();
    assert_eq!(hello, r#"<main id="post"><h1>Hello</h1><p>First post</p></main>"#);

    let home = std::fs::read_to_string(out.join("127.0.0.1/index.html")).unwrap();
    assert_eq!(home, "<main><p>Home</p></main>");

    let about = std::fs::read_to_string(out.join("127.0.0.1/about.html")).unwrap();
    assert_eq!(about, "<main><p>About</p></main>");
}

#[tokio::test]
async fn test_fetch_failure_skips_only_that_page() {
    let server = MockServer::start().await;

    mount_leaf(&server, "/sitemap.xml", &["/one", "/broken", "/three"]).await;
    mount_page(&server, "/one", "<main><p>1</p></main>").await;
    mount(&server, "/broken", 500, "oops".to_string(), "text/plain").await;
    mount_page(&server, "/three", "<main><p>3</p></main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.pages_failed(), 1);

    let failures: Vec<_> = report.failures().collect();
    assert!(failures[0].0.ends_with("/broken"));
    assert!(matches!(failures[0].1, PageFailure::Fetch(_)));

    let files = list_files(&out);
    assert_eq!(files.len(), 2);
    assert!(!out.join("127.0.0.1/broken.html").exists());
}

#[tokio::test]
async fn test_request_timeout_skips_slow_page() {
    let server = MockServer::start().await;

    mount_leaf(&server, "/sitemap.xml", &["/fast", "/slow", "/after"]).await;
    mount_page(&server, "/fast", "<main>fast</main>").await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<main>too late</main>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/after", "<main>after</main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let mut config = Config::default();
    config.crawler.request_timeout = 1;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages_saved(), 2);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].0.ends_with("/slow"));
    assert!(matches!(
        failures[0].1,
        PageFailure::Fetch(FetchError::Timeout { .. })
    ));

    assert!(!out.join("127.0.0.1/slow.html").exists());
    assert!(out.join("127.0.0.1/fast.html").exists());
    assert!(out.join("127.0.0.1/after.html").exists());
}

#[tokio::test]
async fn test_missing_main_writes_diagnostic() {
    let server = MockServer::start().await;

    mount_leaf(&server, "/sitemap.xml", &["/plain"]).await;
    mount(
        &server,
        "/plain",
        200,
        "<html><body><div>No main element</div></body></html>".to_string(),
        "text/html",
    )
    .await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
    assert_eq!(report.pages_without_main(), 1);

    let written = std::fs::read_to_string(out.join("127.0.0.1/plain.html")).unwrap();
    assert_eq!(written, NO_MAIN);
}

#[tokio::test]
async fn test_rerun_produces_same_file_set() {
    let server = MockServer::start().await;

    mount_index(&server, "/sitemap.xml", &["/a.xml"]).await;
    mount_leaf(&server, "/a.xml", &["/x/y/z", "/x/"]).await;
    mount_page(&server, "/x/y/z", "<main><p>z</p></main>").await;
    mount_page(&server, "/x/", "<main><p>x</p></main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");
    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");

    coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("First crawl failed");
    let first = list_files(&out);

    // Leftovers from earlier runs are cleared
    std::fs::write(out.join("stale.html"), "stale").unwrap();

    coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Second crawl failed");
    let second = list_files(&out);

    assert_eq!(first, second);
    assert!(second.contains(Path::new("127.0.0.1/x/y/z.html")));
    assert!(second.contains(Path::new("127.0.0.1/x/index.html")));
}

#[tokio::test]
async fn test_root_sitemap_failure_is_fatal() {
    let server = MockServer::start().await;
    mount(&server, "/sitemap.xml", 404, "not found".to_string(), "text/plain").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");
    let result = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await;

    assert!(matches!(result, Err(MirrorError::RootSitemap { .. })));
}

#[tokio::test]
async fn test_broken_child_sitemap_is_reported() {
    let server = MockServer::start().await;

    mount_index(&server, "/sitemap.xml", &["/gone.xml", "/ok.xml"]).await;
    mount_leaf(&server, "/ok.xml", &["/page"]).await;
    mount_page(&server, "/page", "<main>ok</main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let coordinator = Coordinator::new(Config::default()).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/sitemap.xml"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
    assert_eq!(report.sitemap_failures.len(), 1);
    assert!(report.sitemap_failures[0].url.ends_with("/gone.xml"));
}

#[tokio::test]
async fn test_save_sitemaps_mirrors_documents() {
    let server = MockServer::start().await;

    mount_index(&server, "/maps/index.xml", &["/maps/pages.xml"]).await;
    mount_leaf(&server, "/maps/pages.xml", &["/p"]).await;
    mount_page(&server, "/p", "<main>p</main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let mut config = Config::default();
    config.crawler.save_sitemaps = true;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator
        .mirror(sitemap_url(&server, "/maps/index.xml"), &out)
        .await
        .expect("Crawl failed");

    let files = list_files(&out);
    assert!(files.contains(Path::new("[sitemaps]/127.0.0.1/maps/index.xml")));
    assert!(files.contains(Path::new("[sitemaps]/127.0.0.1/maps/pages.xml")));
    assert!(files.contains(Path::new("127.0.0.1/p.html")));

    let saved = std::fs::read_to_string(out.join("[sitemaps]/127.0.0.1/maps/pages.xml")).unwrap();
    assert!(saved.contains("<urlset"));
}

#[tokio::test]
async fn test_saved_sitemap_does_not_block_page_directory() {
    let server = MockServer::start().await;

    mount_leaf(&server, "/feed", &["/feed/first", "/feed/second"]).await;
    mount_page(&server, "/feed/first", "<main>1</main>").await;
    mount_page(&server, "/feed/second", "<main>2</main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let out = tmp.path().join("mirror");

    let mut config = Config::default();
    config.crawler.save_sitemaps = true;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .mirror(sitemap_url(&server, "/feed"), &out)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.pages_failed(), 0);

    let expected: BTreeSet<PathBuf> = [
        "[sitemaps]/127.0.0.1/feed",
        "127.0.0.1/feed/first.html",
        "127.0.0.1/feed/second.html",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    assert_eq!(list_files(&out), expected);
}

#[tokio::test]
async fn test_run_uses_configured_output_dir() {
    let server = MockServer::start().await;

    mount_leaf(&server, "/sitemap.xml", &["/only"]).await;
    mount_page(&server, "/only", "<main>only</main>").await;

    let tmp = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.crawler.sitemap_url = Some(format!("{}/sitemap.xml", server.uri()));
    config.crawler.output_dir = tmp.path().join("configured");

    let report = sitemap_mirror::run_crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
    assert!(tmp.path().join("configured/127.0.0.1/only.html").exists());
}
