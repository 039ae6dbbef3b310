//! End-to-end builds against a stub content API

use axum::{
    extract::{Path as UrlPath, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cms_blog::config::SiteConfig;
use cms_blog::generator::{page_output_path, Generator};
use cms_blog::{BuildError, Site};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const KEY: &str = "test-secret";

struct StubApi {
    collection: Value,
    collection_status: StatusCode,
    posts: HashMap<String, Value>,
    item_requests: AtomicUsize,
    collection_queries: Mutex<Vec<Option<String>>>,
}

impl StubApi {
    fn new(collection: Value, posts: Vec<Value>) -> Self {
        Self {
            collection,
            collection_status: StatusCode::OK,
            posts: posts
                .into_iter()
                .map(|p| (p["id"].as_str().unwrap().to_string(), p))
                .collect(),
            item_requests: AtomicUsize::new(0),
            collection_queries: Mutex::new(Vec::new()),
        }
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == KEY)
}

async fn collection(
    State(api): State<Arc<StubApi>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    api.collection_queries.lock().unwrap().push(query);
    if api.collection_status != StatusCode::OK {
        return api.collection_status.into_response();
    }
    Json(api.collection.clone()).into_response()
}

async fn item(
    State(api): State<Arc<StubApi>>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    api.item_requests.fetch_add(1, Ordering::SeqCst);
    match api.posts.get(&id) {
        Some(post) => Json(post.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_api(api: Arc<StubApi>) -> String {
    let app = Router::new()
        .route("/blogs", get(collection))
        .route("/blogs/:id", get(item))
        .with_state(api);
    serve(app).await
}

fn site(dir: &std::path::Path, endpoint: &str) -> Site {
    let mut config = SiteConfig::default();
    config.title = "My Site".to_string();
    config.api.endpoint = endpoint.to_string();
    config.api.api_key = KEY.to_string();
    Site::with_config(dir, config)
}

fn posts() -> Vec<Value> {
    vec![
        json!({
            "id": "a1",
            "title": "Hi",
            "body": "<p>x</p><pre><code>print(1)</code></pre>",
            "tags": [{"id": "t1", "name": "go"}],
            "createdAt": "2024-01-01T00:00:00Z",
            "eyecatch": {"url": "https://example.com/a.png"}
        }),
        json!({
            "id": "b2",
            "title": "Second",
            "body": "<p>no code here</p>",
            "tags": [],
            "createdAt": "2024-02-03T10:00:00Z",
            "updatedAt": "2024-02-04T10:00:00Z",
            "publishedAt": "2024-02-03T10:00:00Z",
            "revisedAt": "2024-02-04T10:00:00Z",
            "featured": true
        }),
    ]
}

fn collection_json() -> Value {
    json!({"contents": [{"id": "a1"}, {"id": "b2"}], "totalCount": 2, "offset": 0, "limit": 10})
}

fn build_error(err: &anyhow::Error) -> &BuildError {
    err.chain()
        .find_map(|e| e.downcast_ref::<BuildError>())
        .expect("error chain should contain a BuildError")
}

#[tokio::test]
async fn test_generate_writes_every_page() {
    let endpoint = spawn_api(Arc::new(StubApi::new(collection_json(), posts()))).await;
    let dir = tempfile::tempdir().unwrap();
    let mut site = site(dir.path(), &endpoint);
    site.config.build.emit_data = true;

    // leftovers from a previous build
    let stale = page_output_path(&site.public_dir, "old");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "stale").unwrap();

    let report = site.generate().await.unwrap();
    assert_eq!(report.pages_written, 2);
    assert_eq!(report.paths.paths, vec!["/blogs/a1", "/blogs/b2"]);
    assert!(!report.paths.fallback);

    let a1 = fs::read_to_string(page_output_path(&site.public_dir, "a1")).unwrap();
    assert!(a1.contains("<title>Hi | My Site</title>"));
    assert!(a1.contains(">2024-01-01</time>"));
    assert!(a1.contains(r#"data-key="t1""#));
    assert!(a1.contains("<p>x</p><pre><code class=\"hljs\">"));

    let b2 = fs::read_to_string(page_output_path(&site.public_dir, "b2")).unwrap();
    assert!(b2.contains("<div class=\"blog-content\"><p>no code here</p></div>"));

    assert!(!stale.exists());
    assert!(site.public_dir.join("css/highlight.css").exists());

    let data: Value =
        serde_json::from_str(&fs::read_to_string(site.public_dir.join("blogs/a1.json")).unwrap())
            .unwrap();
    assert_eq!(data["title"], "My Site");
    assert_eq!(data["blog"].as_object().unwrap().len(), 9);
    assert!(data["blog"].get("eyecatch").is_none());
    assert!(data["blog"]["body"].as_str().unwrap().starts_with("<p>x</p>"));
}

#[tokio::test]
async fn test_collection_failure_aborts_build() {
    let mut api = StubApi::new(collection_json(), posts());
    api.collection_status = StatusCode::INTERNAL_SERVER_ERROR;
    let api = Arc::new(api);
    let endpoint = spawn_api(api.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);

    let err = site.generate().await.unwrap_err();
    assert_eq!(
        build_error(&err).status(),
        Some(StatusCode::INTERNAL_SERVER_ERROR)
    );
    assert_eq!(api.item_requests.load(Ordering::SeqCst), 0);
    assert!(!site.public_dir.join("blogs").exists());
}

#[tokio::test]
async fn test_item_failure_writes_nothing() {
    let mut posts = posts();
    posts.truncate(1);
    let endpoint = spawn_api(Arc::new(StubApi::new(collection_json(), posts))).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);

    let err = site.generate().await.unwrap_err();
    assert_eq!(build_error(&err).status(), Some(StatusCode::NOT_FOUND));
    assert!(!page_output_path(&site.public_dir, "a1").exists());
}

#[tokio::test]
async fn test_wrong_api_key_is_fatal() {
    let endpoint = spawn_api(Arc::new(StubApi::new(collection_json(), posts()))).await;
    let dir = tempfile::tempdir().unwrap();
    let mut site = site(dir.path(), &endpoint);
    site.config.api.api_key = "wrong".to_string();

    let err = site.generate().await.unwrap_err();
    assert_eq!(build_error(&err).status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_malformed_collection_is_fatal() {
    let endpoint = spawn_api(Arc::new(StubApi::new(json!({"items": []}), posts()))).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);

    let err = site.generate().await.unwrap_err();
    assert!(matches!(build_error(&err), BuildError::Decode { .. }));
}

#[tokio::test]
async fn test_malformed_post_is_fatal() {
    let broken = vec![json!({"id": "a1", "title": "no body or date"})];
    let collection = json!({"contents": [{"id": "a1"}]});
    let endpoint = spawn_api(Arc::new(StubApi::new(collection, broken))).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);

    let err = site.generate().await.unwrap_err();
    assert!(matches!(build_error(&err), BuildError::Decode { .. }));
    assert!(!page_output_path(&site.public_dir, "a1").exists());
}

#[tokio::test]
async fn test_returned_id_must_match_route() {
    let mut api = StubApi::new(collection_json(), posts());
    let mut escaped = posts()[0].clone();
    escaped["id"] = json!("../../escaped");
    api.posts.insert("a1".to_string(), escaped);
    let endpoint = spawn_api(Arc::new(api)).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);

    let err = site.generate().await.unwrap_err();
    match build_error(&err) {
        BuildError::IdMismatch { requested, returned } => {
            assert_eq!(requested, "a1");
            assert_eq!(returned, "../../escaped");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("escaped").exists());
    assert!(!site.public_dir.join("blogs").exists());
}

#[tokio::test]
async fn test_collection_limit_is_sent() {
    let api = Arc::new(StubApi::new(collection_json(), posts()));
    let endpoint = spawn_api(api.clone()).await;
    let dir = tempfile::tempdir().unwrap();

    let generator = Generator::new(&site(dir.path(), &endpoint)).unwrap();
    generator.paths().await.unwrap();

    let mut limited = site(dir.path(), &endpoint);
    limited.config.api.collection_limit = Some(100);
    let generator = Generator::new(&limited).unwrap();
    generator.paths().await.unwrap();

    assert_eq!(
        *api.collection_queries.lock().unwrap(),
        vec![None, Some("limit=100".to_string())]
    );
}

#[tokio::test]
async fn test_paths_and_render_one() {
    let endpoint = spawn_api(Arc::new(StubApi::new(collection_json(), posts()))).await;
    let dir = tempfile::tempdir().unwrap();
    let generator = Generator::new(&site(dir.path(), &endpoint)).unwrap();

    let paths = generator.paths().await.unwrap();
    assert_eq!(paths.paths, vec!["/blogs/a1", "/blogs/b2"]);
    assert!(!paths.fallback);

    let html = generator.render_one("a1").await.unwrap();
    assert!(html.contains("<p class=\"text-2xl font-semibold\">Hi</p>"));
    assert!(!dir.path().join("public").exists());
}

#[tokio::test]
async fn test_server_serves_only_generated_posts() {
    let endpoint = spawn_api(Arc::new(StubApi::new(collection_json(), posts()))).await;
    let dir = tempfile::tempdir().unwrap();
    let site = site(dir.path(), &endpoint);
    site.generate().await.unwrap();

    let base = serve(cms_blog::server::router(&site.public_dir)).await;

    let page = reqwest::get(format!("{}/blogs/a1/", base)).await.unwrap();
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.text().await.unwrap().contains("<title>Hi | My Site</title>"));

    let missing = reqwest::get(format!("{}/blogs/zz/", base)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
