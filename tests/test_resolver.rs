mod common;

use common::subdir;
use lantern::config::Limits;
use lantern::error::ServeError;
use lantern::http::parser::{RequestTarget, extract_target};
use lantern::http::resolver::StaticRoot;
use vmm_sys_util::tempdir::TempDir;

fn target(name: &str) -> RequestTarget {
    let req = format!("GET /{} HTTP/1.1\r\n\r\n", name);
    extract_target(req.as_bytes(), usize::MAX).unwrap()
}

#[test]
fn test_join_at_path_limit() {
    let root = StaticRoot::new("static", &Limits::default());
    // "static" + "/" + 121 bytes = 128
    let name = "f".repeat(121);

    let path = root.join(&target(&name)).unwrap();

    assert_eq!(path.as_os_str().len(), 128);
    assert!(path.ends_with(&name));
}

#[test]
fn test_join_beyond_path_limit_fails() {
    let root = StaticRoot::new("static", &Limits::default());
    let name = "f".repeat(122);

    let result = root.join(&target(&name));

    assert!(matches!(
        result,
        Err(ServeError::PathOverflow { len: 129, max: 128 })
    ));
}

#[tokio::test]
async fn test_resolve_beyond_path_limit_fails_before_touching_disk() {
    let root = StaticRoot::new("static", &Limits::default());

    let result = root.resolve(&target(&"f".repeat(200))).await;

    assert!(matches!(result, Err(ServeError::PathOverflow { .. })));
}

#[tokio::test]
async fn test_resolve_existing_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("index.html"), "<h1>hi</h1>").unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let body = root.resolve(&target("index.html")).await.unwrap();

    assert_eq!(&body[..], b"<h1>hi</h1>");
}

#[tokio::test]
async fn test_resolve_nested_file() {
    let tmp = TempDir::new().unwrap();
    let css = subdir(&tmp, "css");
    std::fs::write(css.join("site.css"), "body {}").unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let body = root.resolve(&target("css/site.css")).await.unwrap();

    assert_eq!(&body[..], b"body {}");
}

#[tokio::test]
async fn test_resolve_file_at_path_limit() {
    let tmp = TempDir::new().unwrap();
    let name = "limit.html";
    std::fs::write(tmp.as_path().join(name), "edge").unwrap();
    let exact = tmp.as_path().as_os_str().len() + 1 + name.len();
    let limits = Limits {
        max_path: exact,
        ..Limits::default()
    };

    let body = StaticRoot::new(tmp.as_path(), &limits)
        .resolve(&target(name))
        .await
        .unwrap();
    assert_eq!(&body[..], b"edge");

    let tighter = Limits {
        max_path: exact - 1,
        ..Limits::default()
    };
    let result = StaticRoot::new(tmp.as_path(), &tighter).resolve(&target(name)).await;
    assert!(matches!(result, Err(ServeError::PathOverflow { .. })));
}

#[tokio::test]
async fn test_resolve_missing_file() {
    let tmp = TempDir::new().unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let result = root.resolve(&target("missing.html")).await;

    assert!(matches!(result, Err(ServeError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_below_a_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("index.html"), "x").unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let result = root.resolve(&target("index.html/more")).await;

    assert!(matches!(result, Err(ServeError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_directory_is_not_found() {
    let tmp = TempDir::new().unwrap();
    subdir(&tmp, "docs");
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    assert!(matches!(
        root.resolve(&target("docs")).await,
        Err(ServeError::NotFound(_))
    ));
    // An empty target names the root itself.
    assert!(matches!(
        root.resolve(&target("")).await,
        Err(ServeError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_resolve_symlink_is_not_found() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("real.html"), "real").unwrap();
    std::os::unix::fs::symlink(tmp.as_path().join("real.html"), tmp.as_path().join("link.html"))
        .unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let result = root.resolve(&target("link.html")).await;

    assert!(matches!(result, Err(ServeError::NotFound(_))));
}

#[tokio::test]
async fn test_resolve_file_at_body_limit() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("full.html"), vec![b'x'; 8192]).unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let body = root.resolve(&target("full.html")).await.unwrap();

    assert_eq!(body.len(), 8192);
}

#[tokio::test]
async fn test_resolve_oversized_file_is_rejected() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("big.html"), vec![b'x'; 8193]).unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let result = root.resolve(&target("big.html")).await;

    assert!(matches!(
        result,
        Err(ServeError::ResourceTooLarge { max: 8192, .. })
    ));
}

#[tokio::test]
async fn test_resolve_empty_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.as_path().join("empty.html"), "").unwrap();
    let root = StaticRoot::new(tmp.as_path(), &Limits::default());

    let body = root.resolve(&target("empty.html")).await.unwrap();

    assert!(body.is_empty());
}
