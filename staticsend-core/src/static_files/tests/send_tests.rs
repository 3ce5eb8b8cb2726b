use super::helpers::{FailingFs, Fixture, RecordingFs};
use crate::conf::ConfigError;
use crate::ctx::SendCtx;
use crate::static_files::{SendError, SendOutcome, send, send_with};
use http::{HeaderValue, StatusCode, header};
use pretty_assertions::assert_eq;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

async fn body_of(ctx: &mut SendCtx) -> Vec<u8> {
    std::mem::take(&mut ctx.body).into_bytes().await.unwrap().to_vec()
}

//-----------------------------------------------------------------------------
// Plain files
//-----------------------------------------------------------------------------
#[tokio::test]
async fn serves_exact_file_with_headers_and_bytes() {
    // Arrange
    let fixture = Fixture::new();
    let path = fixture.file("hello.txt", "hello world");
    let mut ctx = SendCtx::new("/hello.txt");

    // Act
    let outcome = send(&mut ctx, "/hello.txt", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(path));
    assert_eq!(ctx.status, StatusCode::OK);
    assert_eq!(ctx.header_str(&header::CONTENT_LENGTH), Some("11"));
    assert_eq!(ctx.content_type(), Some("text/plain; charset=utf-8"));
    assert_eq!(ctx.header_str(&header::CACHE_CONTROL), Some("max-age=0"));
    assert!(ctx.header_str(&header::LAST_MODIFIED).unwrap().ends_with("GMT"));
    assert!(ctx.headers.get(header::CONTENT_ENCODING).is_none());
    assert_eq!(body_of(&mut ctx).await, b"hello world");
}

#[tokio::test]
async fn cache_control_floors_seconds_and_appends_immutable() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("app.css", "body {}");
    let options = fixture
        .options()
        .with_max_age(Duration::from_millis(1999))
        .with_immutable(true);
    let mut ctx = SendCtx::new("/app.css");

    // Act
    send(&mut ctx, "/app.css", &options).await.unwrap();

    // Assert
    assert_eq!(
        ctx.header_str(&header::CACHE_CONTROL),
        Some("max-age=1,immutable")
    );
}

#[tokio::test]
async fn preexisting_cache_headers_are_kept() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("app.css", "body {}");
    let mut ctx = SendCtx::new("/app.css");
    ctx.headers
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    ctx.headers.insert(
        header::LAST_MODIFIED,
        HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"),
    );

    // Act
    send(&mut ctx, "/app.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(ctx.header_str(&header::CACHE_CONTROL), Some("no-store"));
    assert_eq!(
        ctx.header_str(&header::LAST_MODIFIED),
        Some("Thu, 01 Jan 1970 00:00:00 GMT")
    );
}

#[tokio::test]
async fn set_headers_runs_with_final_path_and_stat() {
    // Arrange
    let fixture = Fixture::new();
    let path = fixture.file("report.json", "{}");
    let seen: Arc<Mutex<Option<(PathBuf, u64)>>> = Arc::default();
    let recorder = Arc::clone(&seen);
    let options = fixture
        .options()
        .with_set_headers(move |headers, path, stat| {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("public"));
            headers.insert("x-served-by", HeaderValue::from_static("staticsend"));
            *recorder.lock().unwrap() = Some((path.to_path_buf(), stat.size));
        });
    let mut ctx = SendCtx::new("/report.json");

    // Act
    send(&mut ctx, "/report.json", &options).await.unwrap();

    // Assert
    assert_eq!(*seen.lock().unwrap(), Some((path, 2)));
    assert_eq!(ctx.header_str(&header::CACHE_CONTROL), Some("public"));
    assert_eq!(
        ctx.headers.get("x-served-by"),
        Some(&HeaderValue::from_static("staticsend"))
    );
    assert_eq!(
        ctx.content_type(),
        Some("application/json; charset=utf-8")
    );
}

//-----------------------------------------------------------------------------
// Index and directories
//-----------------------------------------------------------------------------
#[tokio::test]
async fn trailing_slash_without_index_is_not_found_without_probes() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("docs/index.html", "<h1>docs</h1>");
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/docs/");

    // Act
    let err = send_with(&fs, &mut ctx, "/docs/", &fixture.options())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert!(fs.probes().is_empty());
}

#[tokio::test]
async fn trailing_slash_serves_index() {
    // Arrange
    let fixture = Fixture::new();
    let index = fixture.file("docs/index.html", "<h1>docs</h1>");
    let options = fixture.options().with_index("index.html");
    let mut ctx = SendCtx::new("/docs/");

    // Act
    let outcome = send(&mut ctx, "/docs/", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(index));
    assert_eq!(ctx.content_type(), Some("text/html; charset=utf-8"));
    assert_eq!(body_of(&mut ctx).await, b"<h1>docs</h1>");
}

#[tokio::test]
async fn directory_without_slash_expands_to_index() {
    // Arrange
    let fixture = Fixture::new();
    let index = fixture.file("docs/index.html", "<h1>docs</h1>");
    let options = fixture.options().with_index("index.html");
    let mut ctx = SendCtx::new("/docs");

    // Act
    let outcome = send(&mut ctx, "/docs", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(index));
}

#[tokio::test]
async fn directory_without_index_is_declined() {
    // Arrange
    let fixture = Fixture::new();
    fixture.dir("docs");
    let mut ctx = SendCtx::new("/docs");

    // Act
    let outcome = send(&mut ctx, "/docs", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Declined);
    assert_eq!(ctx.status, StatusCode::NOT_FOUND);
    assert!(ctx.body.is_empty());
    assert!(ctx.headers.is_empty());
}

#[tokio::test]
async fn index_that_is_a_directory_is_not_found() {
    // Arrange
    let fixture = Fixture::new();
    fixture.dir("docs/index.html");
    let options = fixture.options().with_index("index.html");
    let mut ctx = SendCtx::new("/docs");

    // Act
    let err = send(&mut ctx, "/docs", &options).await.unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert!(ctx.body.is_empty());
}

#[tokio::test]
async fn format_off_redirects_directory_keeping_query() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("docs/index.html", "<h1>docs</h1>");
    let options = fixture
        .options()
        .with_index("index.html")
        .with_format(false);
    let mut ctx = SendCtx::new("/docs?x=1");

    // Act
    let outcome = send(&mut ctx, "/docs", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Redirected("/docs/?x=1".to_string()));
    assert_eq!(ctx.status, StatusCode::FOUND);
    assert_eq!(ctx.location(), Some("/docs/?x=1"));
    assert!(ctx.headers.get(header::CONTENT_LENGTH).is_none());
    assert!(ctx.headers.get(header::CACHE_CONTROL).is_none());
    assert!(ctx.body.is_empty());
}

//-----------------------------------------------------------------------------
// Hidden files
//-----------------------------------------------------------------------------
#[tokio::test]
async fn hidden_segment_is_declined_without_probes() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file(".env", "SECRET=1");
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/.env");

    // Act
    let outcome = send_with(&fs, &mut ctx, "/.env", &fixture.options())
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Declined);
    assert!(fs.probes().is_empty());
    assert!(ctx.body.is_empty());
}

#[tokio::test]
async fn hidden_segment_is_served_when_allowed() {
    // Arrange
    let fixture = Fixture::new();
    let path = fixture.file(".well-known/security.txt", "Contact: ops");
    let options = fixture.options().with_hidden(true);
    let mut ctx = SendCtx::new("/.well-known/security.txt");

    // Act
    let outcome = send(&mut ctx, "/.well-known/security.txt", &options)
        .await
        .unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(path));
}

//-----------------------------------------------------------------------------
// Extension fallback
//-----------------------------------------------------------------------------
#[tokio::test]
async fn extension_fallback_uses_first_match_in_order() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("about.htm", "htm");
    let html = fixture.file("about.html", "html");
    let options = fixture.options().with_extensions(["html", ".htm"]);
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/about");

    // Act
    let outcome = send_with(&fs, &mut ctx, "/about", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(html.clone()));
    assert_eq!(
        fs.probes()[..2].to_vec(),
        vec![fixture.root().join("about"), html]
    );
    assert_eq!(body_of(&mut ctx).await, b"html");
}

#[tokio::test]
async fn extension_fallback_skipped_when_exact_file_exists() {
    // Arrange
    let fixture = Fixture::new();
    let exact = fixture.file("about", "exact");
    fixture.file("about.html", "html");
    let options = fixture.options().with_extensions(["html"]);
    let mut ctx = SendCtx::new("/about");

    // Act
    let outcome = send(&mut ctx, "/about", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(exact));
    assert_eq!(ctx.content_type(), Some("application/octet-stream"));
}

#[tokio::test]
async fn extension_fallback_without_match_is_not_found() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("about.txt", "text");
    let options = fixture.options().with_extensions(["html", "htm"]);
    let mut ctx = SendCtx::new("/about");

    // Act
    let err = send(&mut ctx, "/about", &options).await.unwrap_err();

    // Assert
    match err {
        SendError::NotFound { path, source } => {
            assert_eq!(path, fixture.root().join("about"));
            assert!(source.is_some());
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn extension_fallback_is_skipped_for_trailing_slash() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("docs/index.html", "<h1>docs</h1>");
    let options = fixture
        .options()
        .with_index("index")
        .with_extensions(["html"]);
    let mut ctx = SendCtx::new("/docs/");

    // Act
    let err = send(&mut ctx, "/docs/", &options).await.unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

//-----------------------------------------------------------------------------
// Precompressed variants
//-----------------------------------------------------------------------------
fn compressed_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.file("app.css", "body { color: red }");
    fixture.file("app.css.br", "brotli-bytes");
    fixture.file("app.css.gz", "gzip-bytes-longer");
    fixture
}

#[tokio::test]
async fn brotli_is_preferred_over_gzip() {
    // Arrange
    let fixture = compressed_fixture();
    let mut ctx = SendCtx::new("/app.css").with_accept_encoding("gzip, deflate, br");

    // Act
    let outcome = send(&mut ctx, "/app.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SendOutcome::Served(fixture.root().join("app.css.br"))
    );
    assert_eq!(ctx.header_str(&header::CONTENT_ENCODING), Some("br"));
    assert_eq!(ctx.header_str(&header::CONTENT_LENGTH), Some("12"));
    assert_eq!(ctx.content_type(), Some("text/css; charset=utf-8"));
    assert_eq!(body_of(&mut ctx).await, b"brotli-bytes");
}

#[tokio::test]
async fn gzip_is_used_when_brotli_is_disabled() {
    // Arrange
    let fixture = compressed_fixture();
    let options = fixture.options().with_brotli(false);
    let mut ctx = SendCtx::new("/app.css").with_accept_encoding("br, gzip");

    // Act
    let outcome = send(&mut ctx, "/app.css", &options).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SendOutcome::Served(fixture.root().join("app.css.gz"))
    );
    assert_eq!(ctx.header_str(&header::CONTENT_ENCODING), Some("gzip"));
    assert_eq!(ctx.content_type(), Some("text/css; charset=utf-8"));
}

#[tokio::test]
async fn identity_is_served_without_accept_encoding() {
    // Arrange
    let fixture = compressed_fixture();
    let mut ctx = SendCtx::new("/app.css");

    // Act
    let outcome = send(&mut ctx, "/app.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(fixture.root().join("app.css")));
    assert!(ctx.headers.get(header::CONTENT_ENCODING).is_none());
    assert_eq!(body_of(&mut ctx).await, b"body { color: red }");
}

#[tokio::test]
async fn encoding_refused_with_zero_quality_falls_through() {
    // Arrange
    let fixture = compressed_fixture();
    let mut ctx = SendCtx::new("/app.css").with_accept_encoding("br;q=0, gzip;q=0.8");

    // Act
    let outcome = send(&mut ctx, "/app.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SendOutcome::Served(fixture.root().join("app.css.gz"))
    );
}

#[tokio::test]
async fn missing_variant_serves_original() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("plain.css", "p {}");
    let mut ctx = SendCtx::new("/plain.css").with_accept_encoding("br, gzip");

    // Act
    let outcome = send(&mut ctx, "/plain.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(fixture.root().join("plain.css")));
    assert!(ctx.headers.get(header::CONTENT_ENCODING).is_none());
}

//-----------------------------------------------------------------------------
// Failures
//-----------------------------------------------------------------------------
#[tokio::test]
async fn traversal_is_forbidden_without_probes() {
    // Arrange
    let fixture = Fixture::new();
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/../etc/passwd");

    // Act
    let err = send_with(&fs, &mut ctx, "/../etc/passwd", &fixture.options())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, SendError::Forbidden));
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert!(fs.probes().is_empty());
}

#[tokio::test]
async fn missing_file_is_not_found_with_cause() {
    // Arrange
    let fixture = Fixture::new();
    let mut ctx = SendCtx::new("/missing.txt");

    // Act
    let err = send(&mut ctx, "/missing.txt", &fixture.options())
        .await
        .unwrap_err();

    // Assert
    match err {
        SendError::NotFound { path, source } => {
            assert_eq!(path, fixture.root().join("missing.txt"));
            assert_eq!(source.unwrap().kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn file_used_as_directory_is_not_found() {
    // Arrange
    let fixture = Fixture::new();
    fixture.file("file.txt", "x");
    let mut ctx = SendCtx::new("/file.txt/child");

    // Act
    let err = send(&mut ctx, "/file.txt/child", &fixture.options())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overlong_name_is_not_found() {
    // Arrange
    let fixture = Fixture::new();
    let request = format!("/{}", "a".repeat(300));
    let mut ctx = SendCtx::new(request.clone());

    // Act
    let err = send(&mut ctx, &request, &fixture.options())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_stat_failures_are_internal() {
    // Arrange
    let options = crate::SendOptions::new("/srv/www");
    let mut ctx = SendCtx::new("/locked.txt");

    // Act
    let err = send_with(
        &FailingFs(io::ErrorKind::PermissionDenied),
        &mut ctx,
        "/locked.txt",
        &options,
    )
    .await
    .unwrap_err();

    // Assert
    match err {
        SendError::Internal { path, source } => {
            assert_eq!(path, PathBuf::from("/srv/www/locked.txt"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected Internal, got {other:?}"),
    }
    assert!(ctx.body.is_empty());
}

#[tokio::test]
async fn invalid_options_fail_before_any_probe() {
    // Arrange
    let fixture = Fixture::new();
    let options = fixture.options().with_extensions(["html", "../x"]);
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/about");

    // Act
    let err = send_with(&fs, &mut ctx, "/about", &options)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(
        err,
        SendError::Config(ConfigError::InvalidExtension { position: 1, .. })
    ));
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(fs.probes().is_empty());
}

//-----------------------------------------------------------------------------
// Requests that normalize to the root
//-----------------------------------------------------------------------------
#[tokio::test]
async fn root_request_with_brotli_serves_root_index() {
    // Arrange
    let fixture = Fixture::new();
    let index = fixture.file("index.html", "<h1>home</h1>");
    fixture.dir("a");
    let options = fixture.options().with_index("index.html");
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/a/..").with_accept_encoding("br");

    // Act
    let outcome = send_with(&fs, &mut ctx, "/a/..", &options).await.unwrap();

    // Assert
    assert_eq!(outcome, SendOutcome::Served(index));
    assert!(ctx.headers.get(header::CONTENT_ENCODING).is_none());
    assert!(fs.probes().iter().all(|p| p.starts_with(fixture.root())));
    assert_eq!(body_of(&mut ctx).await, b"<h1>home</h1>");
}

#[tokio::test]
async fn root_request_serves_the_same_with_or_without_encodings() {
    // Arrange
    let fixture = Fixture::new();
    let index = fixture.file("index.html", "<h1>home</h1>");
    let options = fixture
        .options()
        .with_index("index.html")
        .with_extensions(["html"]);

    for accept_encoding in [None, Some("gzip"), Some("br, gzip")] {
        let mut ctx = SendCtx::new("/.");
        if let Some(value) = accept_encoding {
            ctx = ctx.with_accept_encoding(value);
        }

        // Act
        let outcome = send(&mut ctx, "/.", &options).await.unwrap();

        // Assert
        assert_eq!(
            outcome,
            SendOutcome::Served(index.clone()),
            "accept-encoding {accept_encoding:?}"
        );
    }
}

#[tokio::test]
async fn missing_root_with_fallback_never_probes_its_siblings() {
    // Arrange
    let fixture = Fixture::new();
    let root = fixture.root().join("site");
    fixture.file("site.html", "sibling of the root");
    let options = crate::SendOptions::new(&root).with_extensions(["html"]);
    let fs = RecordingFs::default();
    let mut ctx = SendCtx::new("/.").with_accept_encoding("br");

    // Act
    let err = send_with(&fs, &mut ctx, "/.", &options).await.unwrap_err();

    // Assert
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(fs.probes(), vec![root.clone(), root]);
}

//-----------------------------------------------------------------------------
// Redirect locations
//-----------------------------------------------------------------------------
#[tokio::test]
async fn redirect_location_is_escaped_and_agrees_with_outcome() {
    // Arrange
    let fixture = Fixture::new();
    fixture.dir("d\u{f3}cs dir");
    let options = fixture.options().with_format(false);
    let mut ctx = SendCtx::new("/d\u{f3}cs dir");

    // Act
    let outcome = send(&mut ctx, "/d\u{f3}cs dir", &options).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SendOutcome::Redirected("/d%C3%B3cs%20dir/".to_string())
    );
    assert_eq!(ctx.status, StatusCode::FOUND);
    assert_eq!(ctx.location(), Some("/d%C3%B3cs%20dir/"));
}

//-----------------------------------------------------------------------------
// Content-Length with variants
//-----------------------------------------------------------------------------
#[tokio::test]
async fn preset_content_length_is_replaced_by_variant_size() {
    // Arrange
    let fixture = compressed_fixture();
    let mut ctx = SendCtx::new("/app.css").with_accept_encoding("br");
    ctx.headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from_static("999"));

    // Act
    let outcome = send(&mut ctx, "/app.css", &fixture.options()).await.unwrap();

    // Assert
    assert_eq!(
        outcome,
        SendOutcome::Served(fixture.root().join("app.css.br"))
    );
    assert_eq!(
        ctx.headers.get_all(header::CONTENT_LENGTH).iter().count(),
        1
    );
    assert_eq!(ctx.header_str(&header::CONTENT_LENGTH), Some("12"));
}
