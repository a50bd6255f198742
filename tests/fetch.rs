//! URL fetching against a throwaway local HTTP server.
//!
//! The server answers a fixed number of connections with one canned
//! response each and closes, so the client opens a fresh connection for
//! the HEAD request and the GET.

use docskim::{fetch_url, inspect_url, FetchConfig, FetchMethod, SkimError, Unit, Window};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PAGE: &str = "<html><head><title>t</title></head><body>\
<h1>Release notes</h1><p>First &amp; foremost.</p><p>Second paragraph.</p>\
</body></html>";

async fn serve(status: &'static str, content_type: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        // HEAD, then GET.
        for _ in 0..2 {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match sock.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let is_head = request.starts_with(b"HEAD");
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = sock.write_all(head.as_bytes()).await;
            if !is_head {
                let _ = sock.write_all(body.as_bytes()).await;
            }
            let _ = sock.shutdown().await;
        }
    });

    format!("http://{addr}/notes")
}

fn config() -> FetchConfig {
    FetchConfig::builder()
        .curl_fallback(false)
        .head_timeout_secs(5)
        .get_timeout_secs(5)
        .build()
        .unwrap()
}

#[tokio::test]
async fn html_page_is_converted_to_text() {
    let url = serve("200 OK", "text/html; charset=utf-8", PAGE).await;
    let fetched = fetch_url(&url, &config()).await.unwrap();

    assert_eq!(
        fetched.content,
        "Release notes\nFirst & foremost.\nSecond paragraph."
    );
    let info = &fetched.info;
    assert_eq!(info.url, url);
    assert_eq!(info.method, FetchMethod::Http);
    assert_eq!(info.status, Some(200));
    assert_eq!(info.content_length, Some(PAGE.len() as u64));
    assert_eq!(info.raw_length, PAGE.len());
    assert!(info.converted);
    assert!(!info.truncated);
}

#[tokio::test]
async fn offset_and_limit_apply_to_converted_text() {
    let url = serve("200 OK", "text/plain", "abcdefghijklmnopqrstuvwxyz").await;
    let config = FetchConfig::builder()
        .curl_fallback(false)
        .start(3)
        .max_chars(5)
        .build()
        .unwrap();
    let fetched = fetch_url(&url, &config).await.unwrap();

    assert_eq!(fetched.content, "defgh");
    assert!(!fetched.info.converted);
    assert!(fetched.info.truncated);
    assert_eq!(fetched.info.start_offset, Some(3));
}

#[tokio::test]
async fn error_status_fails_without_fallback() {
    let url = serve("404 Not Found", "text/plain", "missing").await;
    let err = fetch_url(&url, &config()).await.unwrap_err();
    match err {
        SkimError::FetchFailed { reason, .. } => assert!(reason.contains("404")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn inspection_plans_over_full_text() {
    let body: &'static str = Box::leak("x".repeat(1000).into_boxed_str());
    let url = serve("200 OK", "text/plain", body).await;
    let config = FetchConfig::builder()
        .curl_fallback(false)
        .max_chars(10)
        .build()
        .unwrap();
    let insp = inspect_url(&url, &config).await.unwrap();

    assert_eq!(insp.extent.unit, Unit::Characters);
    assert_eq!(insp.extent.total, 1000);
    assert_eq!(insp.sampling.beginning, Window::new(1, 100));
    assert_eq!(insp.sampling.q50, Window::new(500, 600));
}

/// Drops every request that does not carry the curl user agent.
async fn serve_curl_only(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        // HEAD and GET from the client, then curl.
        for _ in 0..3 {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match sock.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            if !String::from_utf8_lossy(&request).contains("DocumentSkimmer") {
                drop(sock);
                continue;
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = sock.write_all(head.as_bytes()).await;
            let _ = sock.write_all(body.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });

    format!("http://{addr}/fallback")
}

#[tokio::test]
async fn client_failure_falls_back_to_curl() {
    let url = serve_curl_only("served to curl").await;
    let config = FetchConfig::builder()
        .user_agent("docskim-tests")
        .head_timeout_secs(5)
        .get_timeout_secs(5)
        .curl_timeout_secs(10)
        .build()
        .unwrap();

    match fetch_url(&url, &config).await {
        Ok(fetched) => {
            assert_eq!(fetched.info.method, FetchMethod::Curl);
            assert_eq!(fetched.info.status, None);
            assert_eq!(fetched.content, "served to curl");
        }
        // No curl binary on this machine.
        Err(SkimError::CurlFailed { reason, .. }) => assert!(reason.contains("not found")),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}
