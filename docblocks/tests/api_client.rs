//! Exercises the document API client against a disposable local HTTP server.

use docblocks::api_client::{ApiError, DocumentApiClient};
use docblocks::document_model::Document;
use reqwest::blocking::Client;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// Request line and body received by the test server
struct Received {
    request_line: String,
    body: String,
}

/// Answer one request per `(status, body)` pair, in order, one connection each
fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<Received>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        responses
            .into_iter()
            .map(|(status, response)| answer(&listener, status, response))
            .collect()
    });

    (base_url, handle)
}

/// Serve exactly one request with the given status and JSON body
fn serve_once(status: &'static str, response: &'static str) -> (String, JoinHandle<Received>) {
    let (base_url, handle) = serve(vec![(status, response)]);
    let handle = thread::spawn(move || handle.join().unwrap().remove(0));
    (base_url, handle)
}

fn answer(listener: &TcpListener, status: &str, response: &str) -> Received {
    let (stream, _) = listener.accept().unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header).unwrap();
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap();
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        response.len(),
        response
    )
    .unwrap();

    Received {
        request_line: request_line.trim_end().to_string(),
        body: String::from_utf8(body).unwrap(),
    }
}

fn client(base_url: &str) -> DocumentApiClient {
    let http = Client::builder().no_proxy().build().unwrap();
    DocumentApiClient::with_http_client(base_url, http).unwrap()
}

#[test]
fn test_save_creates_unsaved_document() {
    let (base_url, server) = serve_once(
        "201 Created",
        r#"{"id":"doc-9","title":"Fresh","sections":[],"created_at":"2024-06-01T00:00:00Z"}"#,
    );

    let stored = client(&base_url)
        .save_document(&Document::new("Fresh").add_section())
        .unwrap();
    let received = server.join().unwrap();

    assert_eq!(received.request_line, "POST /documents HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&received.body).unwrap();
    assert_eq!(sent["title"], "Fresh");
    assert_eq!(sent["sections"].as_array().unwrap().len(), 1);
    assert!(sent["subtitle"].is_null());
    assert!(sent.get("id").is_none());

    assert_eq!(stored.id, "doc-9");
    assert!(stored.is_saved());
}

#[test]
fn test_save_overwrites_saved_document() {
    let (base_url, server) = serve_once("200 OK", r#"{"id":"doc-9","title":"Renamed"}"#);

    let doc = Document {
        id: "doc-9".to_string(),
        subtitle: Some("Rev B".to_string()),
        ..Document::new("Renamed")
    };
    let stored = client(&base_url).save_document(&doc).unwrap();
    let received = server.join().unwrap();

    assert_eq!(received.request_line, "PUT /documents/doc-9 HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&received.body).unwrap();
    assert!(sent["client"].is_null());
    assert_eq!(sent["subtitle"], "Rev B");
    assert_eq!(stored.title, "Renamed");
    assert!(stored.sections.is_empty());
}

#[test]
fn test_error_status_is_reported() {
    let (base_url, server) = serve_once("404 Not Found", r#"{"detail":"missing"}"#);

    let err = client(&base_url).get_document("gone").unwrap_err();
    let received = server.join().unwrap();

    assert_eq!(received.request_line, "GET /documents/gone HTTP/1.1");
    assert!(matches!(
        err,
        ApiError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND
    ));
    assert_eq!(
        err.to_string(),
        "Failed to fetch document: server responded 404 Not Found"
    );
}

#[test]
fn test_list_and_delete() {
    let (base_url, server) = serve_once("200 OK", r#"[{"id":"a","title":"A"},{"id":"b"}]"#);
    let docs = client(&base_url).list_documents().unwrap();
    server.join().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1].title, "");

    let (base_url, server) = serve_once("200 OK", "{}");
    client(&base_url).delete_document("a").unwrap();
    let received = server.join().unwrap();
    assert_eq!(received.request_line, "DELETE /documents/a HTTP/1.1");
}

#[test]
fn test_save_proceeds_when_previous_copy_is_missing() {
    let (base_url, server) = serve(vec![
        ("404 Not Found", r#"{"detail":"missing"}"#),
        ("200 OK", r#"{"id":"doc-9","title":"Kept"}"#),
    ]);

    let doc = Document {
        id: "doc-9".to_string(),
        ..Document::new("Kept")
    };
    let outcome = client(&base_url).save_replacing(&doc).unwrap();
    let received = server.join().unwrap();

    assert_eq!(received[0].request_line, "GET /documents/doc-9 HTTP/1.1");
    assert_eq!(received[1].request_line, "PUT /documents/doc-9 HTTP/1.1");
    assert!(outcome.replaced.is_none());
    assert_eq!(outcome.stored.title, "Kept");
}

#[test]
fn test_save_returns_replaced_copy() {
    let (base_url, server) = serve(vec![
        ("200 OK", r#"{"id":"doc-9","title":"Old"}"#),
        ("200 OK", r#"{"id":"doc-9","title":"New"}"#),
    ]);

    let doc = Document {
        id: "doc-9".to_string(),
        ..Document::new("New")
    };
    let outcome = client(&base_url).save_replacing(&doc).unwrap();
    server.join().unwrap();

    assert_eq!(outcome.replaced.map(|d| d.title), Some("Old".to_string()));
    assert_eq!(outcome.stored.title, "New");
}
