//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use headers_by_request::decision::{Decision, HeaderDirective, RewriteRule};
use headers_by_request::observability::{Event, EventSink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Decision service double that answers by the path part of the
/// `{"request": "<host><path>"}` query. Unknown paths get an empty 200 body.
pub struct DecisionsByPath {
    routes: HashMap<String, ResponseTemplate>,
}

impl DecisionsByPath {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn decision(mut self, path: &str, decision: &Decision) -> Self {
        let body = decision.to_vec().unwrap();
        self.routes
            .insert(path.to_string(), ResponseTemplate::new(200).set_body_bytes(body));
        self
    }

    pub fn status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            ResponseTemplate::new(status).set_body_string(body),
        );
        self
    }

    pub async fn start(self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::method("POST"))
            .respond_with(self)
            .mount(&server)
            .await;
        server
    }
}

impl Respond for DecisionsByPath {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let query: serde_json::Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let target = query["request"].as_str().unwrap_or_default();
        let path = target.find('/').map(|i| &target[i..]).unwrap_or_default();

        self.routes
            .get(path)
            .cloned()
            .unwrap_or_else(|| ResponseTemplate::new(200).set_body_string(""))
    }
}

/// The decisions exercised by the end-to-end scenarios.
pub async fn scenario_decisions() -> MockServer {
    let headers = Decision {
        headers: vec![
            HeaderDirective::new("header1", "value1"),
            HeaderDirective::new("header2", "value2"),
        ],
        rewrites: Vec::new(),
    };

    let rewrites = Decision {
        headers: Vec::new(),
        rewrites: vec![
            RewriteRule::new(
                "/test2/path/(?P<test_var>.*)/(?P<another>.*)",
                "/new/{test_var}/more/{another}",
                100,
            ),
            RewriteRule::new("/test2/foo/bar/(?P<asd>.*)", "/zoo/{asd}", 90),
        ],
    };

    let weighted = Decision {
        headers: Vec::new(),
        rewrites: vec![
            RewriteRule::new("/test3/notmatching/path/(?P<test_var>.*)", "/new/{test_var}", 200),
            RewriteRule::new("/test3/foo/bar/(?P<test_var>.*)", "/somethingelse/{test_var}", 80),
            RewriteRule::new("/test3/foo/bar/(?P<asd>.*)", "/zoo/{asd}", 100),
        ],
    };

    DecisionsByPath::new()
        .decision("/test1", &headers)
        .decision("/test2/path/rewritepart/bla", &rewrites)
        .decision("/test3/foo/bar/weight", &weighted)
        .status(
            "/test4/ambiguous",
            409,
            r#"{"payload":{"message":"Ambiguous request","request":"request.url/test"}}"#,
        )
        .status("/test5/teapot", 418, "")
        .start()
        .await
}

/// Event sink that keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Start a raw TCP upstream that answers every request with its own request
/// head (request line and headers) as the body.
pub async fn start_echo_upstream() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }

                        let body = String::from_utf8_lossy(&head).to_string();
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, hits)
}

/// Start a raw TCP decision service that reads the whole query, then
/// promises a 100-byte body, sends a fragment and closes the connection.
pub async fn start_truncated_decision_service() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request(&mut socket).await;
                let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"pay";
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Consume a request head and its `Content-Length` body.
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];

    let head_end = loop {
        if let Some(i) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break i + 4;
        }
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_ascii_lowercase();
    let content_length: usize = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0);

    while data.len() < head_end + content_length {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
}
