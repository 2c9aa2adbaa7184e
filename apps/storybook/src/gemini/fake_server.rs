//! Local stand-in for the Gemini endpoint.
//!
//! Serves one canned JSON reply per connection, in order, and records every
//! request it receives.

use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::gemini::GeminiClient;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request target, e.g. `/models/gemini-2.5-flash-image:generateContent`.
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    /// Number of conversation turns in `contents`.
    pub fn turns(&self) -> usize {
        self.body["contents"].as_array().map_or(0, Vec::len)
    }

    /// Text of the first part of the last turn.
    pub fn last_text(&self) -> Option<&str> {
        self.body["contents"]
            .as_array()?
            .last()?["parts"][0]["text"]
            .as_str()
    }
}

pub struct FakeGemini {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeGemini {
    pub async fn start(replies: Vec<Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = requests.clone();
        tokio::spawn(async move {
            for reply in replies {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                seen.lock().unwrap().push(request);

                let payload = reply.to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    payload.len(),
                    payload
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        Self { base_url, requests }
    }

    pub fn client(&self, api_key: &str) -> GeminiClient {
        GeminiClient::with_base_url(api_key, self.base_url.clone())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the request was complete");
        buf.extend_from_slice(&chunk[..n]);

        let Some(header_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let header = |name: &str| {
            head.lines().skip(1).find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case(name)
                    .then(|| value.trim().to_string())
            })
        };
        let length: usize = header("content-length")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let body_start = header_end + 4;
        if buf.len() < body_start + length {
            continue;
        }

        let path = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .unwrap_or_default()
            .to_string();
        return RecordedRequest {
            path,
            api_key: header("x-goog-api-key"),
            body: serde_json::from_slice(&buf[body_start..body_start + length]).unwrap(),
        };
    }
}

/// A model reply carrying one inline image.
pub fn image_reply(mime_type: &str, bytes: &[u8]) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    {"text": "Here is the picture."},
                    {"inlineData": {"mimeType": mime_type, "data": BASE64.encode(bytes)}}
                ]
            }
        }]
    })
}

/// A model reply with text only, no image.
pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]}
        }]
    })
}
