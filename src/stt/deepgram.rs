//! HTTP client for Deepgram's pre-recorded transcription endpoint.

use crate::error::{DgscribeError, Result};
use crate::stt::service::{TranscriptionOptions, TranscriptionService};
use crate::stt::transcript::TranscriptionResult;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Body, Client, ClientBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Structured error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "category")]
    err_code: Option<String>,
    #[serde(default, alias = "message")]
    err_msg: Option<String>,
}

/// Blocking Deepgram client, built once per run and shared by all workers.
pub struct DeepgramClient {
    http: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for DeepgramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepgramClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl DeepgramClient {
    /// Build a client for `endpoint` authenticated with `api_key`.
    ///
    /// `timeout` bounds each request end to end; `None` leaves it unbounded.
    pub fn new(api_key: &str, endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        Self::with_builder(api_key, endpoint, Client::builder().timeout(timeout))
    }

    fn with_builder(api_key: &str, endpoint: &str, builder: ClientBuilder) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(DgscribeError::MissingApiKey);
        }
        let endpoint = Url::parse(endpoint).map_err(|e| DgscribeError::ClientBuild {
            message: format!("invalid endpoint {endpoint:?}: {e}"),
        })?;
        let http = builder.build().map_err(|e| DgscribeError::ClientBuild {
            message: e.to_string(),
        })?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint,
        })
    }

    /// Request URL with the option set encoded as query parameters.
    pub fn request_url(&self, options: &TranscriptionOptions) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(options.query_pairs());
        url
    }
}

impl TranscriptionService for DeepgramClient {
    fn transcribe(
        &self,
        audio: &Path,
        options: &TranscriptionOptions,
    ) -> Result<TranscriptionResult> {
        let file = File::open(audio).map_err(|e| {
            DgscribeError::Io(std::io::Error::new(
                e.kind(),
                format!("opening audio {}: {e}", audio.display()),
            ))
        })?;

        let response = self
            .http
            .post(self.request_url(options))
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, content_type_for(audio))
            .body(Body::from(file))
            .send()?;

        let status = response.status();
        let body = response.bytes()?;

        if !status.is_success() {
            return Err(service_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| DgscribeError::InvalidResponse {
            message: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}

/// Map a non-2xx response to a service error, preferring the structured body.
fn service_error(status: StatusCode, body: &[u8]) -> DgscribeError {
    if let Ok(ErrorBody {
        err_code: Some(code),
        err_msg,
    }) = serde_json::from_slice::<ErrorBody>(body)
    {
        return DgscribeError::TranscriptionService {
            code,
            message: err_msg.unwrap_or_default(),
        };
    }
    DgscribeError::TranscriptionService {
        code: format!("HTTP {}", status.as_u16()),
        message: String::from_utf8_lossy(body).trim().to_string(),
    }
}

/// MIME type for an audio upload, guessed from the extension.
fn content_type_for(audio: &Path) -> &'static str {
    let ext = audio
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "m4a" | "m4b" | "aac" => "audio/mp4",
        "webm" => "audio/webm",
        "amr" => "audio/amr",
        "aiff" | "aif" | "aifc" => "audio/aiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::path::PathBuf;
    use std::thread::{self, JoinHandle};
    use tempfile::TempDir;

    fn local_client(endpoint: &str) -> DeepgramClient {
        DeepgramClient::with_builder("key", endpoint, Client::builder().no_proxy()).unwrap()
    }

    fn audio(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("a.wav");
        std::fs::write(&path, b"RIFF fake audio").unwrap();
        path
    }

    /// Answers a single request on a loopback port and hands back what it received.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/listen", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            request
        });
        (endpoint, handle)
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        while !request_complete(&data) {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn request_complete(data: &[u8]) -> bool {
        let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
        let body = &data[end + 4..];
        if head.contains("transfer-encoding: chunked") {
            return body.ends_with(b"0\r\n\r\n");
        }
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        body.len() >= length
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/v1/listen", listener.local_addr().unwrap());
        drop(listener);
        let dir = TempDir::new().unwrap();

        let result = local_client(&endpoint).transcribe(&audio(&dir), &Default::default());

        assert!(matches!(
            result,
            Err(DgscribeError::TranscriptionTransport(_))
        ));
    }

    #[test]
    fn test_non_json_success_is_invalid_response() {
        let (endpoint, server) = serve_once("200 OK", "not json");
        let dir = TempDir::new().unwrap();

        let result = local_client(&endpoint).transcribe(&audio(&dir), &Default::default());
        let request = server.join().unwrap().to_ascii_lowercase();

        assert!(matches!(result, Err(DgscribeError::InvalidResponse { .. })));
        assert!(request.starts_with("post /v1/listen?model=nova-2"));
        assert!(request.contains("authorization: token key"));
        assert!(request.contains("content-type: audio/wav"));
    }

    #[test]
    fn test_rejected_request_carries_service_code() {
        let (endpoint, server) = serve_once(
            "401 Unauthorized",
            r#"{"err_code":"INVALID_AUTH","err_msg":"Invalid credentials."}"#,
        );
        let dir = TempDir::new().unwrap();

        let result = local_client(&endpoint).transcribe(&audio(&dir), &Default::default());
        server.join().unwrap();

        match result {
            Err(DgscribeError::TranscriptionService { code, .. }) => {
                assert_eq!(code, "INVALID_AUTH")
            }
            other => panic!("Expected TranscriptionService, got {other:?}"),
        }
    }

    #[test]
    fn test_success_body_is_parsed() {
        let (endpoint, server) = serve_once(
            "200 OK",
            concat!(
                r#"{"metadata":{"duration":60.0},"results":{"channels":[{"alternatives":"#,
                r#"[{"words":[{"word":"hi","start":0.0,"end":0.5,"confidence":0.9}]}]}]}}"#,
            ),
        );
        let dir = TempDir::new().unwrap();

        let result = local_client(&endpoint)
            .transcribe(&audio(&dir), &Default::default())
            .unwrap();
        server.join().unwrap();

        assert_eq!(result.word_count(), 1);
        assert_eq!(result.metadata.duration, 60.0);
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = DeepgramClient::new("  ", crate::defaults::DEFAULT_ENDPOINT, None);
        assert!(matches!(result, Err(DgscribeError::MissingApiKey)));
    }

    #[test]
    fn test_invalid_endpoint_is_client_build_error() {
        let result = DeepgramClient::new("key", "not a url", None);
        assert!(matches!(result, Err(DgscribeError::ClientBuild { .. })));
    }

    #[test]
    fn test_request_url_carries_options() {
        let client = DeepgramClient::new(
            "key",
            crate::defaults::DEFAULT_ENDPOINT,
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let url = client.request_url(&TranscriptionOptions::default());
        assert_eq!(url.path(), "/v1/listen");
        let query = url.query().unwrap_or_default();
        assert!(query.starts_with("model=nova-2&language=en-US"));
        assert!(query.contains("diarize=true"));
        assert!(query.contains("utterances=true"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let client =
            DeepgramClient::new("secret-key", crate::defaults::DEFAULT_ENDPOINT, None).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_structured_error_body() {
        let body =
            br#"{"err_code":"INVALID_AUTH","err_msg":"Invalid credentials.","request_id":"x"}"#;
        match service_error(StatusCode::UNAUTHORIZED, body) {
            DgscribeError::TranscriptionService { code, message } => {
                assert_eq!(code, "INVALID_AUTH");
                assert_eq!(message, "Invalid credentials.");
            }
            other => panic!("Expected TranscriptionService, got {other:?}"),
        }
    }

    #[test]
    fn test_unstructured_error_body() {
        match service_error(StatusCode::BAD_GATEWAY, b"upstream down\n") {
            DgscribeError::TranscriptionService { code, message } => {
                assert_eq!(code, "HTTP 502");
                assert_eq!(message, "upstream down");
            }
            other => panic!("Expected TranscriptionService, got {other:?}"),
        }
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for(Path::new("a/.audio/x.mp3")), "audio/mpeg");
        assert_eq!(content_type_for(Path::new("x.WAV")), "audio/wav");
        assert_eq!(content_type_for(Path::new("x")), "application/octet-stream");
    }
}
