use crate::codec;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::handle::FileHandle;
use crate::wire::{ContentsResponse, PutContentsRequest, PutContentsResponse};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, info};

const ACCEPT_CONTENTS: &str = "application/vnd.github.v3+json";

/// A JSON document as stored remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    /// Parsed content, or `None` when the file is empty.
    pub json: Option<Value>,
    /// Content hash reported by the host. `None` means the file has never been written.
    pub version: Option<String>,
}

impl RemoteDocument {
    pub fn new(json: Value, version: impl Into<String>) -> Self {
        Self {
            json: Some(json),
            version: Some(version.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.json.is_none()
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Version token of the file after the write.
    pub version: String,
    pub commit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnsureOutcome {
    pub existed: bool,
    pub document: RemoteDocument,
}

/// File-level access to a repository's contents.
///
/// Implementations never recover from errors themselves; every failure is
/// handed back to the caller as one of the [`Error`] variants.
pub trait ContentsApi {
    /// Reads and decodes the file at `handle`.
    fn fetch_file(&self, handle: &FileHandle) -> Result<RemoteDocument>;

    /// Writes `value` to `handle` as pretty-printed JSON.
    ///
    /// With `expected_version` the write only succeeds if the file is still at
    /// that version; without it the write creates the file.
    fn write_file(
        &self,
        handle: &FileHandle,
        value: &Value,
        message: &str,
        expected_version: Option<&str>,
    ) -> Result<WriteOutcome>;
}

/// Fetches the file, creating it with `default` when the host reports it missing.
///
/// Errors other than [`Error::NotFound`] are returned unchanged.
pub fn ensure_default<A>(
    api: &A,
    handle: &FileHandle,
    default: &Value,
    message: &str,
) -> Result<EnsureOutcome>
where
    A: ContentsApi + ?Sized,
{
    match api.fetch_file(handle) {
        Ok(document) => Ok(EnsureOutcome {
            existed: true,
            document,
        }),
        Err(Error::NotFound(_)) => {
            info!(file = %handle, "file missing, creating default");
            let written = api.write_file(handle, default, message, None)?;
            Ok(EnsureOutcome {
                existed: false,
                document: RemoteDocument::new(default.clone(), written.version),
            })
        }
        Err(e) => Err(e),
    }
}

/// [`ContentsApi`] over the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    config: ClientConfig,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(ACCEPT, ACCEPT_CONTENTS);
        match self.config.token() {
            Some(token) => builder.header(AUTHORIZATION, format!("token {}", token)),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> Result<(u16, String)> {
        let response = builder
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok((status, text))
    }
}

impl ContentsApi for GitHubClient {
    fn fetch_file(&self, handle: &FileHandle) -> Result<RemoteDocument> {
        let url = handle.contents_url(self.config.api_base());
        let (status, text) = self.send(self.authorized(self.http.get(&url)))?;
        debug!(method = "GET", %url, status, "contents request");

        let text = check_status(handle, status, text)?;
        read_contents(status, &text)
    }

    fn write_file(
        &self,
        handle: &FileHandle,
        value: &Value,
        message: &str,
        expected_version: Option<&str>,
    ) -> Result<WriteOutcome> {
        let url = handle.contents_url(self.config.api_base());
        let body = put_request(value, message, expected_version);
        let (status, text) = self.send(self.authorized(self.http.put(&url)).json(&body))?;
        debug!(
            method = "PUT",
            %url,
            status,
            update = expected_version.is_some(),
            "contents request"
        );

        let text = check_status(handle, status, text)?;
        read_put_response(status, &text)
    }
}

pub(crate) fn put_request(
    value: &Value,
    message: &str,
    expected_version: Option<&str>,
) -> PutContentsRequest {
    PutContentsRequest {
        message: message.to_string(),
        content: codec::encode_content(value),
        sha: expected_version.map(str::to_string),
        branch: None,
    }
}

/// Maps a host status onto the error taxonomy, passing successful bodies through.
fn check_status(handle: &FileHandle, status: u16, text: String) -> Result<String> {
    match status {
        200..=299 => Ok(text),
        404 => Err(Error::NotFound(handle.to_string())),
        _ => Err(Error::ApiError {
            status,
            body: response_body(&text),
        }),
    }
}

fn response_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn read_contents(status: u16, text: &str) -> Result<RemoteDocument> {
    // A directory comes back as an array, which is not a file we can edit.
    let contents: ContentsResponse = serde_json::from_str(text).map_err(|_| Error::ApiError {
        status,
        body: response_body(text),
    })?;
    let json = codec::decode_content(&contents.content)?;
    Ok(RemoteDocument {
        json,
        version: Some(contents.sha),
    })
}

fn read_put_response(status: u16, text: &str) -> Result<WriteOutcome> {
    let unexpected = || Error::ApiError {
        status,
        body: response_body(text),
    };
    let response: PutContentsResponse = serde_json::from_str(text).map_err(|_| unexpected())?;
    let version = response.new_version().ok_or_else(unexpected)?.to_string();
    Ok(WriteOutcome {
        version,
        commit: response.commit_sha().map(str::to_string),
    })
}
