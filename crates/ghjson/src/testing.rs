//! In-memory [`ContentsApi`] that behaves like the contents endpoint.

use crate::client::{ContentsApi, RemoteDocument, WriteOutcome, put_request};
use crate::codec;
use crate::error::{Error, Result};
use crate::handle::FileHandle;
use crate::wire::PutContentsRequest;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Default)]
struct State {
    /// path -> (base64 content, sha)
    files: HashMap<String, (String, String)>,
    puts: Vec<PutContentsRequest>,
    fetches: usize,
    versions: VecDeque<String>,
    fetch_failures: VecDeque<Error>,
    write_failures: VecDeque<Error>,
    counter: u64,
}

#[derive(Default)]
pub struct FakeContents {
    state: RefCell<State>,
}

impl FakeContents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, handle: &FileHandle, value: &Value, sha: &str) {
        self.insert_raw(handle, &codec::encode_content(value), sha);
    }

    pub fn insert_text(&self, handle: &FileHandle, text: &str, sha: &str) {
        self.insert_raw(handle, &STANDARD.encode(text), sha);
    }

    /// Stores an already base64-encoded `content` field as the host would return it.
    pub fn insert_raw(&self, handle: &FileHandle, content: &str, sha: &str) {
        self.state
            .borrow_mut()
            .files
            .insert(handle.to_string(), (content.to_string(), sha.to_string()));
    }

    /// Version token handed out by the next successful write.
    pub fn queue_version(&self, sha: &str) {
        self.state.borrow_mut().versions.push_back(sha.to_string());
    }

    pub fn fail_next_fetch(&self, err: Error) {
        self.state.borrow_mut().fetch_failures.push_back(err);
    }

    pub fn fail_next_write(&self, err: Error) {
        self.state.borrow_mut().write_failures.push_back(err);
    }

    pub fn puts(&self) -> Vec<PutContentsRequest> {
        self.state.borrow().puts.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.borrow().fetches
    }

    pub fn stored(&self, handle: &FileHandle) -> Option<Value> {
        let state = self.state.borrow();
        let (content, _) = state.files.get(&handle.to_string())?;
        codec::decode_content(content).ok().flatten()
    }

    pub fn version(&self, handle: &FileHandle) -> Option<String> {
        let state = self.state.borrow();
        state.files.get(&handle.to_string()).map(|(_, sha)| sha.clone())
    }
}

impl ContentsApi for FakeContents {
    fn fetch_file(&self, handle: &FileHandle) -> Result<RemoteDocument> {
        let mut state = self.state.borrow_mut();
        state.fetches += 1;
        if let Some(err) = state.fetch_failures.pop_front() {
            return Err(err);
        }
        let (content, sha) = state
            .files
            .get(&handle.to_string())
            .cloned()
            .ok_or_else(|| Error::NotFound(handle.to_string()))?;
        Ok(RemoteDocument {
            json: codec::decode_content(&content)?,
            version: Some(sha),
        })
    }

    fn write_file(
        &self,
        handle: &FileHandle,
        value: &Value,
        message: &str,
        expected_version: Option<&str>,
    ) -> Result<WriteOutcome> {
        let mut state = self.state.borrow_mut();
        let request = put_request(value, message, expected_version);
        state.puts.push(request.clone());
        if let Some(err) = state.write_failures.pop_front() {
            return Err(err);
        }

        let key = handle.to_string();
        let current = state.files.get(&key).map(|(_, sha)| sha.clone());
        match (current.as_deref(), expected_version) {
            (Some(_), None) => {
                return Err(Error::ApiError {
                    status: 422,
                    body: json!({"message": "Invalid request.\n\n\"sha\" wasn't supplied."}),
                });
            }
            (Some(current), Some(expected)) if current != expected => {
                return Err(Error::ApiError {
                    status: 409,
                    body: json!({"message": format!("{} does not match {}", handle.path(), expected)}),
                });
            }
            (None, Some(_)) => return Err(Error::NotFound(key)),
            _ => {}
        }

        state.counter += 1;
        let counter = state.counter;
        let version = state
            .versions
            .pop_front()
            .unwrap_or_else(|| format!("sha{:04}", counter));
        state
            .files
            .insert(key, (request.content, version.clone()));
        Ok(WriteOutcome {
            version,
            commit: Some(format!("commit{:04}", counter)),
        })
    }
}
