use crate::codec;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Transient, human-readable outcome of the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Editable text of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    dirty: bool,
    status: Option<Status>,
}

impl EditBuffer {
    /// Starts a clean buffer holding the canonical text of `value`.
    pub fn from_value(value: &Value) -> Self {
        Self {
            text: codec::to_pretty(value),
            dirty: false,
            status: None,
        }
    }

    /// Wraps text that did not come from a loaded document, such as a local file.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            dirty: false,
            status: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Replaces the text as a user edit would.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.dirty = true;
        self.status = None;
    }

    /// Current text as a JSON value.
    pub fn parsed(&self) -> Result<Value> {
        codec::parse(&self.text)
    }

    /// Re-serializes valid text in canonical form. Invalid text is left alone.
    pub fn format(&mut self) -> Result<()> {
        match self.parsed() {
            Ok(value) => {
                self.text = codec::to_pretty(&value);
                self.status = Some(Status::info("Formatted JSON"));
                Ok(())
            }
            Err(e) => Err(self.reject("Invalid JSON: ", e)),
        }
    }

    pub fn validate(&mut self) -> Result<()> {
        match self.parsed() {
            Ok(_) => {
                self.status = Some(Status::info("Valid JSON"));
                Ok(())
            }
            Err(e) => Err(self.reject("Invalid JSON: ", e)),
        }
    }

    /// Records a parse failure in the status and hands the error back.
    pub(crate) fn reject(&mut self, prefix: &str, err: Error) -> Error {
        let detail = match &err {
            Error::InvalidJson(msg) => msg.clone(),
            other => other.to_string(),
        };
        self.status = Some(Status::error(format!("{}{}", prefix, detail)));
        err
    }
}
