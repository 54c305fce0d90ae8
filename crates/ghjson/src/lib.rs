#![doc = include_str!("../README.md")]

pub mod buffer;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod handle;
pub mod wire;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::{EditBuffer, Status, StatusKind};
pub use client::{
    ContentsApi, EnsureOutcome, GitHubClient, RemoteDocument, WriteOutcome, ensure_default,
};
pub use config::{ClientConfig, DEFAULT_PATH, WorkflowConfig, default_document};
pub use error::{Error, Result};
pub use handle::FileHandle;
pub use workflow::{LoadOutcome, LoadRequest, Phase, SaveRequest, Ticket, Workflow};
