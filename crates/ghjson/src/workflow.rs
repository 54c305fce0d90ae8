//! Load / edit / save state machine for a single remote JSON file.
//!
//! Every network step is split in three so a driver can keep its own event
//! loop responsive: `begin_*` stamps a ticket and flips the loading flag,
//! `resolve_*` talks to the host without touching workflow state, and
//! `finish_*` applies the outcome. An outcome whose ticket is no longer the
//! current one (a newer request was started, or the handle changed) is
//! dropped, so a slow response never overwrites a later one.
//!
//! [`Workflow::load`] and [`Workflow::apply`] run all three steps in a row.

use crate::buffer::{EditBuffer, Status};
use crate::client::{ContentsApi, RemoteDocument, WriteOutcome};
use crate::config::WorkflowConfig;
use crate::error::{Error, Result};
use crate::handle::FileHandle;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Saving,
}

const CREATING_STATUS: &str = "File not found, creating default JSON";

/// Stamp identifying one load or save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Everything needed to perform a load away from the workflow.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: Ticket,
    pub handle: FileHandle,
    pub default_document: Value,
    pub create_message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The file exists and holds JSON.
    Loaded(RemoteDocument),
    /// The file exists but is empty or does not parse.
    Empty,
    /// The file was missing; the default was written and read back.
    Created(RemoteDocument),
    /// The file was missing and writing or re-reading the default failed.
    CreateFailed(Error),
    Failed(Error),
}

impl LoadOutcome {
    pub fn error(&self) -> Option<&Error> {
        match self {
            LoadOutcome::CreateFailed(e) | LoadOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Everything needed to perform a save away from the workflow.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub ticket: Ticket,
    pub handle: FileHandle,
    pub value: Value,
    pub message: String,
    pub expected_version: Option<String>,
}

/// Session state for editing one remote JSON file.
#[derive(Debug, Clone)]
pub struct Workflow {
    handle: FileHandle,
    config: WorkflowConfig,
    default_document: Value,
    phase: Phase,
    loading: bool,
    document: Option<RemoteDocument>,
    buffer: Option<EditBuffer>,
    status: Option<Status>,
    next_ticket: u64,
    in_flight: Option<Ticket>,
}

impl Workflow {
    pub fn new(handle: FileHandle, config: WorkflowConfig, default_document: Value) -> Self {
        Self {
            handle,
            config,
            default_document,
            phase: Phase::Idle,
            loading: false,
            document: None,
            buffer: None,
            status: None,
            next_ticket: 0,
            in_flight: None,
        }
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while a load or save is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn document(&self) -> Option<&RemoteDocument> {
        self.document.as_ref()
    }

    /// Version token that the next save will send.
    pub fn version(&self) -> Option<&str> {
        self.document.as_ref().and_then(|d| d.version.as_deref())
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        self.buffer.as_mut()
    }

    /// Points the workflow at another file.
    ///
    /// Anything loaded for the previous handle is dropped and an outstanding
    /// request for it will be ignored when it completes.
    pub fn set_handle(&mut self, handle: FileHandle) {
        if handle == self.handle {
            return;
        }
        debug!(from = %self.handle, to = %handle, "switching file");
        self.handle = handle;
        self.phase = Phase::Idle;
        self.loading = false;
        self.in_flight = None;
        self.document = None;
        self.buffer = None;
        self.status = None;
    }

    /// Replaces the buffer text as a user edit.
    pub fn edit(&mut self, text: impl Into<String>) -> Result<()> {
        let buffer = self.buffer.as_mut().ok_or(Error::NotLoaded)?;
        buffer.set_text(text);
        self.status = None;
        Ok(())
    }

    /// Whether [`Workflow::apply`] would submit anything right now.
    pub fn can_apply(&self) -> bool {
        self.phase == Phase::Loaded
            && !self.loading
            && self
                .buffer
                .as_ref()
                .is_some_and(|b| b.is_dirty() && b.parsed().is_ok())
    }

    fn stamp(&mut self) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.loading = true;
        self.status = None;
        ticket
    }

    /// Claims the current ticket, or returns false if `ticket` was superseded.
    fn settle(&mut self, ticket: Ticket, what: &str) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(?ticket, current = ?self.in_flight, "discarding stale {}", what);
            return false;
        }
        self.in_flight = None;
        self.loading = false;
        true
    }

    fn adopt(&mut self, document: RemoteDocument, status: Status) {
        match &document.json {
            Some(json) => {
                self.buffer = Some(EditBuffer::from_value(json));
                self.document = Some(document);
                self.phase = Phase::Loaded;
                self.status = Some(status);
            }
            None => self.discard(Status::info("File exists but is empty or not JSON")),
        }
    }

    fn discard(&mut self, status: Status) {
        self.document = None;
        self.buffer = None;
        self.phase = Phase::Idle;
        self.status = Some(status);
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Starts a load. Returns `None` while another load or save is outstanding.
    pub fn begin_load(&mut self) -> Option<LoadRequest> {
        if self.loading {
            debug!(file = %self.handle, "load ignored, request outstanding");
            return None;
        }
        let ticket = self.stamp();
        self.phase = Phase::Loading;
        Some(LoadRequest {
            ticket,
            handle: self.handle.clone(),
            default_document: self.default_document.clone(),
            create_message: self.config.create_message.clone(),
        })
    }

    /// Performs the network side of a load, creating the default file if the
    /// host reports it missing.
    pub fn resolve_load<A>(api: &A, request: &LoadRequest) -> LoadOutcome
    where
        A: ContentsApi + ?Sized,
    {
        Self::resolve_load_with(api, request, || {})
    }

    /// Like [`Workflow::resolve_load`], calling `on_missing` once the file is
    /// known to be missing and before the default is written.
    ///
    /// Drivers pass a callback that forwards to [`Workflow::mark_creating`] so
    /// the status reflects the create while it runs.
    pub fn resolve_load_with<A, F>(api: &A, request: &LoadRequest, on_missing: F) -> LoadOutcome
    where
        A: ContentsApi + ?Sized,
        F: FnOnce(),
    {
        match api.fetch_file(&request.handle) {
            Ok(document) if document.is_empty() => LoadOutcome::Empty,
            Ok(document) => LoadOutcome::Loaded(document),
            Err(Error::InvalidJson(msg)) => {
                debug!(file = %request.handle, "content is not JSON: {}", msg);
                LoadOutcome::Empty
            }
            Err(Error::NotFound(_)) => {
                info!(file = %request.handle, "file not found, creating default JSON");
                on_missing();
                match create_and_reload(api, request) {
                    Ok(document) => LoadOutcome::Created(document),
                    Err(e) => LoadOutcome::CreateFailed(e),
                }
            }
            Err(e) => LoadOutcome::Failed(e),
        }
    }

    /// Shows that the default file is being created for the load `ticket`.
    /// Returns false if that load is no longer in flight.
    pub fn mark_creating(&mut self, ticket: Ticket) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.status = Some(Status::info(CREATING_STATUS));
        true
    }

    /// Applies a load outcome. Returns false if the outcome was stale and ignored.
    pub fn finish_load(&mut self, ticket: Ticket, outcome: LoadOutcome) -> bool {
        if !self.settle(ticket, "load") {
            return false;
        }
        match outcome {
            LoadOutcome::Loaded(document) => {
                self.adopt(document, Status::info("Loaded JSON from repository"))
            }
            LoadOutcome::Created(document) => {
                self.adopt(document, Status::info("Default file created"))
            }
            LoadOutcome::Empty => {
                self.discard(Status::info("File exists but is empty or not JSON"))
            }
            LoadOutcome::CreateFailed(e) => {
                warn!(file = %self.handle, "creating default failed: {}", e);
                self.discard(Status::error(format!(
                    "Failed to create default file: {}",
                    e
                )))
            }
            LoadOutcome::Failed(e) => {
                warn!(file = %self.handle, "load failed: {}", e);
                self.discard(Status::error(format!("Failed to load file: {}", e)))
            }
        }
        true
    }

    /// Loads the file, creating the default when it is missing.
    ///
    /// The outcome is reflected in [`Workflow::status`]; failures are also
    /// returned.
    pub fn load<A>(&mut self, api: &A) -> Result<()>
    where
        A: ContentsApi + ?Sized,
    {
        let request = self.begin_load().ok_or(Error::Busy)?;
        let ticket = request.ticket;
        let outcome = Self::resolve_load_with(api, &request, || {
            self.mark_creating(ticket);
        });
        let result = match outcome.error() {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        };
        self.finish_load(ticket, outcome);
        result
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    /// Starts saving `value` over the loaded document.
    ///
    /// Returns `None` when nothing is loaded or a request is outstanding.
    pub fn begin_save(&mut self, value: Value) -> Option<SaveRequest> {
        if self.loading || self.phase != Phase::Loaded {
            debug!(file = %self.handle, phase = ?self.phase, "save ignored");
            return None;
        }
        let expected_version = self.document.as_ref()?.version.clone();
        let ticket = self.stamp();
        self.phase = Phase::Saving;
        Some(SaveRequest {
            ticket,
            handle: self.handle.clone(),
            value,
            message: self.config.update_message.clone(),
            expected_version,
        })
    }

    pub fn resolve_save<A>(api: &A, request: &SaveRequest) -> Result<WriteOutcome>
    where
        A: ContentsApi + ?Sized,
    {
        api.write_file(
            &request.handle,
            &request.value,
            &request.message,
            request.expected_version.as_deref(),
        )
    }

    /// Applies a save result. Returns false if the result was stale and ignored.
    ///
    /// On failure the document and the buffer, dirty flag included, are kept.
    pub fn finish_save(&mut self, request: SaveRequest, result: Result<WriteOutcome>) -> bool {
        if !self.settle(request.ticket, "save") {
            return false;
        }
        self.phase = Phase::Loaded;
        match result {
            Ok(written) => {
                info!(file = %self.handle, version = %written.version, "saved");
                self.adopt(
                    RemoteDocument::new(request.value, written.version),
                    Status::info("Saved changes to repository"),
                );
            }
            Err(e) => {
                warn!(file = %self.handle, "save failed: {}", e);
                self.status = Some(Status::error(format!("Save failed: {}", e)));
            }
        }
        true
    }

    /// Saves `value` over the loaded document.
    pub fn apply_value<A>(&mut self, api: &A, value: Value) -> Result<()>
    where
        A: ContentsApi + ?Sized,
    {
        if self.loading {
            return Err(Error::Busy);
        }
        let request = self.begin_save(value).ok_or(Error::NotLoaded)?;
        let result = Self::resolve_save(api, &request);
        let returned = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.finish_save(request, result);
        returned
    }

    /// Saves the buffer text.
    ///
    /// Text that does not parse is never submitted: the buffer status says
    /// why and [`Error::InvalidJson`] is returned with nothing else changed.
    pub fn apply<A>(&mut self, api: &A) -> Result<()>
    where
        A: ContentsApi + ?Sized,
    {
        let buffer = self.buffer.as_mut().ok_or(Error::NotLoaded)?;
        let value = match buffer.parsed() {
            Ok(value) => value,
            Err(e) => return Err(buffer.reject("Cannot apply: invalid JSON - ", e)),
        };
        self.apply_value(api, value)
    }
}

fn create_and_reload<A>(api: &A, request: &LoadRequest) -> Result<RemoteDocument>
where
    A: ContentsApi + ?Sized,
{
    let written = api.write_file(
        &request.handle,
        &request.default_document,
        &request.create_message,
        None,
    )?;
    // The write response is not a file body; read the file back for the
    // authoritative content and version.
    let reloaded = api.fetch_file(&request.handle)?;
    Ok(RemoteDocument {
        json: reloaded
            .json
            .or_else(|| Some(request.default_document.clone())),
        version: reloaded.version.or(Some(written.version)),
    })
}
