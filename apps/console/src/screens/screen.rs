//! # Generic Entity Screen
//!
//! The list + search + modal form controller shared by every resource.
//!
//! ## Screen Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Screen Operations                                    │
//! │                                                                         │
//! │  Operator Action          Method                  State Change          │
//! │  ───────────────          ──────                  ────────────          │
//! │                                                                         │
//! │  Open screen ───────────► load() ───────────────► records = GET list    │
//! │                                                                         │
//! │  Type in search ────────► set_search() ─────────► filtered() narrows    │
//! │                                                                         │
//! │  Click "New" ───────────► open_create() ────────► modal Open, draft = ∅ │
//! │                                                                         │
//! │  Click "Edit" ──────────► open_edit(id) ────────► modal Open, draft =   │
//! │                                                   record's fields       │
//! │                                                                         │
//! │  Click "Save" ──────────► submit() ─────────────► POST/PUT, reload      │
//! │                                                                         │
//! │  Click "Delete" ────────► delete(id) ───────────► DELETE, reload        │
//! │                                                                         │
//! │  NOTE: on any failure the record list is left exactly as it was.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Loads and submits are split into a begin step (synchronous, takes a
//! ticket) and a finish step that applies the answer. A live submit ticket
//! rejects a second submit; the screen accepts submits again once the ticket
//! is finished or dropped. Each load gets a sequence number; an answer for an
//! older load than the latest is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use deli_api::{ApiClient, ApiResult, MutationAck, Repository};
use deli_core::{filter_records, EditPolicy, Entity, RecordId};

use crate::error::{ConsoleError, ConsoleResult};
use crate::notify::{Inbox, Notification};

/// Whether the create/edit form is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Closed,
    /// `editing` is the id being edited, `None` for a new record.
    Open { editing: Option<RecordId> },
}

/// Handle for one dispatched list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// A validated payload waiting to be sent.
///
/// Holds the screen's submit slot. Dropping the ticket without passing it to
/// [`Screen::finish_submit`] (a cancelled task, an early return) releases the
/// slot too.
pub struct SubmitTicket<E: Entity> {
    payload: E::Payload,
    editing: Option<RecordId>,
    in_flight: Arc<AtomicBool>,
}

impl<E: Entity> Drop for SubmitTicket<E> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

impl<E: Entity> SubmitTicket<E> {
    pub fn payload(&self) -> &E::Payload {
        &self.payload
    }

    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    /// POST for a new record, PUT for an edit.
    pub async fn send(&self, repo: &Repository<E>) -> ApiResult<MutationAck<E>> {
        match self.editing {
            Some(id) => repo.update(id, &self.payload).await,
            None => repo.create(&self.payload).await,
        }
    }
}

/// Screen controller for one resource.
pub struct Screen<E: Entity> {
    repo: Repository<E>,
    policy: EditPolicy,
    records: Vec<E>,
    search: String,
    modal: Modal,
    draft: E::Draft,
    submitting: Arc<AtomicBool>,
    load_seq: u64,
    inbox: Inbox,
}

impl<E: Entity> Screen<E> {
    pub fn new(client: &ApiClient, policy: EditPolicy) -> Self {
        Screen {
            repo: client.repository::<E>(),
            policy,
            records: Vec::new(),
            search: String::new(),
            modal: Modal::Closed,
            draft: E::Draft::default(),
            submitting: Arc::default(),
            load_seq: 0,
            inbox: Inbox::default(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn repository(&self) -> &Repository<E> {
        &self.repo
    }

    /// Every loaded record, in backend order.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// Records matching the current search text.
    pub fn filtered(&self) -> Vec<&E> {
        filter_records(&self.records, &self.search)
    }

    pub fn record(&self, id: RecordId) -> Option<&E> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn modal(&self) -> Modal {
        self.modal
    }

    pub fn draft(&self) -> &E::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut E::Draft {
        &mut self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Notifications produced since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.inbox.drain()
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.inbox.push(notification);
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetches the list and replaces the records.
    ///
    /// On failure the current records stay and an error toast is queued.
    pub async fn load(&mut self) -> ConsoleResult<()> {
        let ticket = self.begin_load();
        let result = self.repo.list().await;
        self.apply_load(ticket, result)
    }

    /// Same as [`Screen::load`]; called after every mutation.
    pub async fn refresh(&mut self) -> ConsoleResult<()> {
        self.load().await
    }

    /// Registers a new list request and returns its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        LoadTicket { seq: self.load_seq }
    }

    /// Applies a list answer unless a newer load was started since.
    ///
    /// Returns `Ok` for a dropped stale answer.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<E>>) -> ConsoleResult<()> {
        if ticket.seq < self.load_seq {
            debug!(
                resource = E::RESOURCE,
                seq = ticket.seq,
                latest = self.load_seq,
                "Dropping stale list response"
            );
            return Ok(());
        }

        match result {
            Ok(records) => {
                debug!(resource = E::RESOURCE, count = records.len(), "Screen list loaded");
                self.records = records;
                Ok(())
            }
            Err(e) => {
                let err = ConsoleError::from(e);
                warn!(resource = E::RESOURCE, error = %err, "Screen list failed to load");
                self.notify(err.notification());
                Err(err)
            }
        }
    }

    // =========================================================================
    // Modal
    // =========================================================================

    /// Opens an empty form for a new record.
    pub fn open_create(&mut self) {
        self.draft = E::Draft::default();
        self.modal = Modal::Open { editing: None };
    }

    /// Opens the form filled from a loaded record.
    pub fn open_edit(&mut self, id: RecordId) -> ConsoleResult<()> {
        let record = self
            .record(id)
            .ok_or_else(|| ConsoleError::not_found(E::LABEL, id))?;
        self.draft = record.draft_for_edit(self.policy);
        self.modal = Modal::Open { editing: Some(id) };
        Ok(())
    }

    /// Closes the form and discards the draft.
    pub fn close_modal(&mut self) {
        self.draft = E::Draft::default();
        self.modal = Modal::Closed;
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validates the draft and sends it, then reloads the list.
    pub async fn submit(&mut self) -> ConsoleResult<()> {
        let ticket = self.begin_submit()?;
        let result = ticket.send(&self.repo).await;
        self.finish_submit(ticket, result).await
    }

    /// Validates the draft and marks the screen as submitting.
    ///
    /// ## Errors
    /// - `Busy` while another submit is in flight
    /// - `ValidationError` (with an alert queued) when the draft is invalid
    pub fn begin_submit(&mut self) -> ConsoleResult<SubmitTicket<E>> {
        if self.is_submitting() {
            warn!(resource = E::RESOURCE, "Submit ignored, one is already in flight");
            return Err(ConsoleError::busy());
        }

        let payload = E::to_payload(&self.draft).map_err(|e| {
            let err = ConsoleError::from(e);
            self.inbox.push(err.notification());
            err
        })?;

        let editing = match self.modal {
            Modal::Open { editing } => editing,
            Modal::Closed => None,
        };

        self.submitting.store(true, Ordering::Release);
        Ok(SubmitTicket {
            payload,
            editing,
            in_flight: Arc::clone(&self.submitting),
        })
    }

    /// Applies the repository answer to a submit.
    ///
    /// Success closes the form, queues a toast and reloads the list.
    /// Failure keeps the form open with the draft intact.
    pub async fn finish_submit(
        &mut self,
        ticket: SubmitTicket<E>,
        result: ApiResult<MutationAck<E>>,
    ) -> ConsoleResult<()> {
        let editing = ticket.editing;
        drop(ticket);

        match result {
            Ok(ack) => {
                let verb = if editing.is_some() { "updated" } else { "created" };
                if let MutationAck::Record(record) = &ack {
                    info!(resource = E::RESOURCE, id = record.id(), "{} {}", E::LABEL, verb);
                } else {
                    info!(resource = E::RESOURCE, "{} {}", E::LABEL, verb);
                }
                self.notify(Notification::success(format!("{} {}", E::LABEL, verb)));
                self.close_modal();
                // A failed reload already queued its own toast.
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                let err = ConsoleError::from(e);
                warn!(resource = E::RESOURCE, error = %err, "Save failed");
                self.notify(err.notification());
                Err(err)
            }
        }
    }

    /// Deletes a record, then reloads the list.
    pub async fn delete(&mut self, id: RecordId) -> ConsoleResult<()> {
        let start = Instant::now();

        match self.repo.remove(id).await {
            Ok(()) => {
                info!(
                    resource = E::RESOURCE,
                    id = %id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "{} deleted",
                    E::LABEL
                );
                self.notify(Notification::success(format!("{} deleted", E::LABEL)));
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                let err = ConsoleError::from(e);
                warn!(resource = E::RESOURCE, id = %id, error = %err, "Delete failed");
                self.notify(err.notification());
                Err(err)
            }
        }
    }
}
