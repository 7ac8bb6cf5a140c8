//! Row edit state machine

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gridsync_columns::ColumnReconciler;
use gridsync_core::{DataRecord, RowKey, RowKeyAllocator, changed_fields};
use gridsync_datasource::{DataSourceError, GridDataSource};
use gridsync_selection::SelectionStore;
use gridsync_settings::{EditingSettings, GridSettings};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::buffer::EditBuffer;
use crate::error::{SessionError, SessionResult};
use crate::event::{Key, KeyEvent, PointerTarget};
use crate::overlay::OverlayRegistry;
use crate::validate::{FieldError, validate_record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Editing,
    Saving,
}

/// The row currently in edit mode
#[derive(Debug, Clone)]
pub struct EditSession {
    pub row_key: RowKey,
    /// The row has not been inserted yet. Always matches
    /// `row_key.is_pending()`, whether the row was added or clicked.
    pub is_new: bool,
    pub status: SessionStatus,
    pub focused_column: Option<String>,
    initial_snapshot: DataRecord,
}

impl EditSession {
    fn new(row_key: RowKey, record: DataRecord, is_new: bool, focused_column: Option<String>) -> Self {
        Self {
            row_key,
            is_new,
            status: SessionStatus::Editing,
            focused_column,
            initial_snapshot: record,
        }
    }

    /// Whether `current` differs from the record the session started from
    pub fn is_dirty(&self, current: &DataRecord) -> bool {
        &self.initial_snapshot != current
    }
}

/// Result of driving the edited row through the save path
#[derive(Debug)]
pub enum CommitOutcome {
    /// Another commit was already in flight; nothing was done
    Suppressed,
    NoSession,
    /// The row failed validation and stays in edit mode
    Invalid(Vec<FieldError>),
    /// Nothing changed; the session closed without saving
    Unchanged,
    Inserted {
        placeholder: RowKey,
        record: DataRecord,
    },
    Updated {
        record: DataRecord,
    },
    /// The data source rejected the row; the session closed anyway
    PersistFailed {
        error: DataSourceError,
    },
}

impl CommitOutcome {
    /// Whether the session left edit mode
    pub fn closed(&self) -> bool {
        matches!(
            self,
            Self::Unchanged | Self::Inserted { .. } | Self::Updated { .. } | Self::PersistFailed { .. }
        )
    }

    /// Whether the row was closed without an error
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            Self::Unchanged | Self::Inserted { .. } | Self::Updated { .. }
        )
    }

    /// Whether another row may be opened after this outcome
    fn releases_row(&self) -> bool {
        !matches!(self, Self::Suppressed | Self::Invalid(_))
    }
}

#[derive(Debug)]
pub enum CellClick {
    /// System column, non-editable column, or unknown column
    Ignored,
    /// Read-only grid: the click toggled the row's selection
    SelectionToggled { row_key: RowKey, selected: bool },
    /// The clicked row was already being edited
    Focused { column: String },
    Opened {
        row_key: RowKey,
        column: String,
        /// Commit of the row that was open before, if any
        previous: Option<CommitOutcome>,
    },
    /// The open row could not be released, so the clicked row stays closed
    Blocked(CommitOutcome),
}

#[derive(Debug)]
pub enum KeyOutcome {
    Ignored,
    /// A field widget already handled the key
    Swallowed,
    Focused(String),
    Committed(CommitOutcome),
    /// The last row was committed and a new row opened below it
    Advanced {
        committed: CommitOutcome,
        row_key: RowKey,
    },
    Cancelled,
}

#[derive(Debug)]
pub enum AddRowOutcome {
    Added {
        row_key: RowKey,
        column: Option<String>,
    },
    Blocked(CommitOutcome),
    ReadOnly,
}

/// Clears the saving flag when the commit that set it finishes or is dropped
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives the single row in edit mode.
///
/// Mutable state sits behind short-lived locks that are never held across an
/// await; the only suspension points are the settle delay after a blur and
/// the data source calls.
pub struct EditSessionController {
    data_source: Arc<dyn GridDataSource>,
    columns: Arc<ColumnReconciler>,
    selection: Arc<SelectionStore>,
    overlays: Arc<OverlayRegistry>,
    buffer: Arc<EditBuffer>,
    keys: RowKeyAllocator,
    settings: EditingSettings,
    key_field: String,
    session: Mutex<Option<EditSession>>,
    saving: AtomicBool,
}

impl std::fmt::Debug for EditSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSessionController")
            .field("session", &*self.session.lock())
            .field("saving", &self.saving.load(Ordering::Relaxed))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EditSessionController {
    pub fn new(
        data_source: Arc<dyn GridDataSource>,
        columns: Arc<ColumnReconciler>,
        selection: Arc<SelectionStore>,
        settings: &GridSettings,
    ) -> Self {
        Self {
            data_source,
            columns,
            selection,
            overlays: Arc::new(OverlayRegistry::new()),
            buffer: Arc::new(EditBuffer::new()),
            keys: RowKeyAllocator::new(),
            settings: settings.editing.clone(),
            key_field: settings.data.key_field.clone(),
            session: Mutex::new(None),
            saving: AtomicBool::new(false),
        }
    }

    /// Share an overlay registry with the field widgets
    pub fn with_overlays(mut self, overlays: Arc<OverlayRegistry>) -> Self {
        self.overlays = overlays;
        self
    }

    pub fn overlays(&self) -> Arc<OverlayRegistry> {
        Arc::clone(&self.overlays)
    }

    /// The record container field widgets write into
    pub fn buffer(&self) -> Arc<EditBuffer> {
        Arc::clone(&self.buffer)
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn session(&self) -> Option<EditSession> {
        self.session.lock().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.session
            .lock()
            .as_ref()
            .map_or(SessionStatus::Idle, |s| s.status)
    }

    pub fn active_row(&self) -> Option<RowKey> {
        self.session.lock().as_ref().map(|s| s.row_key)
    }

    pub fn focused_column(&self) -> Option<String> {
        self.session.lock().as_ref()?.focused_column.clone()
    }

    /// Route a click on a data cell
    #[tracing::instrument(skip(self, record), fields(row = %row_key))]
    pub async fn on_cell_click(&self, row_key: RowKey, column: &str, record: &DataRecord) -> CellClick {
        if self.columns.settings().is_system_column(column) {
            return CellClick::Ignored;
        }
        if self.settings.readonly {
            let selected = self.selection.toggle(row_key);
            return CellClick::SelectionToggled { row_key, selected };
        }
        if !self.columns.is_editable(column) {
            tracing::trace!(column, "column is not editable");
            return CellClick::Ignored;
        }
        self.enter_row(row_key, column.to_string(), record.clone()).await
    }

    /// Open `row_key` for editing, reading its record from the data source
    #[tracing::instrument(skip(self), fields(row = %row_key))]
    pub async fn edit_row(&self, row_key: RowKey, column: &str) -> SessionResult<CellClick> {
        self.check_editable(column)?;
        let record = self.data_source.by_key(row_key).await?;
        Ok(self.enter_row(row_key, column.to_string(), record).await)
    }

    async fn enter_row(&self, row_key: RowKey, column: String, record: DataRecord) -> CellClick {
        let previous = match self.active_row() {
            Some(active) if active == row_key => {
                self.move_focus(column.clone());
                return CellClick::Focused { column };
            }
            Some(active) => {
                tracing::debug!(from = %active, to = %row_key, "switching rows");
                let outcome = self.commit().await;
                if !outcome.releases_row() {
                    tracing::info!(row = %active, "row could not be released, switch aborted");
                    return CellClick::Blocked(outcome);
                }
                Some(outcome)
            }
            None => None,
        };

        self.open(row_key, record, row_key.is_pending(), Some(column.clone()));
        CellClick::Opened {
            row_key,
            column,
            previous,
        }
    }

    /// Open a new, unsaved row with field defaults filled in
    #[tracing::instrument(skip(self))]
    pub async fn add_row(&self) -> AddRowOutcome {
        if self.settings.readonly {
            return AddRowOutcome::ReadOnly;
        }
        if self.active_row().is_some() {
            let outcome = self.commit().await;
            if !outcome.releases_row() {
                return AddRowOutcome::Blocked(outcome);
            }
        }

        let row_key = self.keys.next();
        let editable = self.columns.editable_columns();

        let mut record = DataRecord::new();
        record.insert(self.key_field.clone(), json!(row_key.to_widget_key()));
        for name in &editable {
            let default = self
                .columns
                .field(name)
                .and_then(|f| f.default_value.clone())
                .filter(|v| !v.is_null());
            if let Some(value) = default {
                record.insert(name.clone(), value);
            }
        }

        let column = editable.into_iter().next();
        self.open(row_key, record, true, column.clone());
        AddRowOutcome::Added { row_key, column }
    }

    /// Route a key press while a row is being edited.
    ///
    /// `viewport` lists the keys of the visible data rows in display order.
    #[tracing::instrument(skip(self, viewport))]
    pub async fn on_key_down(&self, event: KeyEvent, viewport: &[RowKey]) -> KeyOutcome {
        let Some(session) = self.session() else {
            return KeyOutcome::Ignored;
        };
        if session.status != SessionStatus::Editing {
            return KeyOutcome::Ignored;
        }
        if event.default_prevented {
            return KeyOutcome::Swallowed;
        }

        match event.key {
            Key::Tab => {
                match self.next_column(session.focused_column.as_deref(), event.shift) {
                    Some(column) => {
                        self.move_focus(column.clone());
                        KeyOutcome::Focused(column)
                    }
                    None => KeyOutcome::Ignored,
                }
            }
            Key::Enter => {
                let committed = self.commit().await;
                let was_last = viewport.last() == Some(&session.row_key);
                if !(was_last && self.settings.add_row_on_enter && committed.succeeded()) {
                    return KeyOutcome::Committed(committed);
                }
                match self.add_row().await {
                    AddRowOutcome::Added { row_key, .. } => KeyOutcome::Advanced { committed, row_key },
                    _ => KeyOutcome::Committed(committed),
                }
            }
            Key::Escape if self.cancel() => KeyOutcome::Cancelled,
            Key::Escape | Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Route a document-level pointer press; commits when it lands outside
    /// the edited row and outside every field widget overlay
    pub async fn on_pointer_down(&self, target: PointerTarget) -> Option<CommitOutcome> {
        let session = self.session()?;
        if session.status != SessionStatus::Editing {
            return None;
        }
        if target.row == Some(session.row_key) || target.in_overlay || self.overlays.has_open() {
            tracing::trace!(?target, "pointer press inside the edited row");
            return None;
        }
        Some(self.commit().await)
    }

    /// Save the edited row and leave edit mode
    #[tracing::instrument(skip(self))]
    pub async fn commit(&self) -> CommitOutcome {
        let Some(_saving) = SavingGuard::acquire(&self.saving) else {
            tracing::debug!("commit already in flight");
            return CommitOutcome::Suppressed;
        };
        let Some((row_key, is_new)) = self.begin_saving() else {
            return CommitOutcome::NoSession;
        };

        // Let the focused input hand its value to the record before reading it
        self.buffer.blur();
        tokio::time::sleep(self.settings.settle_delay()).await;

        let (Some(current), Some(initial)) = (self.buffer.record(), self.initial_snapshot()) else {
            self.close();
            return CommitOutcome::NoSession;
        };

        let errors = validate_record(&current, self.columns.fields(), &self.columns.editable_columns());
        if !errors.is_empty() {
            tracing::info!(row = %row_key, errors = errors.len(), "row failed validation");
            self.set_status(SessionStatus::Editing);
            return CommitOutcome::Invalid(errors);
        }

        if !is_new && initial == current {
            tracing::debug!(row = %row_key, "row unchanged");
            self.close();
            return CommitOutcome::Unchanged;
        }

        let result = if is_new {
            self.data_source.insert(current).await
        } else {
            let changes = changed_fields(&initial, &current);
            self.data_source.update(row_key, changes).await
        };
        self.close();

        match result {
            Ok(record) if is_new => {
                match RowKey::from_record(&record, &self.key_field) {
                    Some(saved) if saved != row_key => self.selection.replace_key(row_key, saved),
                    _ => {}
                }
                tracing::info!(placeholder = %row_key, "row inserted");
                CommitOutcome::Inserted {
                    placeholder: row_key,
                    record,
                }
            }
            Ok(record) => {
                tracing::info!(row = %row_key, "row updated");
                CommitOutcome::Updated { record }
            }
            Err(error) => {
                tracing::error!(row = %row_key, error = %error, "failed to save row");
                CommitOutcome::PersistFailed { error }
            }
        }
    }

    /// Discard the edited row's changes. Refused while a commit is in flight.
    pub fn cancel(&self) -> bool {
        let mut session = self.session.lock();
        match session.as_ref().map(|s| s.status) {
            Some(SessionStatus::Editing) => {}
            Some(_) => {
                tracing::debug!("commit in flight, cancel refused");
                return false;
            }
            None => return false,
        }
        if let Some(cancelled) = session.take() {
            tracing::info!(row = %cancelled.row_key, "edit cancelled");
        }
        drop(session);
        self.buffer.clear();
        true
    }

    /// Move focus to another column of the edited row
    pub fn focus_column(&self, column: &str) -> SessionResult<()> {
        if self.active_row().is_none() {
            return Err(SessionError::NoActiveSession);
        }
        self.check_editable(column)?;
        self.move_focus(column.to_string());
        Ok(())
    }

    /// Write a field value into the edited row, as a field widget does
    pub fn set_field(&self, column: &str, value: Value) -> SessionResult<()> {
        if self.active_row().is_none() {
            return Err(SessionError::NoActiveSession);
        }
        self.check_editable(column)?;
        self.buffer.set_field(column, value);
        Ok(())
    }

    /// Type into the focused input; the value reaches the record on blur
    pub fn input(&self, value: Value) -> SessionResult<()> {
        let column = self.focused_column().ok_or(SessionError::NoActiveSession)?;
        self.buffer.stage(column, value);
        Ok(())
    }

    fn check_editable(&self, column: &str) -> SessionResult<()> {
        if !self.columns.schema().iter().any(|c| c.name == column) {
            return Err(SessionError::UnknownColumn(column.to_string()));
        }
        if self.settings.readonly || !self.columns.is_editable(column) {
            return Err(SessionError::ColumnNotEditable(column.to_string()));
        }
        Ok(())
    }

    fn next_column(&self, current: Option<&str>, backwards: bool) -> Option<String> {
        let columns = self.columns.editable_columns();
        let len = columns.len();
        if len == 0 {
            return None;
        }
        let index = match current.and_then(|c| columns.iter().position(|n| n == c)) {
            Some(i) if backwards => (i + len - 1) % len,
            Some(i) => (i + 1) % len,
            None if backwards => len - 1,
            None => 0,
        };
        columns.into_iter().nth(index)
    }

    fn move_focus(&self, column: String) {
        self.buffer.blur();
        if let Some(session) = self.session.lock().as_mut() {
            session.focused_column = Some(column);
        }
    }

    fn open(&self, row_key: RowKey, record: DataRecord, is_new: bool, column: Option<String>) {
        tracing::info!(row = %row_key, is_new, column = ?column, "editing row");
        self.buffer.load(record.clone());
        *self.session.lock() = Some(EditSession::new(row_key, record, is_new, column));
    }

    fn close(&self) {
        if let Some(session) = self.session.lock().take() {
            tracing::debug!(row = %session.row_key, "edit session closed");
        }
        self.buffer.clear();
    }

    fn begin_saving(&self) -> Option<(RowKey, bool)> {
        let mut guard = self.session.lock();
        let session = guard.as_mut()?;
        session.status = SessionStatus::Saving;
        Some((session.row_key, session.is_new))
    }

    fn set_status(&self, status: SessionStatus) {
        if let Some(session) = self.session.lock().as_mut() {
            session.status = status;
        }
    }

    fn initial_snapshot(&self) -> Option<DataRecord> {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.initial_snapshot.clone())
    }
}
