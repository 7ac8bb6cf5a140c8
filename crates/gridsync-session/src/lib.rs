//! Inline edit session controller for GridSync
//!
//! At most one row of the grid is in edit mode at a time. The controller owns
//! that row's lifecycle:
//!
//! ```text
//! Idle ──click / add row──▶ Editing ──commit──▶ Saving ──▶ Idle
//!                              │  ▲                │
//!                              │  └── invalid ─────┘
//!                              └──── cancel ─────────────▶ Idle
//! ```
//!
//! Clicking into another row first drives the current row through the
//! commit path; the new row opens only once that commit has resolved.
//! Field widgets write into the shared `EditBuffer`; the controller reads it
//! when committing and never drives individual widgets.

mod buffer;
mod controller;
mod error;
mod event;
mod overlay;
mod validate;

pub use buffer::EditBuffer;
pub use controller::{
    AddRowOutcome, CellClick, CommitOutcome, EditSession, EditSessionController, KeyOutcome,
    SessionStatus,
};
pub use error::{SessionError, SessionResult};
pub use event::{Key, KeyEvent, PointerTarget};
pub use overlay::{OverlayGuard, OverlayRegistry};
pub use validate::{FieldError, FieldErrorKind, validate_record};
