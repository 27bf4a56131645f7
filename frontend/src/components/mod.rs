//! UI Components for the Vetfield import dialog.
//!
//! # Layout Components
//! - [`Header`] - App name and signed-in operator
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`ImportDialog`] - Hosts one import session for one table
//! - [`PreviewSection`] - Normalized rows awaiting confirmation
//! - [`ErrorsPanel`] - Rejected rows and the CSV export
//! - [`LogsPanel`] - Session activity

mod header;
mod import_dialog;
mod preview;
mod errors;
mod footer;
mod logs;

pub use header::*;
pub use import_dialog::*;
pub use preview::*;
pub use errors::*;
pub use footer::*;
pub use logs::*;
