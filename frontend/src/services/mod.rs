//! Browser services behind the import dialog.
//!
//! # Services
//!
//! - [`dromo`] - Dromo uploader as the session's widget provider
//! - [`import`] - Direct import submission over `gloo-net`
//! - [`timer`] - Init timeout timer
//! - [`session`] - Spawns a session driver and mirrors it into signals
//! - [`download`] - Error report download
//! - [`auth`] - Signed-in operator from `localStorage`
//!
//! # JavaScript Bindings
//!
//! `src/js/dromo.js` loads the Dromo SDK and wraps its uploader.

pub mod auth;
pub mod download;
pub mod dromo;
pub mod import;
pub mod session;
pub mod timer;

pub use auth::{current_session, current_user, AuthSession};
pub use download::download_report;
pub use dromo::DromoProvider;
pub use import::GlooImportClient;
pub use session::{start_session, SignalObserver};
pub use timer::GlooTimer;
