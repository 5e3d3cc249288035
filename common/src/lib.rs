//! record-confirm common library
//!
//! Shared by the CLI and the desktop editor: the record model, the
//! record store and its save queue, the session that drives one form,
//! and image decoding.

pub mod config;
pub mod error;
pub mod form;
pub mod imaging;
pub mod logging;
pub mod save_queue;
pub mod session;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use imaging::Bitmap;
pub use form::{parse_confirmed_results, ImageSlot, RecordForm};
pub use save_queue::{SaveOutcome, SaveQueue};
pub use session::Session;
pub use store::RecordStore;
pub use types::{ImageRef, InlineImage, Record};
