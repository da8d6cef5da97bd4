//! Host collaborators
//!
//! The engine never reaches into the host application directly. It talks to
//! these seams: the document (which file, flush it), the clock, and the
//! periodic tick. The configuration store lives in `storage`.

mod document;
mod ticker;

pub use document::{Clock, DocumentHost, FileDocument, SystemClock, UNSAVED_DOCUMENT};
pub use ticker::Ticker;
