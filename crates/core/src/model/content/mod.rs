mod content;
mod format;
mod media;

pub use content::{Content, ContentError};
pub use format::Format;
pub use media::{MediaError, MediaUri};
