//! Source media handling: classification, discovery and audio conversion.

pub mod audio;
pub mod converter;
pub mod discover;
pub mod path;

pub use audio::resolve_audio;
pub use converter::{FfmpegConverter, MediaConverter, MockConverter};
pub use discover::{discover, files_from_globs, is_being_downloaded};
pub use path::{FilePath, MediaKind, classify};
