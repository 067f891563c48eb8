pub mod document;

pub use document::{Format, TextDocument, MIME_JSON, MIME_XML};
