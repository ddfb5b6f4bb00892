//! Budget document generation: the document tree, the mapping from form
//! state onto it, and encoders for DOCX, HTML and Markdown.

pub mod builder;
pub mod docx;
pub mod encoder;
pub mod export;
pub mod format;
pub mod html;
pub mod i18n;
pub mod markdown;
pub mod naming;
pub mod tree;

pub use builder::build_budget_document;
pub use encoder::{DocumentEncoder, encoder_for};
pub use export::{FileSink, SavedFile, export_document};
pub use naming::export_file_name;
pub use tree::Document;
