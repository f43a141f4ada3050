pub mod document;
pub mod validate;

pub use document::{RequestDocument, ReportEventRecord, Variant};
