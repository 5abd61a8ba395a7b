//! Output generators for mapped documents.
pub mod json;
