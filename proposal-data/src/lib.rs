//! I/O boundary for the proposal engine: form submissions, CSV batches, the
//! profit-summary grid and proposal documents.

pub mod document;
pub mod form;
pub mod loader;
pub mod sheet;

pub use document::TemplateError;
pub use form::{FormFields, FormSubmission, decode_form, encode_record};
pub use loader::LoadError;
pub use sheet::{SheetError, SheetGrid};
