//! Pure transformations for range loading.
//!
//! Response validation, fault classification and request assembly. These
//! functions take plain values and perform no I/O.

mod classify;
mod request;
mod validation;

pub use classify::{classify_fault, early_eof_detail, EARLY_EOF_MESSAGE};
pub use request::{merge_headers, resolve_source_url};
pub use validation::{is_redirected, is_success_response};
