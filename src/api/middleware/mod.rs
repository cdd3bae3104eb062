//! HTTP middleware: request ids, request logging, error normalisation and the
//! credential gate.

pub mod auth_gate;
mod error_handler;
mod logging;
mod request_id;

pub use auth_gate::{Access, LOGIN_PAGE, auth_gate, classify, is_api_path};
pub use error_handler::{api_error_normaliser, error_to_code, error_to_status_code};
pub use logging::logging_middleware;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
