//! Request, response and error bodies

pub mod error;
pub mod json;
pub mod query;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use query::{QueryRequest, QueryResponse, StreamParams};
