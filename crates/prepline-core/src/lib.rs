pub mod error;
pub mod request;
pub mod types;

pub use error::RequestError;
pub use request::{GenerateRequest, InterviewDraft, InterviewRequest};
pub use types::*;
