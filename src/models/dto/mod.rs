pub mod request;
pub mod response;

pub use request::{GenerateQuizRequest, TranscriptMessageDto};
pub use response::{ApiResponse, GenerateQuizResponse};
