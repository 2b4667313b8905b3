pub mod document_service;
pub mod gateway;
pub mod persona_service;
pub mod retry;
pub mod session_service;

pub use document_service::{DocumentService, PdfTextExtractor, TextExtractor};
pub use gateway::{ContentGateway, LlmGateway};
pub use persona_service::{select_persona, PersonaBlock};
pub use retry::{retry_unavailable, RetryPolicy};
pub use session_service::SessionService;
