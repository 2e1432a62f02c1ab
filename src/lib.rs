pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod session;

pub use config::GeminiConfig;
pub use error::{EditorError, Result};
pub use gemini::{EditBackend, EditClient, GeminiClient};
pub use models::*;
pub use session::{download_file_name, EditSession, SessionState};
