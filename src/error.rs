use std::fmt;

#[derive(Debug)]
pub enum EditorError {
    ConfigError(String),
    InvalidFormat(String),
    MissingInput(String),
    EmptyResponse,
    NoImageInResponse,
    ServiceError(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            EditorError::InvalidFormat(what) => write!(f, "Invalid {} format.", what),
            EditorError::MissingInput(msg) => write!(f, "{}", msg),
            EditorError::EmptyResponse => write!(f, "No content generated. Please try again."),
            EditorError::NoImageInResponse => {
                write!(f, "No image was found in the API response.")
            }
            EditorError::ServiceError(msg) => write!(f, "Image service error: {}", msg),
        }
    }
}

impl std::error::Error for EditorError {}

pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            EditorError::InvalidFormat("background image".into()).to_string(),
            "Invalid background image format."
        );
        assert_eq!(
            EditorError::MissingInput("Please upload a background image first.".into()).to_string(),
            "Please upload a background image first."
        );
        assert_eq!(
            EditorError::EmptyResponse.to_string(),
            "No content generated. Please try again."
        );
        assert_eq!(
            EditorError::NoImageInResponse.to_string(),
            "No image was found in the API response."
        );
    }
}
