use crate::{
    error::{EditorError, Result},
    gemini::EditBackend,
    models::{EditRequest, ImageData, PhotoStyle},
};

const MISSING_BACKGROUND: &str = "Please upload a background image first.";

/// Presentation state. `Idle` only describes the pristine initial screen
/// and is never re-entered after the first generate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Generating,
    Succeeded(ImageData),
    Failed(String),
}

/// Owns the UI state: uploaded images, style selection, free-text item
/// description, and the generation lifecycle. All mutations happen on the
/// single event-loop task; at most one edit request is in flight.
#[derive(Debug)]
pub struct EditSession {
    background_image: Option<String>,
    item_image: Option<String>,
    item_description: String,
    style: PhotoStyle,
    state: SessionState,
    generation: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            background_image: None,
            item_image: None,
            item_description: String::new(),
            style: PhotoStyle::default(),
            state: SessionState::Idle,
            generation: 0,
        }
    }

    pub fn set_background(&mut self, data_uri: impl Into<String>) {
        self.background_image = Some(data_uri.into());
    }

    pub fn remove_background(&mut self) {
        self.background_image = None;
    }

    pub fn set_item(&mut self, data_uri: impl Into<String>) {
        self.item_image = Some(data_uri.into());
    }

    pub fn remove_item(&mut self) {
        self.item_image = None;
    }

    pub fn set_item_description(&mut self, text: impl Into<String>) {
        self.item_description = text.into();
    }

    pub fn set_style(&mut self, style: PhotoStyle) {
        self.style = style;
    }

    pub fn style(&self) -> PhotoStyle {
        self.style
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, SessionState::Generating)
    }

    pub fn result(&self) -> Option<&ImageData> {
        match &self.state {
            SessionState::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Generate action guard: a background is present and nothing is in
    /// flight.
    pub fn can_generate(&self) -> bool {
        self.background_image.is_some() && !self.is_generating()
    }

    /// Starts a generation attempt. Returns the request to dispatch plus a
    /// ticket for [`finish`](Self::finish), or `None` when the action is a
    /// no-op (already in flight) or rejected (no background uploaded, which
    /// records the failure without any adapter call).
    pub fn begin(&mut self) -> Option<(EditRequest, u64)> {
        if self.is_generating() {
            return None;
        }

        let background = match &self.background_image {
            Some(uri) => uri.clone(),
            None => {
                self.state = SessionState::Failed(
                    EditorError::MissingInput(MISSING_BACKGROUND.into()).to_string(),
                );
                return None;
            }
        };

        let mut request = EditRequest::new(background, self.style);
        if let Some(item) = &self.item_image {
            request = request.with_item_image(item.clone());
        }
        if !self.item_description.is_empty() {
            request = request.with_item_description(self.item_description.clone());
        }

        self.generation += 1;
        self.state = SessionState::Generating;
        Some((request, self.generation))
    }

    /// Records the outcome of a dispatched request. Stale tickets are
    /// ignored: last write wins on the result slot.
    pub fn finish(&mut self, ticket: u64, outcome: Result<ImageData>) {
        if ticket != self.generation || !self.is_generating() {
            return;
        }

        self.state = match outcome {
            Ok(image) => SessionState::Succeeded(image),
            Err(err) => SessionState::Failed(err.to_string()),
        };
    }

    /// Drives one full generate action against the given backend.
    pub async fn generate<B: EditBackend + ?Sized>(&mut self, backend: &B) {
        if let Some((request, ticket)) = self.begin() {
            let outcome = backend.edit(&request).await;
            self.finish(ticket, outcome);
        }
    }
}

/// File name offered at the download boundary.
pub fn download_file_name() -> String {
    format!("ai-edited-{}.png", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockBackend {
        image: Option<ImageData>,
        calls: Mutex<Vec<EditRequest>>,
    }

    impl MockBackend {
        fn returning(image: ImageData) -> Self {
            Self {
                image: Some(image),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                image: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EditBackend for MockBackend {
        async fn edit(&self, request: &EditRequest) -> Result<ImageData> {
            self.calls.lock().unwrap().push(request.clone());
            match &self.image {
                Some(image) => Ok(image.clone()),
                None => Err(EditorError::EmptyResponse),
            }
        }
    }

    fn mock_image() -> ImageData {
        ImageData::new("image/png", "bW9ja2Vk")
    }

    #[tokio::test]
    async fn test_restyle_success_enables_download() {
        let backend = MockBackend::returning(mock_image());
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");
        session.set_style(PhotoStyle::Realistic);

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 1);
        let request = &backend.calls.lock().unwrap()[0];
        assert_eq!(request.style, PhotoStyle::Realistic);
        assert!(request.item_image.is_none());

        assert_eq!(session.result(), Some(&mock_image()));
        assert!(session.can_generate());

        let name = download_file_name();
        assert!(name.starts_with("ai-edited-"));
        assert!(name.ends_with(".png"));
    }

    #[tokio::test]
    async fn test_item_description_is_forwarded_verbatim() {
        let backend = MockBackend::returning(mock_image());
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");
        session.set_item("data:image/jpeg;base64,d29ybGQ=");
        session.set_item_description("the bouquet of roses");

        session.generate(&backend).await;

        let request = &backend.calls.lock().unwrap()[0];
        assert_eq!(
            request.item_description.as_deref(),
            Some("the bouquet of roses")
        );
        assert!(request.item_image.is_some());
    }

    #[tokio::test]
    async fn test_generate_without_background_skips_backend() {
        let backend = MockBackend::returning(mock_image());
        let mut session = EditSession::new();

        session.generate(&backend).await;

        assert_eq!(backend.call_count(), 0);
        assert_eq!(
            session.error(),
            Some("Please upload a background image first.")
        );
        assert!(!session.can_generate());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_message() {
        let backend = MockBackend::failing();
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");

        session.generate(&backend).await;

        assert_eq!(
            session.error(),
            Some("No content generated. Please try again.")
        );
        // The generate action is re-enabled after a failure.
        assert!(session.can_generate());
    }

    #[test]
    fn test_double_trigger_is_a_no_op() {
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");

        let first = session.begin();
        assert!(first.is_some());
        assert!(session.is_generating());

        assert!(session.begin().is_none());
        assert!(!session.can_generate());

        let (_, ticket) = first.unwrap();
        session.finish(ticket, Ok(mock_image()));
        assert!(matches!(session.state(), SessionState::Succeeded(_)));
        assert!(session.begin().is_some());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");

        let (_, ticket) = session.begin().unwrap();
        session.finish(ticket + 1, Ok(mock_image()));
        assert!(session.is_generating());

        session.finish(ticket, Err(EditorError::NoImageInResponse));
        assert_eq!(
            session.error(),
            Some("No image was found in the API response.")
        );
    }

    #[test]
    fn test_new_generation_clears_previous_result() {
        let mut session = EditSession::new();
        session.set_background("data:image/png;base64,aGVsbG8=");

        let (_, ticket) = session.begin().unwrap();
        session.finish(ticket, Ok(mock_image()));
        assert!(session.result().is_some());

        session.begin().unwrap();
        assert!(session.result().is_none());
        assert!(session.is_generating());
    }

    #[test]
    fn test_initial_state_is_idle() {
        let session = EditSession::new();
        assert_eq!(session.state(), &SessionState::Idle);
        assert_eq!(session.style(), PhotoStyle::Realistic);
        assert!(!session.can_generate());
    }
}
