use crate::{
    config::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL},
    error::{EditorError, Result},
    logger,
    models::{
        Content, EditRequest, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        ImageData, InlineData, Part,
    },
};
use reqwest::Client;
use uuid::Uuid;

const FALLBACK_ITEM: &str = "main subject";

#[derive(Clone, Debug)]
pub struct EditClient {
    client: Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl EditClient {
    pub fn new(client: Client, config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| EditorError::ConfigError("GEMINI_API_KEY must be set".into()))?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.into()),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Assembles the ordered content parts and the instruction text. The
    /// variant is chosen by the presence of the item image: composite an
    /// item into the background, or restyle the background alone.
    pub fn build_request(request: &EditRequest) -> Result<GenerateContentRequest> {
        let background = ImageData::from_data_uri(&request.background_image)
            .map_err(|_| EditorError::InvalidFormat("background image".into()))?;

        let mut parts = vec![Part::InlineData {
            inline_data: InlineData {
                mime_type: background.mime_type,
                data: background.data,
            },
        }];

        let prompt = if let Some(item_uri) = &request.item_image {
            let item = ImageData::from_data_uri(item_uri)
                .map_err(|_| EditorError::InvalidFormat("item image".into()))?;
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: item.mime_type,
                    data: item.data,
                },
            });

            let item_name = request
                .item_description
                .as_deref()
                .filter(|text| !text.trim().is_empty())
                .unwrap_or(FALLBACK_ITEM);

            format!(
                "Using the first image as the main background, take the '{}' from the second \
                 image and seamlessly integrate it into the background. The final image should \
                 have a cohesive '{}' aesthetic, with consistent lighting, shadows, and \
                 perspective. The result must be a single, edited image.",
                item_name, request.style
            )
        } else {
            format!(
                "Transform the provided image by applying a '{}' style. Enhance the colors, \
                 lighting, and overall mood to fit the theme. Make the result visually stunning \
                 and high-quality. The result must be a single, edited image.",
                request.style
            )
        };

        parts.push(Part::Text { text: prompt });

        Ok(GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".into(), "TEXT".into()],
            },
        })
    }

    /// Submits one edit request and resolves exactly one output image.
    /// Single round trip: no streaming, no retries.
    pub async fn edit(&self, request: &EditRequest) -> Result<ImageData> {
        let payload = Self::build_request(request)?;
        let request_id = Uuid::new_v4();

        log::info!(
            "Submitting edit request {} to model: {}",
            request_id,
            self.model
        );

        let url = format!("{}/{}:generateContent", self.api_base, self.model);
        let timer = logger::timer("gemini edit round trip");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| EditorError::ServiceError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Edit request {} failed with status {}", request_id, status);
            return Err(EditorError::ServiceError(format!("{}: {}", status, body)));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| EditorError::ServiceError(e.to_string()))?;

        timer.stop();

        let image = Self::extract_image(response)?;
        log::info!(
            "Edit request {} returned an image ({})",
            request_id,
            image.mime_type
        );
        Ok(image)
    }

    /// Scans the first candidate's parts in order and returns the first one
    /// carrying inline image data. Additional candidates are ignored.
    pub fn extract_image(response: GenerateContentResponse) -> Result<ImageData> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(EditorError::EmptyResponse)?;

        let content = candidate.content.ok_or(EditorError::NoImageInResponse)?;

        content
            .parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .map(|inline| ImageData::new(inline.mime_type, inline.data))
            .ok_or(EditorError::NoImageInResponse)
    }
}
