use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    config::GatewayConfig,
    error::{ImageUnavailable, Result},
    schemas::ResponseSchema,
    services::{
        gemini_client::{GenerateContentRequest, GeminiClient},
        prompts::{hero_image_prompt, itinerary_prompt, SYSTEM_INSTRUCTION},
        response_handler::{extract_text, finish_reason, first_inline_data},
    },
    types::{
        parse_structured_text, BudgetLevel, HeroImage, TravelerGroup, TripItinerary,
        UserPreferences,
    },
};

/// What the itinerary call needs from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryRequest {
    pub destination: String,
    pub duration_days: u32,
    pub budget_level: BudgetLevel,
    pub interests: Vec<String>,
    pub travelers: TravelerGroup,
}

impl From<&UserPreferences> for ItineraryRequest {
    fn from(prefs: &UserPreferences) -> Self {
        Self {
            destination: prefs.destination.trim().to_string(),
            duration_days: prefs.duration,
            budget_level: prefs.budget_level,
            interests: prefs.interests.clone(),
            travelers: prefs.travelers,
        }
    }
}

/// The external generative service, seen from this crate.
///
/// Text generation is required and fails with [`GenerationError`]. Image generation is
/// optional and fails with [`ImageUnavailable`], which callers turn into "no image".
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate_itinerary(&self, request: &ItineraryRequest) -> Result<TripItinerary>;

    async fn generate_hero_image(
        &self,
        destination_name: &str,
        vibe: &str,
    ) -> std::result::Result<HeroImage, ImageUnavailable>;
}

/// [`GenerationGateway`] backed by the Gemini `generateContent` REST API.
#[derive(Debug, Clone)]
pub struct GeminiGateway {
    client: GeminiClient,
    text_model: String,
    image_model: String,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(&config)?,
            text_model: config.text_model,
            image_model: config.image_model,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn generate_itinerary(&self, request: &ItineraryRequest) -> Result<TripItinerary> {
        let schema = TripItinerary::schema().gemini_schema()?;
        let body = GenerateContentRequest::new(itinerary_prompt(request))
            .with_system_instruction(SYSTEM_INSTRUCTION)
            .with_json_schema(schema)
            .into_value();

        info!(
            target: "wander::gateway",
            destination = %request.destination,
            days = request.duration_days,
            model = %self.text_model,
            "requesting itinerary"
        );
        debug!(target: "wander::gateway", body = %body);

        let response = self.client.generate_content(&self.text_model, &body).await?;
        let text = extract_text(&response)?;

        if finish_reason(&response) == Some("MAX_TOKENS") {
            warn!(target: "wander::gateway", "itinerary output was truncated by the token limit");
        }

        let itinerary: TripItinerary = parse_structured_text(&text)?;

        info!(
            target: "wander::gateway",
            title = %itinerary.trip_title,
            days = itinerary.days.len(),
            activities = itinerary.activity_count(),
            "itinerary generated"
        );
        Ok(itinerary)
    }

    async fn generate_hero_image(
        &self,
        destination_name: &str,
        vibe: &str,
    ) -> std::result::Result<HeroImage, ImageUnavailable> {
        let body =
            GenerateContentRequest::new(hero_image_prompt(destination_name, vibe)).into_value();

        let response = self
            .client
            .generate_content(&self.image_model, &body)
            .await
            .map_err(|err| ImageUnavailable::new(err.to_string()))?;

        let (mime_type, data) = first_inline_data(&response)
            .ok_or_else(|| ImageUnavailable::new("response contained no inline image"))?;

        HeroImage::from_inline(mime_type, data)
    }
}
