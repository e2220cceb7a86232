use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    core::gateway::{GenerationGateway, ItineraryRequest},
    error::Result,
    services::prompts::hero_vibe,
    types::{HeroImage, TripItinerary, UserPreferences},
};

/// Outcome of a successful generation cycle.
#[derive(Debug, Clone)]
pub struct GeneratedTrip {
    pub itinerary: Arc<TripItinerary>,
    pub hero_image: Option<HeroImage>,
}

impl GeneratedTrip {
    pub fn new(itinerary: TripItinerary, hero_image: Option<HeroImage>) -> Self {
        Self {
            itinerary: Arc::new(itinerary),
            hero_image,
        }
    }
}

/// Two sequential steps with separate failure boundaries:
///
/// 1. the itinerary, whose failure ends the cycle;
/// 2. the hero image, prompted from the itinerary's destination and title, whose failure
///    only leaves the document without a picture.
pub async fn generate_trip<G>(gateway: &G, prefs: &UserPreferences) -> Result<GeneratedTrip>
where
    G: GenerationGateway + ?Sized,
{
    let request = ItineraryRequest::from(prefs);
    let itinerary = gateway.generate_itinerary(&request).await?;

    let vibe = hero_vibe(&itinerary.trip_title);
    let hero_image = match gateway
        .generate_hero_image(&itinerary.destination_name, &vibe)
        .await
    {
        Ok(image) => Some(image),
        Err(err) => {
            warn!(target: "wander::gateway", reason = %err.reason, "continuing without hero image");
            None
        }
    };

    info!(
        target: "wander::gateway",
        title = %itinerary.trip_title,
        hero_image = hero_image.is_some(),
        "generation cycle complete"
    );

    Ok(GeneratedTrip::new(itinerary, hero_image))
}
