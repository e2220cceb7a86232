pub mod hero;
pub mod itinerary;
pub mod preferences;
pub mod response;

pub use hero::HeroImage;
pub use itinerary::{BudgetCategory, TripActivity, TripDay, TripItinerary};
pub use preferences::{BudgetLevel, TravelerGroup, UserPreferences, INTEREST_CATALOG};
pub use response::{deserialize_structured_response, parse_structured_text};
