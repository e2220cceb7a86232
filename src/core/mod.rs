pub mod controller;
pub mod gateway;
pub mod pipeline;

pub use controller::{AppState, CycleTicket, Presentation, StateController};
pub use gateway::{GeminiGateway, GenerationGateway, ItineraryRequest};
pub use pipeline::{generate_trip, GeneratedTrip};
