//! wander-rs: AI travel itinerary generation with printable, Markdown and PDF exports.
//!
//! A generation cycle asks a hosted text model for a schema-constrained [`TripItinerary`],
//! then (best effort) an image model for a hero picture. The result is rendered into a
//! [`VisualTree`] that the export transformers turn into a print job, Markdown, or a
//! paginated PDF.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wander_rs::{
//!     render, GeminiGateway, MarkdownExporter, RenderOptions, StateController, UserPreferences,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = GeminiGateway::from_env()?;
//!     let prefs = UserPreferences::new("东京", 3).with_interests(["美食探店"]);
//!
//!     let mut controller = StateController::new();
//!     if let Some(trip) = controller.run(&gateway, &prefs).await?.trip() {
//!         let options = RenderOptions::default();
//!         let document = render(&trip.itinerary, trip.hero_image.as_ref(), &options);
//!         println!("{}", document.title);
//!         let markdown = MarkdownExporter::new().export(&trip.itinerary);
//!         println!("{}", String::from_utf8_lossy(&markdown.bytes));
//!     }
//!     Ok(())
//! }
//! ```

extern crate self as wander_rs;

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod render;
pub mod schemas;
pub(crate) mod services;
pub mod types;

pub use crate::core::{
    generate_trip, AppState, CycleTicket, GeminiGateway, GeneratedTrip, GenerationGateway,
    ItineraryRequest, Presentation, StateController,
};
pub use config::GatewayConfig;
pub use error::{
    ExportError, GenerationError, ImageUnavailable, PreferencesError, Result, TransitionError,
};
pub use export::{
    export_file_name, to_markdown, CommandRasterizer, ExportedFile, HtmlFilePrintHost,
    MarkdownExporter, PageFormat, PdfExporter, PrintHost, PrintJob, Raster, Rasterizer,
};
pub use render::{render, RenderOptions, RenderedDocument, VisualTree};
pub use schemas::{ResponseSchema, SchemaHandle};
pub use types::{
    BudgetCategory, BudgetLevel, HeroImage, TravelerGroup, TripActivity, TripDay, TripItinerary,
    UserPreferences,
};
pub use wander_macros::response_schema;

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
