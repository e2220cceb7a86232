use tracing::{debug, info, warn};

use crate::{
    core::{
        gateway::GenerationGateway,
        pipeline::{generate_trip, GeneratedTrip},
    },
    error::{GenerationError, TransitionError, GENERIC_FAILURE_MESSAGE},
    types::UserPreferences,
};

/// Application phase. `Display` always carries a document and `Error` always a message,
/// so neither can be entered empty.
#[derive(Debug, Clone)]
pub enum AppState {
    Idle,
    Generating,
    Display(GeneratedTrip),
    Error { message: String },
}

/// The UI surface each state is shown as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Form,
    Progress,
    Document,
    ErrorPanel,
}

impl AppState {
    pub fn name(&self) -> &'static str {
        match self {
            AppState::Idle => "idle",
            AppState::Generating => "generating",
            AppState::Display(_) => "displaying",
            AppState::Error { .. } => "in error",
        }
    }

    pub fn presentation(&self) -> Presentation {
        match self {
            AppState::Idle => Presentation::Form,
            AppState::Generating => Presentation::Progress,
            AppState::Display(_) => Presentation::Document,
            AppState::Error { .. } => Presentation::ErrorPanel,
        }
    }

    pub fn trip(&self) -> Option<&GeneratedTrip> {
        match self {
            AppState::Display(trip) => Some(trip),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AppState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Identifies one generation cycle. Results carrying a stale ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTicket(u64);

/// Sequences `Idle -> Generating -> Display | Error` and back to `Idle` on reset.
#[derive(Debug)]
pub struct StateController {
    state: AppState,
    cycle: u64,
}

impl Default for StateController {
    fn default() -> Self {
        Self::new()
    }
}

impl StateController {
    pub fn new() -> Self {
        Self {
            state: AppState::Idle,
            cycle: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Start a cycle. Only accepted from `Idle`, and only for valid preferences.
    pub fn submit(&mut self, prefs: &UserPreferences) -> Result<CycleTicket, TransitionError> {
        if !matches!(self.state, AppState::Idle) {
            return Err(TransitionError::NotAllowed {
                action: "submit",
                state: self.state.name(),
            });
        }

        prefs.validate()?;

        self.cycle += 1;
        self.state = AppState::Generating;
        info!(
            target: "wander::controller",
            cycle = self.cycle,
            destination = %prefs.destination,
            "generation started"
        );
        Ok(CycleTicket(self.cycle))
    }

    /// Apply the outcome of a cycle. Returns `false` when the ticket is stale (the cycle was
    /// abandoned by a reset) and the outcome was discarded.
    pub fn resolve(
        &mut self,
        ticket: CycleTicket,
        outcome: Result<GeneratedTrip, GenerationError>,
    ) -> bool {
        if ticket.0 != self.cycle || !matches!(self.state, AppState::Generating) {
            debug!(target: "wander::controller", ticket = ticket.0, "discarding stale result");
            return false;
        }

        self.state = match outcome {
            Ok(trip) => {
                info!(
                    target: "wander::controller",
                    cycle = self.cycle,
                    title = %trip.itinerary.trip_title,
                    "displaying itinerary"
                );
                AppState::Display(trip)
            }
            Err(err) => {
                warn!(
                    target: "wander::controller",
                    cycle = self.cycle,
                    code = err.error_code(),
                    error = %err,
                    "generation failed"
                );
                let message = err.user_message();
                AppState::Error {
                    message: if message.trim().is_empty() {
                        GENERIC_FAILURE_MESSAGE.to_string()
                    } else {
                        message
                    },
                }
            }
        };
        true
    }

    /// Back to the form. While generating this abandons the cycle; the request keeps running
    /// but its result will be discarded.
    pub fn reset(&mut self) {
        match self.state {
            AppState::Idle => return,
            AppState::Generating => {
                info!(
                    target: "wander::controller",
                    cycle = self.cycle,
                    "abandoning in-flight generation"
                );
                self.cycle += 1;
            }
            AppState::Display(_) | AppState::Error { .. } => {}
        }
        self.state = AppState::Idle;
    }

    /// Submit, run the two-step pipeline and resolve in one go.
    pub async fn run<G>(
        &mut self,
        gateway: &G,
        prefs: &UserPreferences,
    ) -> Result<&AppState, TransitionError>
    where
        G: GenerationGateway + ?Sized,
    {
        let ticket = self.submit(prefs)?;
        let outcome = generate_trip(gateway, prefs).await;
        self.resolve(ticket, outcome);
        Ok(&self.state)
    }
}
