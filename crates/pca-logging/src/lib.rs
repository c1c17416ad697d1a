//! ---
//! pca_section: "03-logging"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Structured logging context for protection studies."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
#![warn(missing_docs)]
//! Structured logging helpers shared by the calculation engine and the CLI.

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for development and tests.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Protection device under assessment.
    pub device: Option<&'a str>,
    /// Termination or line being evaluated.
    pub location: Option<&'a str>,
    /// Auto-reclose trip stage, starting at 1.
    pub trip: Option<u32>,
    /// Fault category label.
    pub fault_type: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device identifier.
    pub fn with_device(mut self, device: &'a str) -> Self {
        self.device = Some(device);
        self
    }

    /// Attach a location identifier.
    pub fn with_location(mut self, location: &'a str) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach a trip stage.
    pub fn with_trip(mut self, trip: u32) -> Self {
        self.trip = Some(trip);
        self
    }

    /// Attach a fault category label.
    pub fn with_fault_type(mut self, fault_type: &'a str) -> Self {
        self.fault_type = Some(fault_type);
        self
    }
}

/// Outcome used when emitting study lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyOutcome {
    /// The study step ran to completion.
    Completed,
    /// The study step was aborted for the device in context.
    Aborted,
}

impl StudyOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            StudyOutcome::Completed => "completed",
            StudyOutcome::Aborted => "aborted",
        }
    }
}

/// Emit a standardized study event with a completed/aborted outcome.
pub fn log_study_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: StudyOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    let device = ctx.device.unwrap_or("");
    let location = ctx.location.unwrap_or("");
    let trip = ctx.trip.unwrap_or_default();
    let fault_type = ctx.fault_type.unwrap_or("");
    let outcome_label = outcome.as_str();
    match outcome {
        StudyOutcome::Aborted => tracing::event!(
            Level::ERROR,
            event,
            outcome = outcome_label,
            device,
            location,
            trip,
            fault_type,
            message = %message
        ),
        StudyOutcome::Completed => tracing::event!(
            Level::INFO,
            event,
            outcome = outcome_label,
            device,
            location,
            trip,
            fault_type,
            message = %message
        ),
    }
}
