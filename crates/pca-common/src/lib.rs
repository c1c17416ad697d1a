//! ---
//! pca_section: "01-core-functionality"
//! pca_subsection: "module"
//! pca_type: "source"
//! pca_scope: "code"
//! pca_description: "Shared configuration and tracing primitives."
//! pca_version: "v0.0.0-prealpha"
//! pca_owner: "tbd"
//! ---
//! Shared primitives for the protection coordination assessment workspace.
//! This crate exposes the study configuration consumed by the calculation
//! engine and the tracing setup used by the command line tooling.

pub mod config;
pub mod logging;

pub use config::{
    AllowableFormula, AppConfig, LoadedAppConfig, LoggingConfig, Region, ReportConfig,
    StudyConfig,
};
pub use logging::{init_tracing, LogFormat};
