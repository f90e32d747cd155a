#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    missing_docs
)]

//! Configuration for the intake resolver and its telemetry.
//!
//! Layout: `model.rs` (typed config sections), `defaults.rs` (default values),
//! `loader.rs` (JSON documents and `INTAKE_*` environment overrides),
//! `validate.rs` (post-load checks), `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ENV_PREFIX;
pub use model::{EventsConfig, IntakeConfig, LogFormatSetting, ResolverConfig, TelemetryConfig};
