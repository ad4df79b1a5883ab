//! Target builders and the per-subsystem registry.
//!
//! A target builder closes over one target's dependency and feature sets and
//! forwards them to the Default Builder when the host asks for that target.

pub mod config;
pub mod default;
pub mod errors;
pub mod events;
pub mod recording;
pub mod registry;

pub use config::{dispatch, BuilderConfig, ConfiguredBuilder, FnBuilder, TargetBuilder};
pub use default::{DefaultBuilder, StandardBuilder};
pub use errors::{BuildError, BuilderError, RegistryError};
pub use events::PassEvent;
pub use recording::{RecordedCall, RecordingBuilder};
pub use registry::{BuilderRegistry, Registration};
