//! Stevedore - builder registry and pre-build hooks for native extensions
//!
//! This crate lets each subsystem of a large project declare, before the
//! build runs, how every one of its compiled targets is produced. Builders
//! are registered per subsystem, resolved by target name, and delegate the
//! actual work to a shared Default Builder.

pub mod builder;
pub mod core;
pub mod hook;
pub mod ops;
pub mod subsystems;
pub mod util;

pub use builder::{BuilderConfig, BuilderRegistry, DefaultBuilder, StandardBuilder, TargetBuilder};
pub use core::{BuildAction, DependencySet, FeatureSet, Manifest, TargetRequest};
pub use hook::{BuildPass, HookContext, HookState, PreBuildHook};
pub use util::context::GlobalContext;
