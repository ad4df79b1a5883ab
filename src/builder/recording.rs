//! A Default Builder that records what it was asked to build.
//!
//! Useful to check exactly which sets a registered builder forwards, and to
//! dry-run a pass without committing to a particular host vocabulary.

use std::sync::{Arc, Mutex};

use crate::builder::default::DefaultBuilder;
use crate::builder::errors::BuilderError;
use crate::core::action::BuildAction;
use crate::core::dependency::DependencySet;
use crate::core::feature::FeatureSet;
use crate::core::target::TargetRequest;

/// One call made to a [`RecordingBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Target name
    pub target: String,
    /// Owning subsystem
    pub subsystem: String,
    /// Dependency set as received
    pub dependencies: DependencySet,
    /// Feature set as received
    pub features: FeatureSet,
}

/// Recording stand-in for the host's Default Builder.
///
/// Without an inner builder it accepts everything and describes the action
/// using the artifact kind's default shape.
#[derive(Debug, Default)]
pub struct RecordingBuilder {
    calls: Mutex<Vec<RecordedCall>>,
    inner: Option<Arc<dyn DefaultBuilder>>,
}

impl RecordingBuilder {
    /// Create a recorder that accepts every request.
    pub fn new() -> Self {
        RecordingBuilder::default()
    }

    /// Create a recorder that delegates to `inner` after recording.
    pub fn wrapping(inner: Arc<dyn DefaultBuilder>) -> Self {
        RecordingBuilder {
            calls: Mutex::new(Vec::new()),
            inner: Some(inner),
        }
    }

    /// Snapshot of every call so far, in call order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Calls made for one target.
    pub fn calls_for(&self, target: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.target == target)
            .collect()
    }

    /// Total number of calls.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

impl DefaultBuilder for RecordingBuilder {
    fn build(
        &self,
        target: &TargetRequest,
        dependencies: &DependencySet,
        features: &FeatureSet,
    ) -> Result<BuildAction, BuilderError> {
        let call = RecordedCall {
            target: target.name.clone(),
            subsystem: target.subsystem.clone(),
            dependencies: dependencies.clone(),
            features: features.clone(),
        };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }

        match &self.inner {
            Some(inner) => inner.build(target, dependencies, features),
            None => Ok(BuildAction::describe(
                target,
                target.kind.default_shape(),
                std::env::consts::OS,
                dependencies,
                features,
            )),
        }
    }
}
