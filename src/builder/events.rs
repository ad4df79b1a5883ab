//! Pass event types for JSON output.
//!
//! This module defines the stable JSON schema for machine-readable pass output.
//! These events are emitted when using `--message-format=json`.
//!
//! # Event Types
//!
//! - `target-registered`: A hook registered a builder for a target
//! - `build-action`: A builder produced its action descriptor
//! - `pass-finished`: The pass completed (success or failure)
//!
//! # Stability
//!
//! New fields may be added, but existing fields should not be removed or renamed.

use serde::Serialize;

use crate::core::action::BuildAction;
use crate::core::target::ArtifactKind;
use crate::hook::TargetSummary;

/// An event emitted during a pass.
///
/// Each event is serialized as a single JSON object per line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason")]
pub enum PassEvent {
    /// A target builder was registered.
    #[serde(rename = "target-registered")]
    TargetRegistered {
        /// Owning subsystem
        subsystem: String,
        /// Target name
        target: String,
        /// Registered artifact kind
        kind: ArtifactKind,
    },

    /// A builder produced an action descriptor.
    #[serde(rename = "build-action")]
    BuildAction(BuildAction),

    /// Pass completed (success or failure).
    #[serde(rename = "pass-finished")]
    PassFinished {
        /// Whether every requested target built
        success: bool,
        /// Number of targets built
        targets_built: u64,
        /// Total pass duration in milliseconds
        duration_ms: u64,
        /// Error message when the pass failed
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl PassEvent {
    /// Create a target registered event.
    pub fn registered(summary: &TargetSummary) -> Self {
        PassEvent::TargetRegistered {
            subsystem: summary.subsystem.clone(),
            target: summary.name.clone(),
            kind: summary.kind,
        }
    }

    /// Create a build action event.
    pub fn action(action: &BuildAction) -> Self {
        PassEvent::BuildAction(action.clone())
    }

    /// Create a successful pass finished event.
    pub fn finished(targets_built: u64, duration_ms: u64) -> Self {
        PassEvent::PassFinished {
            success: true,
            targets_built,
            duration_ms,
            error: None,
        }
    }

    /// Create a failed pass finished event.
    pub fn failed(error: impl Into<String>, duration_ms: u64) -> Self {
        PassEvent::PassFinished {
            success: false,
            targets_built: 0,
            duration_ms,
            error: Some(error.into()),
        }
    }

    /// Serialize this event to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
