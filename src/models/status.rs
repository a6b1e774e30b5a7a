use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::errors::ServiceError;

/// Lifecycle states of a work order.
///
/// The nominal flow is `created -> in_progress -> waiting_approval -> ready
/// -> closed`, with `cancelled` reachable from any non-terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkOrderStatus {
    Created,
    InProgress,
    WaitingApproval,
    Ready,
    Closed,
    Cancelled,
}

impl WorkOrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }

    /// Parses a wire value, rejecting anything outside the recognized set.
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        value.parse().map_err(|_| {
            ServiceError::ValidationError(format!(
                "unrecognized work order status '{}', allowed: {}",
                value,
                Self::allowed_values().join(", ")
            ))
        })
    }

    pub fn allowed_values() -> Vec<String> {
        Self::iter().map(|s| s.to_string()).collect()
    }
}

/// How strictly status transitions are checked.
///
/// `Permissive` accepts any recognized target status, which is what the
/// original data-entry workflow relied on. `Strict` validates the edge
/// against the state diagram and is the recommended default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPolicy {
    Permissive,
    Strict,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::Strict
    }
}

impl TransitionPolicy {
    /// Checks whether `from -> to` is a legal transition under this policy.
    pub fn check(self, from: WorkOrderStatus, to: WorkOrderStatus) -> Result<(), ServiceError> {
        match self {
            Self::Permissive => Ok(()),
            Self::Strict if transition_allowed(from, to) => Ok(()),
            Self::Strict => Err(ServiceError::ValidationError(format!(
                "illegal status transition {} -> {}",
                from, to
            ))),
        }
    }
}

fn transition_allowed(from: WorkOrderStatus, to: WorkOrderStatus) -> bool {
    use WorkOrderStatus::*;
    match (from, to) {
        (Created, InProgress)
        | (InProgress, WaitingApproval)
        | (WaitingApproval, Ready)
        | (Ready, Closed) => true,
        (from, Cancelled) => !from.is_terminal(),
        _ => false,
    }
}

/// Booking lifecycle states, owned by the collaborating booking layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        value.parse().map_err(|_| {
            ServiceError::ValidationError(format!(
                "unrecognized booking status '{}', allowed: {}",
                value,
                Self::iter().map(|s| s.to_string()).collect::<Vec<_>>().join(", ")
            ))
        })
    }
}

/// Accepted payment methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        value.parse().map_err(|_| {
            ServiceError::ValidationError(format!(
                "unrecognized payment method '{}', allowed: {}",
                value,
                Self::iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
            ))
        })
    }
}
