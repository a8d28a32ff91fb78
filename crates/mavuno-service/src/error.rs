//! Error types for mavuno-service.

use crate::inventory::InventoryError;
use mavuno_core::{Quantity, ValidationError};
use mavuno_lifecycle::LifecycleError;
use thiserror::Error;

/// Service-level error types for the external interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The farmer tried to auction more than the catalog has on hand.
    #[error("Insufficient inventory for auction quantity: requested {requested}, available {available}")]
    InsufficientInventory {
        requested: Quantity,
        available: Quantity,
    },

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Result type alias for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Application (binary) error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Telemetry(#[from] mavuno_telemetry::TelemetryError),
}

/// Result type alias for application startup and the run loop.
pub type AppResult<T> = std::result::Result<T, AppError>;
