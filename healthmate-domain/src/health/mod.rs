//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;

use healthmate_data::database;

/// System health status
#[derive(Debug, Clone, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentStatus {
    /// Component is functioning normally
    Healthy,
    /// Component is functioning but with reduced capability
    Degraded,
    /// Component is not functioning
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the status of the database
    async fn check_database_status(&self) -> Result<bool, String>;
}

/// Check if the database is available and functioning properly
pub async fn check_database_status() -> Result<bool, String> {
    match database::get_connection_info() {
        Some(_) => Ok(true),
        None => match database::get_db_pool() {
            Ok(_) => Ok(true),
            Err(e) => Err(format!("Database connection error: {}", e)),
        },
    }
}

/// Get overall system health
///
/// The database component degrades to in-memory storage when unavailable,
/// and the model component degrades to the fallback analysis when no API
/// key is configured — neither takes the whole system down.
pub async fn get_system_health() -> SystemHealth {
    let db_component = match check_database_status().await {
        Ok(true) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        },
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some("Database is available but has reduced capability".to_string()),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(format!("{} (using in-memory storage)", e)),
        },
    };

    let model_component = if std::env::var("GEMINI_API_KEY")
        .map(|k| !k.trim().is_empty())
        .unwrap_or(false)
    {
        HealthComponent {
            status: ComponentStatus::Healthy,
            details: None,
        }
    } else {
        HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(
                "Gemini API key not configured; analyses use the fallback".to_string(),
            ),
        }
    };

    let overall_status = if db_component.status == ComponentStatus::Unhealthy {
        SystemStatus::Unhealthy
    } else if db_component.status == ComponentStatus::Degraded
        || model_component.status == ComponentStatus::Degraded
    {
        SystemStatus::Degraded
    } else {
        SystemStatus::Healthy
    };

    SystemHealth {
        status: overall_status,
        components: vec![
            ("database".to_string(), db_component),
            ("model".to_string(), model_component),
        ]
        .into_iter()
        .collect(),
    }
}

/// Default health service implementation
#[derive(Debug, Clone, Default)]
pub struct DefaultHealthService;

impl DefaultHealthService {
    /// Create a new health service
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HealthServiceTrait for DefaultHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        get_system_health().await
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        check_database_status().await
    }
}

/// Create the default health service
pub fn create_default_health_service() -> DefaultHealthService {
    DefaultHealthService::new()
}
