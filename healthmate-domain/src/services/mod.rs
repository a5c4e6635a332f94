pub mod analysis;
pub mod chat;
pub mod metrics;
pub mod profile;
pub mod report;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use chat::{create_default_chat_service, ChatServiceError, ChatServiceTrait};
pub use profile::{create_default_profile_service, ProfileServiceError, ProfileServiceTrait};
pub use report::{create_default_report_service, ReportServiceError, ReportServiceTrait};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use chat::create_mock_chat_service;
#[cfg(feature = "mock")]
pub use profile::create_mock_profile_service;
#[cfg(feature = "mock")]
pub use report::create_mock_report_service;
