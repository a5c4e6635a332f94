// Storage-shaped models for the data layer
pub mod chat;
pub mod profile;
pub mod report;
