// Handler-level tests over mock-backed services
mod chat_test;
mod profile_test;
mod reports_test;
