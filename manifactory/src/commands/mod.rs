/// Manifest command handler
pub mod manifest;

/// Repository catalog command handler
pub mod repos;

/// Tag listing command handler and logic
pub mod tags;
