// Application layer - the refresh pipeline use cases
pub mod backend;
pub mod charts;
pub mod refresh_service;
pub mod renderer;
