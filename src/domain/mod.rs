// Domain layer - value objects shared across the pipeline
pub mod snapshot;
pub mod view;
