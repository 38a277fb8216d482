// Presentation layer - terminal rendering and input
pub mod tui;
