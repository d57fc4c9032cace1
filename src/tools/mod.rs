// Modular tools
pub mod batch;
pub mod fetch;
