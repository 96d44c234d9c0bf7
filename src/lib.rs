pub mod binding;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod loader;
pub mod solver;
pub mod types;
// cmd and reports are binary modules (in main.rs).
