//! Reusable UI components.

pub mod node_stage;
