//! Force-laid-out stage for a focused node and its direct children.
//!
//! The stage owns one [`crate::graph::LayoutEngine`] per focus view, ticks it
//! from the host animation loop, and redraws the canvas on each sampled
//! snapshot. Navigation into a child happens by clicking its circle.

mod component;
mod render;

pub use component::NodeStage;
