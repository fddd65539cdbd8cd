//! The navigable graph core: data model, navigation, and layout.
//!
//! Everything here is pure Rust with no browser dependency, so the whole
//! module tree is testable on the host. The component layer owns the WASM
//! glue and drives [`layout::LayoutEngine`] from the animation loop.

pub mod layout;
pub mod navigator;
pub mod quadtree;
pub mod types;

pub use layout::{LayoutEngine, Phase, PositionedNode, NODE_RADIUS};
pub use navigator::{ancestor_chain, GraphError, NodeView, PageEdge, VisibleNode};
pub use types::{GraphData, GraphLink, GraphNode};
