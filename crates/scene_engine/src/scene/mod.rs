//! Scene management
//!
//! A tree of groups and renderable components plus the waypoints that watch
//! them.
//!
//! ## Architecture
//!
//! ```text
//! Scene (slot map of Nodes)
//!   ├─ Group ── children ──> Group | Component
//!   └─ Component (buffers, texture, model matrices)
//!
//! WaypointSet ── actions ──> Component (by NodeId)
//! ```
//!
//! Shader and lighting are stored per node. Setting them on a group, or
//! attaching a subtree under a group, pushes the group's values down.

mod component;
mod graph;
mod waypoint;

pub use component::Component;
pub use graph::{Node, NodeId, NodeKind, Scene, SceneError, SceneResult};
pub use waypoint::{Trigger, Waypoint, WaypointAction, WaypointId, WaypointSet};
