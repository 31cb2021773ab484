//! Proximity triggers
//!
//! A [`Waypoint`] is a sphere in world space with actions attached to scene
//! components. [`WaypointSet::process`] runs once per frame and fires the
//! action of every component whose location lies strictly inside the sphere.

use super::component::Component;
use super::graph::{NodeId, Scene};
use crate::foundation::math::Vec3;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a waypoint in a [`WaypointSet`]
    pub struct WaypointId;
}

/// When a waypoint fires its actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trigger {
    /// Every frame the component is inside
    #[default]
    WhileInside,
    /// Once per entry; re-arms when the component leaves
    OnEnter,
}

/// Callback run on a component near a waypoint
pub type WaypointAction = Box<dyn FnMut(&mut Component)>;

struct Binding {
    node: NodeId,
    action: WaypointAction,
    inside: bool,
}

/// Spherical trigger volume
pub struct Waypoint {
    location: Vec3,
    radius: f32,
    trigger: Trigger,
    bindings: Vec<Binding>,
}

impl Waypoint {
    /// Waypoint at `location` firing while components are within `radius`
    pub fn new(location: Vec3, radius: f32) -> Self {
        Self {
            location,
            radius,
            trigger: Trigger::default(),
            bindings: Vec::new(),
        }
    }

    /// Change when actions fire
    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Move the waypoint
    pub fn set_location(&mut self, location: Vec3) {
        self.location = location;
    }

    /// Centre of the trigger sphere
    pub fn location(&self) -> Vec3 {
        self.location
    }

    /// Resize the trigger sphere
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Radius of the trigger sphere
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Trigger mode
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Run `action` on the component `node` whenever it is inside
    ///
    /// Several actions may target the same node; they run in the order added.
    pub fn add_action<F>(&mut self, node: NodeId, action: F)
    where
        F: FnMut(&mut Component) + 'static,
    {
        self.bindings.push(Binding {
            node,
            action: Box::new(action),
            inside: false,
        });
    }

    /// Number of registered actions
    pub fn action_count(&self) -> usize {
        self.bindings.len()
    }

    /// Nodes with an action attached, in registration order
    ///
    /// A node bound more than once appears once per action.
    pub fn targets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.bindings.iter().map(|binding| binding.node)
    }

    /// Whether `point` is strictly inside the trigger sphere
    pub fn contains(&self, point: &Vec3) -> bool {
        (point - self.location).norm() < self.radius
    }

    fn process(&mut self, scene: &mut Scene) -> usize {
        let mut fired = 0;
        let location = self.location;
        let radius = self.radius;
        let trigger = self.trigger;

        for binding in &mut self.bindings {
            let Some(component) = scene.component_mut(binding.node) else {
                log::trace!("Waypoint action target {:?} is not a live component", binding.node);
                continue;
            };

            let inside = (component.location() - location).norm() < radius;
            let fire = match trigger {
                Trigger::WhileInside => inside,
                Trigger::OnEnter => inside && !binding.inside,
            };
            binding.inside = inside;

            if fire {
                (binding.action)(component);
                fired += 1;
            }
        }
        fired
    }
}

impl std::fmt::Debug for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Waypoint")
            .field("location", &self.location)
            .field("radius", &self.radius)
            .field("trigger", &self.trigger)
            .field("actions", &self.bindings.len())
            .finish()
    }
}

/// Every waypoint the main loop checks
#[derive(Default)]
pub struct WaypointSet {
    waypoints: SlotMap<WaypointId, Waypoint>,
    order: Vec<WaypointId>,
}

impl WaypointSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waypoint
    pub fn add(&mut self, waypoint: Waypoint) -> WaypointId {
        let id = self.waypoints.insert(waypoint);
        self.order.push(id);
        id
    }

    /// Unregister a waypoint
    pub fn remove(&mut self, id: WaypointId) -> Option<Waypoint> {
        self.order.retain(|&w| w != id);
        self.waypoints.remove(id)
    }

    /// Look up a waypoint
    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.get(id)
    }

    /// Look up a waypoint for editing
    pub fn get_mut(&mut self, id: WaypointId) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(id)
    }

    /// Number of waypoints
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether there are no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check every waypoint in registration order; returns the number of
    /// actions fired
    pub fn process(&mut self, scene: &mut Scene) -> usize {
        let mut fired = 0;
        for id in &self.order {
            if let Some(waypoint) = self.waypoints.get_mut(*id) {
                fired += waypoint.process(scene);
            }
        }
        if fired > 0 {
            log::trace!("Waypoints fired {} action(s)", fired);
        }
        fired
    }
}
