use force_graph::SimulationParameters;
use log::info;

use super::store::GraphStore;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSettings {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub node_mass: f32,
}

impl Default for LayoutSettings {
	fn default() -> Self {
		Self {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			node_mass: 10.0,
		}
	}
}

impl LayoutSettings {
	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}
}

/// Owns the on/off switch of the force simulation. The simulation itself
/// lives inside the store and is stepped once per animation frame.
#[derive(Clone, Debug)]
pub struct LayoutSupervisor {
	running: bool,
}

impl Default for LayoutSupervisor {
	fn default() -> Self {
		Self { running: true }
	}
}

impl LayoutSupervisor {
	pub fn start(&mut self) {
		if !self.running {
			info!("Layout started");
			self.running = true;
		}
	}

	pub fn stop(&mut self) {
		if self.running {
			info!("Layout stopped");
			self.running = false;
		}
	}

	pub fn set_running(&mut self, running: bool) {
		if running {
			self.start();
		} else {
			self.stop();
		}
	}

	pub fn tick(&self, store: &mut GraphStore, dt: f32) {
		if self.running {
			store.step_layout(dt);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_sandbox::types::{EdgeAttributes, NodeAttributes};

	fn pair() -> GraphStore {
		let mut store = GraphStore::new(&LayoutSettings::default());
		store
			.add_node("a", 0.0, 0.0, NodeAttributes::default())
			.unwrap();
		store
			.add_node("b", 1.0, 0.0, NodeAttributes::default())
			.unwrap();
		store.add_edge("a", "b", EdgeAttributes::default()).unwrap();
		store
	}

	#[test]
	fn stopped_layout_leaves_positions_alone() {
		let mut store = pair();
		let mut layout = LayoutSupervisor::default();
		layout.stop();
		layout.tick(&mut store, 0.016);
		let a = store.node("a").unwrap();
		assert_eq!((a.x, a.y), (0.0, 0.0));
	}

	#[test]
	fn running_layout_moves_nodes() {
		let mut store = pair();
		let layout = LayoutSupervisor::default();
		for _ in 0..10 {
			layout.tick(&mut store, 0.016);
		}
		let (a, b) = (store.node("a").unwrap(), store.node("b").unwrap());
		assert!(a.x != 0.0 || b.x != 1.0);
	}

	#[test]
	fn set_running_pauses_and_resumes() {
		let mut store = pair();
		let mut layout = LayoutSupervisor::default();
		layout.set_running(false);
		layout.tick(&mut store, 0.016);
		assert_eq!(store.node("b").map(|b| (b.x, b.y)), Some((1.0, 0.0)));

		layout.set_running(true);
		for _ in 0..10 {
			layout.tick(&mut store, 0.016);
		}
		assert_ne!(store.node("b").map(|b| (b.x, b.y)), Some((1.0, 0.0)));
	}
}
