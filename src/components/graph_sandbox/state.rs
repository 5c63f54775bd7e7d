use std::f64::consts::PI;

use log::{info, warn};

use super::camera::Viewport;
use super::interaction::{InteractionController, PointerEvent, Stage, StageHandler};
use super::layout::LayoutSupervisor;
use super::settings::SandboxSettings;
use super::store::GraphStore;
use super::types::{GraphData, NodeView};

/// A press and release closer than this (in pixels) is a click, not a pan.
pub const CLICK_TOLERANCE: f64 = 3.0;
pub const SEED_RADIUS: f64 = 100.0;

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

pub struct SandboxState {
	pub graph: GraphStore,
	pub viewport: Viewport,
	pub layout: LayoutSupervisor,
	pub settings: SandboxSettings,
	pub pan: PanState,
	controller: InteractionController,
	nodes: Vec<NodeView>,
}

impl SandboxState {
	pub fn new(data: &GraphData, settings: SandboxSettings, width: f64, height: f64) -> Self {
		let mut graph = GraphStore::new(&settings.layout);
		let n = data.nodes.len().max(1) as f64;
		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y) = node.position.unwrap_or_else(|| {
				let angle = i as f64 * 2.0 * PI / n;
				(SEED_RADIUS * angle.cos(), SEED_RADIUS * angle.sin())
			});
			if let Err(err) = graph.add_node(node.id.clone(), x, y, node.attributes.clone()) {
				warn!("Skipping seed node: {err}");
			}
		}
		for link in &data.links {
			if let Err(err) = graph.add_edge(&link.source, &link.target, link.attributes.clone()) {
				warn!("Skipping seed edge {} -> {}: {err}", link.source, link.target);
			}
		}
		info!(
			"Sandbox seeded with {} nodes and {} edges",
			graph.node_count(),
			graph.edge_count()
		);

		let mut state = Self {
			graph,
			viewport: Viewport::new(width, height),
			layout: LayoutSupervisor::default(),
			controller: InteractionController::new(settings.new_node_size),
			settings,
			pan: PanState::default(),
			nodes: Vec::new(),
		};
		state.refresh();
		state
	}

	/// Node snapshot taken by the last `refresh`, in draw order.
	pub fn frame_nodes(&self) -> &[NodeView] {
		&self.nodes
	}

	pub fn refresh(&mut self) {
		self.nodes = self.graph.nodes();
		self.viewport.refresh(&self.nodes);
	}

	pub fn tick(&mut self, dt: f32) {
		self.layout.tick(&mut self.graph, dt);
		self.refresh();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport.resize(width, height);
	}

	/// Topmost node under the screen point, as drawn in the last frame.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		self.nodes
			.iter()
			.rev()
			.find(|node| {
				let (x, y) = self.viewport.graph_to_viewport(node.x, node.y);
				let r = self.viewport.node_radius(node.attributes.size);
				(x - sx).powi(2) + (y - sy).powi(2) <= r * r
			})
			.map(|node| node.id.clone())
	}

	/// CSS cursor for the pointer at (sx, sy).
	pub fn cursor(&self, sx: f64, sy: f64) -> &'static str {
		if self.is_dragging() {
			"grabbing"
		} else if self.node_at_position(sx, sy).is_some() {
			"pointer"
		} else {
			"default"
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		self.refresh();
		let hit = self.node_at_position(sx, sy);
		let event = PointerEvent::new(sx, sy);
		let (mut stage, controller) = self.stage();
		controller.on_pointer_down(&mut stage, &event);
		if let Some(id) = &hit {
			controller.on_node_down(&mut stage, id);
			return;
		}
		self.pan = PanState {
			active: true,
			moved: false,
			start_x: sx,
			start_y: sy,
			last_x: sx,
			last_y: sy,
		};
	}

	/// Returns true when a handler claimed the event.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
		let mut event = PointerEvent::new(sx, sy);
		let (mut stage, controller) = self.stage();
		controller.on_pointer_move(&mut stage, &mut event);
		if event.is_default_prevented() {
			return true;
		}
		if self.pan.active {
			let pan = &mut self.pan;
			let (dx, dy) = (sx - pan.last_x, sy - pan.last_y);
			(pan.last_x, pan.last_y) = (sx, sy);
			if (sx - pan.start_x).hypot(sy - pan.start_y) > CLICK_TOLERANCE {
				pan.moved = true;
			}
			if pan.moved {
				self.viewport.pan(dx, dy);
			}
		}
		false
	}

	pub fn pointer_up(&mut self, sx: f64, sy: f64) {
		let event = PointerEvent::new(sx, sy);
		let click = self.pan.active && !self.pan.moved;
		self.pan = PanState::default();
		let (mut stage, controller) = self.stage();
		controller.on_pointer_up(&mut stage, &event);
		if click {
			controller.on_stage_click(&mut stage, &event);
		}
	}

	/// The window lost the pointer (focus loss): end any drag or pan
	/// without clicking.
	pub fn pointer_leave(&mut self) {
		self.pan = PanState::default();
		let event = PointerEvent::default();
		let (mut stage, controller) = self.stage();
		controller.on_pointer_up(&mut stage, &event);
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.0 / 1.1 } else { 1.1 };
		self.viewport.zoom_at(sx, sy, factor);
	}

	pub fn is_dragging(&self) -> bool {
		self.controller.drag().is_dragging
	}

	fn stage(&mut self) -> (Stage<'_>, &mut InteractionController) {
		(
			Stage {
				graph: &mut self.graph,
				viewport: &mut self.viewport,
			},
			&mut self.controller,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_sandbox::types::{GraphLink, GraphNode, NodeAttributes};

	fn state() -> SandboxState {
		let node = |id: &str, x: f64, y: f64| GraphNode {
			id: id.into(),
			position: Some((x, y)),
			attributes: NodeAttributes {
				size: 15.0,
				..NodeAttributes::default()
			},
		};
		let data = GraphData {
			nodes: vec![node("a", -100.0, 0.0), node("b", 100.0, 0.0), node("c", 0.0, 100.0)],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
				attributes: Default::default(),
			}],
		};
		let mut state = SandboxState::new(&data, SandboxSettings::default(), 800.0, 600.0);
		state.layout.stop();
		state
	}

	#[test]
	fn seed_without_positions_is_laid_on_a_circle() {
		let data = GraphData {
			nodes: (0..4)
				.map(|i| GraphNode {
					id: i.to_string(),
					position: None,
					attributes: NodeAttributes::default(),
				})
				.collect(),
			links: Vec::new(),
		};
		let state = SandboxState::new(&data, SandboxSettings::default(), 800.0, 600.0);
		for node in state.frame_nodes() {
			assert!((node.x.hypot(node.y) - SEED_RADIUS).abs() < 1e-3);
		}
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = state();
		let (sx, sy) = state.viewport.graph_to_viewport(100.0, 0.0);
		assert_eq!(state.node_at_position(sx + 5.0, sy), Some("b".into()));
		assert_eq!(state.node_at_position(sx + 40.0, sy), None);
	}

	#[test]
	fn hit_test_matches_last_drawn_frame() {
		let mut state = state();
		let (sx, sy) = state.viewport.graph_to_viewport(100.0, 0.0);
		state.graph.set_position("b", 100.0, 300.0).unwrap();
		assert_eq!(state.node_at_position(sx, sy), Some("b".into()));

		state.refresh();
		let (sx, sy) = state.viewport.graph_to_viewport(100.0, 0.0);
		assert_eq!(state.node_at_position(sx, sy), None);
	}

	#[test]
	fn cursor_follows_hover_and_drag() {
		let mut state = state();
		let (sx, sy) = state.viewport.graph_to_viewport(-100.0, 0.0);
		assert_eq!(state.cursor(sx, sy), "pointer");
		assert_eq!(state.cursor(sx + 200.0, sy + 200.0), "default");

		state.pointer_down(sx, sy);
		state.pointer_move(sx + 200.0, sy + 200.0);
		assert_eq!(state.cursor(sx + 200.0, sy + 200.0), "grabbing");
		state.pointer_up(sx + 200.0, sy + 200.0);
		assert_ne!(state.cursor(sx, sy), "grabbing");
	}

	#[test]
	fn drag_continues_outside_the_canvas() {
		let mut state = state();
		let (sx, sy) = state.viewport.graph_to_viewport(-100.0, 0.0);
		state.pointer_down(sx, sy);
		assert!(state.pointer_move(-40.0, -25.0));
		assert!(state.is_dragging());
		let a = state.graph.node("a").unwrap();
		let expected = state.viewport.viewport_to_graph(-40.0, -25.0);
		assert!((a.x - expected.0).abs() < 1e-3 && (a.y - expected.1).abs() < 1e-3);

		state.pointer_up(-40.0, -25.0);
		assert!(!state.is_dragging());
		assert_eq!(state.graph.node_count(), 3);
	}

	#[test]
	fn press_and_release_on_stage_creates_node() {
		let mut state = state();
		state.pointer_down(400.0, 500.0);
		state.pointer_up(401.0, 500.0);
		assert_eq!(state.graph.node_count(), 4);
		assert_eq!(state.graph.edge_count(), 3);
	}

	#[test]
	fn dragging_the_stage_pans_without_creating_nodes() {
		let mut state = state();
		let camera = state.viewport.camera.clone();
		state.pointer_down(400.0, 500.0);
		assert!(!state.pointer_move(450.0, 520.0));
		state.pointer_up(450.0, 520.0);
		assert_eq!(state.graph.node_count(), 3);
		assert_ne!(state.viewport.camera, camera);
	}

	#[test]
	fn dragging_a_node_does_not_pan() {
		let mut state = state();
		let camera = state.viewport.camera.clone();
		let (sx, sy) = state.viewport.graph_to_viewport(-100.0, 0.0);
		state.pointer_down(sx, sy);
		assert!(state.is_dragging());
		assert!(state.pointer_move(sx + 60.0, sy + 30.0));
		state.pointer_up(sx + 60.0, sy + 30.0);

		assert_eq!(state.viewport.camera, camera);
		assert_eq!(state.graph.node_count(), 3);
		let a = state.graph.node("a").unwrap();
		let expected = state.viewport.viewport_to_graph(sx + 60.0, sy + 30.0);
		assert!((a.x - expected.0).abs() < 1e-3 && (a.y - expected.1).abs() < 1e-3);
		assert!(!a.attributes.highlighted);
	}

	#[test]
	fn first_press_fixes_view_bounds() {
		let mut state = state();
		state.pointer_down(10.0, 10.0);
		state.pointer_leave();
		let fixed = state.viewport.custom_bbox().unwrap();

		state.graph.set_position("a", -5000.0, 0.0).unwrap();
		state.refresh();
		state.pointer_down(10.0, 10.0);
		assert_eq!(state.viewport.custom_bbox(), Some(fixed));
	}
}
