use log::{debug, warn};
use uuid::Uuid;

use super::camera::Viewport;
use super::color::random_hex_color;
use super::store::{GraphStore, Result};
use super::types::{EdgeAttributes, NodeAttributes, NodeView};

/// How many existing nodes a freshly created node links to.
pub const NEIGHBOR_COUNT: usize = 2;

/// Pointer event in viewport (canvas pixel) coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerEvent {
	pub x: f64,
	pub y: f64,
	default_prevented: bool,
}

impl PointerEvent {
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			default_prevented: false,
		}
	}

	/// Skip the renderer's default handling (camera panning) and stop the
	/// underlying DOM event.
	pub fn prevent_default(&mut self) {
		self.default_prevented = true;
	}

	pub fn is_default_prevented(&self) -> bool {
		self.default_prevented
	}
}

/// What an event handler may touch: the graph and the view transform.
pub struct Stage<'a> {
	pub graph: &'a mut GraphStore,
	pub viewport: &'a mut Viewport,
}

pub trait StageHandler {
	fn on_node_down(&mut self, stage: &mut Stage<'_>, node: &str);
	fn on_stage_click(&mut self, stage: &mut Stage<'_>, event: &PointerEvent);
	fn on_pointer_down(&mut self, stage: &mut Stage<'_>, event: &PointerEvent);
	fn on_pointer_move(&mut self, stage: &mut Stage<'_>, event: &mut PointerEvent);
	fn on_pointer_up(&mut self, stage: &mut Stage<'_>, event: &PointerEvent);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragSession {
	pub dragged_node: Option<String>,
	pub is_dragging: bool,
}

/// Drag nodes around, click the stage to grow the graph.
#[derive(Clone, Debug)]
pub struct InteractionController {
	drag: DragSession,
	new_node_size: f64,
}

impl InteractionController {
	pub fn new(new_node_size: f64) -> Self {
		Self {
			drag: DragSession::default(),
			new_node_size,
		}
	}

	pub fn drag(&self) -> &DragSession {
		&self.drag
	}

	/// Adds a node at graph position (x, y) linked to its nearest neighbours.
	/// Returns the new node's id.
	pub fn create_node_at(&mut self, graph: &mut GraphStore, x: f64, y: f64) -> Result<String> {
		let attributes = NodeAttributes {
			size: self.new_node_size,
			color: random_hex_color(),
			..NodeAttributes::default()
		};
		let existing = graph.nodes();
		let neighbors: Vec<String> = nearest_nodes(&existing, x, y, NEIGHBOR_COUNT)
			.into_iter()
			.map(|n| n.id.clone())
			.collect();

		let id = Uuid::new_v4().to_string();
		graph.add_node(id.clone(), x, y, attributes)?;
		for neighbor in &neighbors {
			graph.add_edge(&id, neighbor, EdgeAttributes::default())?;
		}
		debug!("Created node {id} at ({x:.1}, {y:.1}) linked to {neighbors:?}");
		Ok(id)
	}

	fn end_drag(&mut self, graph: &mut GraphStore) {
		if let Some(id) = self.drag.dragged_node.take() {
			let released = graph
				.update_node(&id, |a| a.highlighted = false)
				.and_then(|_| graph.set_anchor(&id, false));
			if let Err(err) = released {
				warn!("Failed to release dragged node: {err}");
			}
			debug!("Drag ended on {id}");
		}
		self.drag.is_dragging = false;
	}
}

impl StageHandler for InteractionController {
	fn on_node_down(&mut self, stage: &mut Stage<'_>, node: &str) {
		// a stale drag would leave a second node highlighted
		self.end_drag(stage.graph);

		let grabbed = stage
			.graph
			.update_node(node, |a| a.highlighted = true)
			.and_then(|_| stage.graph.set_anchor(node, true));
		if let Err(err) = grabbed {
			warn!("Cannot drag node: {err}");
			return;
		}
		debug!("Drag started on {node}");
		self.drag = DragSession {
			dragged_node: Some(node.to_string()),
			is_dragging: true,
		};
	}

	fn on_stage_click(&mut self, stage: &mut Stage<'_>, event: &PointerEvent) {
		let (x, y) = stage.viewport.viewport_to_graph(event.x, event.y);
		if let Err(err) = self.create_node_at(stage.graph, x, y) {
			warn!("Failed to create node: {err}");
		}
	}

	fn on_pointer_down(&mut self, stage: &mut Stage<'_>, _event: &PointerEvent) {
		if stage.viewport.custom_bbox().is_none() {
			let bbox = stage.viewport.bbox();
			debug!("Fixing view bounds to {bbox:?}");
			stage.viewport.set_custom_bbox(Some(bbox));
		}
	}

	fn on_pointer_move(&mut self, stage: &mut Stage<'_>, event: &mut PointerEvent) {
		if !self.drag.is_dragging {
			return;
		}
		let Some(id) = self.drag.dragged_node.as_deref() else {
			return;
		};
		let (x, y) = stage.viewport.viewport_to_graph(event.x, event.y);
		if let Err(err) = stage.graph.set_position(id, x, y) {
			warn!("Failed to move dragged node: {err}");
			return;
		}
		event.prevent_default();
	}

	fn on_pointer_up(&mut self, stage: &mut Stage<'_>, _event: &PointerEvent) {
		self.end_drag(stage.graph);
	}
}

/// The `count` nodes closest to (x, y) by squared distance. The order among
/// equally distant nodes is unspecified.
pub fn nearest_nodes(nodes: &[NodeView], x: f64, y: f64, count: usize) -> Vec<&NodeView> {
	let mut by_distance: Vec<(f64, &NodeView)> = nodes
		.iter()
		.map(|n| ((n.x - x).powi(2) + (n.y - y).powi(2), n))
		.collect();
	by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
	by_distance
		.into_iter()
		.take(count)
		.map(|(_, n)| n)
		.collect()
}
