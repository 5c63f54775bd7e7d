use std::sync::Arc;

use super::layout::LayoutSettings;
use super::programs::{BorderProgram, CircleProgram, NodeProgram, ProgramRegistry};
use super::types::NodeType;

/// Renderer and interaction configuration.
#[derive(Clone)]
pub struct SandboxSettings {
	pub node_programs: ProgramRegistry,
	pub render_edge_labels: bool,
	/// Size given to nodes created by clicking the stage.
	pub new_node_size: f64,
	pub layout: LayoutSettings,
	pub background: String,
	pub edge_color: String,
	pub label_color: String,
	pub border_color: String,
	pub label_font: String,
}

impl Default for SandboxSettings {
	fn default() -> Self {
		Self {
			node_programs: ProgramRegistry::new(
				Arc::new(CircleProgram),
				[(NodeType::Border, Arc::new(BorderProgram) as Arc<dyn NodeProgram>)],
			),
			render_edge_labels: true,
			new_node_size: 10.0,
			layout: LayoutSettings::default(),
			background: "#ffffff".into(),
			edge_color: "#cccccc".into(),
			label_color: "#333333".into(),
			border_color: "#ffffff".into(),
			label_font: "sans-serif".into(),
		}
	}
}
