//! Node paint programs: a vertex/fragment GLSL pair plus the per-vertex data
//! each node contributes. Nodes are drawn as point sprites, one vertex each.

mod border;
mod circle;

use std::collections::HashMap;
use std::sync::Arc;

pub use border::BorderProgram;
pub use circle::CircleProgram;

use super::color::Rgba;
use super::types::NodeType;

/// A float vertex attribute, `size` components wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
	pub name: &'static str,
	pub size: i32,
}

/// What a program needs to know about one node, already resolved for the
/// current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeDisplay {
	pub x: f32,
	pub y: f32,
	pub radius: f32,
	pub color: Rgba,
	pub border_color: Rgba,
}

pub trait NodeProgram: Send + Sync {
	/// Unique name, used to share one compiled program between node types.
	fn name(&self) -> &'static str;
	fn vertex_shader(&self) -> &'static str;
	fn fragment_shader(&self) -> &'static str;
	fn attributes(&self) -> &'static [VertexAttribute];
	/// Appends exactly `stride()` floats for `node`.
	fn process(&self, node: &NodeDisplay, out: &mut Vec<f32>);

	fn stride(&self) -> usize {
		self.attributes().iter().map(|a| a.size as usize).sum()
	}
}

/// Render-type to paint program mapping. Types without an entry use the
/// default program.
#[derive(Clone)]
pub struct ProgramRegistry {
	default: Arc<dyn NodeProgram>,
	programs: HashMap<NodeType, Arc<dyn NodeProgram>>,
}

impl ProgramRegistry {
	pub fn new(
		default: Arc<dyn NodeProgram>,
		programs: impl IntoIterator<Item = (NodeType, Arc<dyn NodeProgram>)>,
	) -> Self {
		Self {
			default,
			programs: programs.into_iter().collect(),
		}
	}

	pub fn program_for(&self, node_type: NodeType) -> &Arc<dyn NodeProgram> {
		self.programs.get(&node_type).unwrap_or(&self.default)
	}

	/// Every distinct program, default first.
	pub fn distinct(&self) -> Vec<Arc<dyn NodeProgram>> {
		let mut out: Vec<Arc<dyn NodeProgram>> = vec![self.default.clone()];
		for program in self.programs.values() {
			if out.iter().all(|p| p.name() != program.name()) {
				out.push(program.clone());
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unregistered_types_use_default() {
		let registry = ProgramRegistry::new(
			Arc::new(CircleProgram),
			[(NodeType::Border, Arc::new(BorderProgram) as Arc<dyn NodeProgram>)],
		);
		assert_eq!(registry.program_for(NodeType::Border).name(), "border");
		assert_eq!(registry.program_for(NodeType::Image).name(), "circle");
		assert_eq!(registry.program_for(NodeType::Circle).name(), "circle");
	}

	#[test]
	fn distinct_programs_are_deduplicated() {
		let registry = ProgramRegistry::new(
			Arc::new(CircleProgram),
			[
				(NodeType::Border, Arc::new(BorderProgram) as Arc<dyn NodeProgram>),
				(NodeType::Circle, Arc::new(CircleProgram) as Arc<dyn NodeProgram>),
			],
		);
		let names: Vec<_> = registry.distinct().iter().map(|p| p.name()).collect();
		assert_eq!(names, ["circle", "border"]);
	}
}
