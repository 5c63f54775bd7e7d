use super::{NodeDisplay, NodeProgram, VertexAttribute};

const ATTRIBUTES: &[VertexAttribute] = &[
	VertexAttribute {
		name: "a_position",
		size: 2,
	},
	VertexAttribute {
		name: "a_size",
		size: 1,
	},
	VertexAttribute {
		name: "a_color",
		size: 4,
	},
];

/// Plain antialiased disc.
#[derive(Clone, Copy, Debug, Default)]
pub struct CircleProgram;

impl NodeProgram for CircleProgram {
	fn name(&self) -> &'static str {
		"circle"
	}

	fn vertex_shader(&self) -> &'static str {
		include_str!("shaders/circle.vert")
	}

	fn fragment_shader(&self) -> &'static str {
		include_str!("shaders/circle.frag")
	}

	fn attributes(&self) -> &'static [VertexAttribute] {
		ATTRIBUTES
	}

	fn process(&self, node: &NodeDisplay, out: &mut Vec<f32>) {
		out.extend_from_slice(&[node.x, node.y, node.radius]);
		out.extend_from_slice(&node.color.to_array());
	}
}
