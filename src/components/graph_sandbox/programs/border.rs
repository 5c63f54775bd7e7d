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
	VertexAttribute {
		name: "a_borderColor",
		size: 4,
	},
];

/// Disc with a solid ring. The fill covers the inner 70% of the radius, the
/// ring takes the node's border color.
#[derive(Clone, Copy, Debug, Default)]
pub struct BorderProgram;

impl NodeProgram for BorderProgram {
	fn name(&self) -> &'static str {
		"border"
	}

	fn vertex_shader(&self) -> &'static str {
		include_str!("shaders/border.vert")
	}

	fn fragment_shader(&self) -> &'static str {
		include_str!("shaders/border.frag")
	}

	fn attributes(&self) -> &'static [VertexAttribute] {
		ATTRIBUTES
	}

	fn process(&self, node: &NodeDisplay, out: &mut Vec<f32>) {
		out.extend_from_slice(&[node.x, node.y, node.radius]);
		out.extend_from_slice(&node.color.to_array());
		out.extend_from_slice(&node.border_color.to_array());
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_sandbox::color::Rgba;

	#[test]
	fn vertex_layout_matches_attributes() {
		let node = NodeDisplay {
			x: 3.0,
			y: -4.0,
			radius: 15.0,
			color: Rgba::from_hex("#ff0000").unwrap(),
			border_color: Rgba::WHITE,
		};
		let mut out = Vec::new();
		BorderProgram.process(&node, &mut out);
		BorderProgram.process(&node, &mut out);

		assert_eq!(BorderProgram.stride(), 11);
		assert_eq!(out.len(), 2 * BorderProgram.stride());
		assert_eq!(
			&out[..11],
			&[3.0, -4.0, 15.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
		);
	}

	#[test]
	fn shaders_declare_every_attribute() {
		let vert = BorderProgram.vertex_shader();
		for attribute in BorderProgram.attributes() {
			let declaration = match attribute.size {
				1 => format!("in float {};", attribute.name),
				n => format!("in vec{n} {};", attribute.name),
			};
			assert!(vert.contains(&declaration), "missing {declaration}");
		}
		assert!(BorderProgram.fragment_shader().contains("v_borderColor"));
	}
}
