use std::collections::HashMap;
use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::SandboxState;
use super::types::{EdgeType, NodeType, NodeView};

const LABEL_SIZE: f64 = 14.0;
const EDGE_LABEL_SIZE: f64 = 11.0;
/// Inner disc of a bordered node, as a fraction of its radius.
const BORDER_INNER: f64 = 0.7;
const IMAGE_PADDING: f64 = 0.2;

/// Lazily loaded node pictures, keyed by URL.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	/// The image once it finished loading. The first call starts the load.
	pub fn get(&mut self, url: &str) -> Option<&HtmlImageElement> {
		if !self.images.contains_key(url) {
			let img = HtmlImageElement::new().ok()?;
			img.set_src(url);
			self.images.insert(url.to_string(), img);
		}
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

fn positions(state: &SandboxState) -> HashMap<&str, (&NodeView, f64, f64)> {
	state
		.frame_nodes()
		.iter()
		.map(|n| {
			let (x, y) = state.viewport.graph_to_viewport(n.x, n.y);
			(n.id.as_str(), (n, x, y))
		})
		.collect()
}

/// Background, edges and edge labels.
pub fn render_edges(state: &SandboxState, ctx: &CanvasRenderingContext2d) {
	let vp = &state.viewport;
	ctx.set_fill_style_str(&state.settings.background);
	ctx.fill_rect(0.0, 0.0, vp.width, vp.height);

	let nodes = positions(state);
	for edge in state.graph.edges() {
		let (Some(&(_, x1, y1)), Some(&(target, x2, y2))) = (
			nodes.get(edge.source.as_str()),
			nodes.get(edge.target.as_str()),
		) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let width = vp.node_radius(edge.attributes.size).max(0.5);
		ctx.set_line_width(width);
		ctx.set_stroke_style_str(&state.settings.edge_color);
		ctx.set_fill_style_str(&state.settings.edge_color);

		match edge.attributes.edge_type {
			EdgeType::Line => {
				ctx.begin_path();
				ctx.move_to(x1, y1);
				ctx.line_to(x2, y2);
				ctx.stroke();
			}
			EdgeType::Arrow => {
				let head = (width * 2.5).max(6.0);
				let (tip_x, tip_y) = (
					x2 - ux * vp.node_radius(target.attributes.size),
					y2 - uy * vp.node_radius(target.attributes.size),
				);
				let (back_x, back_y) = (tip_x - ux * head, tip_y - uy * head);
				ctx.begin_path();
				ctx.move_to(x1, y1);
				ctx.line_to(back_x, back_y);
				ctx.stroke();

				let (px, py) = (-uy * head * 0.6, ux * head * 0.6);
				ctx.begin_path();
				ctx.move_to(tip_x, tip_y);
				ctx.line_to(back_x + px, back_y + py);
				ctx.line_to(back_x - px, back_y - py);
				ctx.close_path();
				ctx.fill();
			}
		}

		if state.settings.render_edge_labels {
			if let Some(label) = &edge.attributes.label {
				draw_edge_label(state, ctx, label, (x1 + x2) / 2.0, (y1 + y2) / 2.0, dy.atan2(dx), width);
			}
		}
	}
}

fn draw_edge_label(
	state: &SandboxState,
	ctx: &CanvasRenderingContext2d,
	label: &str,
	x: f64,
	y: f64,
	angle: f64,
	width: f64,
) {
	// keep text upright
	let angle = if angle.abs() > PI / 2.0 {
		angle - PI.copysign(angle)
	} else {
		angle
	};
	ctx.save();
	let _ = ctx.translate(x, y);
	let _ = ctx.rotate(angle);
	ctx.set_font(&format!("{EDGE_LABEL_SIZE}px {}", state.settings.label_font));
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&state.settings.label_color);
	let _ = ctx.fill_text(label, 0.0, -width / 2.0 - 3.0);
	ctx.restore();
}

/// Canvas 2D stand-in for the WebGL node layer.
pub fn render_nodes_fallback(state: &SandboxState, ctx: &CanvasRenderingContext2d) {
	let vp = &state.viewport;
	ctx.clear_rect(0.0, 0.0, vp.width, vp.height);
	let (plain, highlighted): (Vec<_>, Vec<_>) = state
		.frame_nodes()
		.iter()
		.partition(|n| !n.attributes.highlighted);

	for node in plain.into_iter().chain(highlighted) {
		let (x, y) = vp.graph_to_viewport(node.x, node.y);
		paint_node(state, ctx, node, x, y, vp.node_radius(node.attributes.size));
	}
}

fn paint_node(
	state: &SandboxState,
	ctx: &CanvasRenderingContext2d,
	node: &NodeView,
	x: f64,
	y: f64,
	r: f64,
) {
	if node.attributes.node_type == NodeType::Border {
		disc(ctx, x, y, r, &state.settings.border_color);
		disc(ctx, x, y, r * BORDER_INNER, &node.attributes.color);
	} else {
		disc(ctx, x, y, r, &node.attributes.color);
	}
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: &str) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
}

/// Highlight decoration, pictures of image nodes and node labels.
pub fn render_labels(state: &SandboxState, ctx: &CanvasRenderingContext2d, images: &mut ImageCache) {
	let vp = &state.viewport;
	ctx.clear_rect(0.0, 0.0, vp.width, vp.height);
	ctx.set_font(&format!("{LABEL_SIZE}px {}", state.settings.label_font));
	ctx.set_text_align("left");

	for node in state.frame_nodes() {
		let (x, y) = vp.graph_to_viewport(node.x, node.y);
		let r = vp.node_radius(node.attributes.size);

		if node.attributes.highlighted {
			draw_halo(ctx, node, x, y, r);
			// the halo covers the node drawn underneath
			paint_node(state, ctx, node, x, y, r);
		}

		if node.attributes.node_type == NodeType::Image {
			if let Some(img) = node.attributes.image.as_deref().and_then(|url| images.get(url)) {
				let inner = r * (1.0 - IMAGE_PADDING);
				ctx.save();
				ctx.begin_path();
				let _ = ctx.arc(x, y, inner, 0.0, 2.0 * PI);
				ctx.clip();
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					img,
					x - inner,
					y - inner,
					2.0 * inner,
					2.0 * inner,
				);
				ctx.restore();
			}
		}

		if let Some(label) = &node.attributes.label {
			ctx.set_fill_style_str(&state.settings.label_color);
			let _ = ctx.fill_text(label, x + r + 3.0, y + LABEL_SIZE / 3.0);
		}
	}
}

/// White disc plus a box behind the label, with a drop shadow.
fn draw_halo(ctx: &CanvasRenderingContext2d, node: &NodeView, x: f64, y: f64, r: f64) {
	ctx.save();
	ctx.set_shadow_color("rgba(0, 0, 0, 0.4)");
	ctx.set_shadow_blur(8.0);
	ctx.set_fill_style_str("#ffffff");
	ctx.begin_path();
	let _ = ctx.arc(x, y, r + 2.0, 0.0, 2.0 * PI);
	if let Some(label) = &node.attributes.label {
		let text_width = ctx
			.measure_text(label)
			.map(|m| m.width())
			.unwrap_or(LABEL_SIZE * label.len() as f64 * 0.6);
		ctx.rect(x, y - LABEL_SIZE / 2.0 - 4.0, r + text_width + 8.0, LABEL_SIZE + 8.0);
	}
	ctx.fill();
	ctx.restore();
}
