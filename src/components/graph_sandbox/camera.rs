use super::types::NodeView;

/// Fraction of the viewport kept free on each side of the framed graph.
pub const PADDING: f64 = 0.1;
pub const MIN_RATIO: f64 = 0.05;
pub const MAX_RATIO: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
	pub x: (f64, f64),
	pub y: (f64, f64),
}

impl Default for BBox {
	fn default() -> Self {
		Self {
			x: (-1.0, 1.0),
			y: (-1.0, 1.0),
		}
	}
}

impl BBox {
	pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
		let mut bbox: Option<Self> = None;
		for (x, y) in points {
			bbox = Some(match bbox {
				None => Self {
					x: (x, x),
					y: (y, y),
				},
				Some(b) => Self {
					x: (b.x.0.min(x), b.x.1.max(x)),
					y: (b.y.0.min(y), b.y.1.max(y)),
				},
			});
		}
		bbox.unwrap_or_default()
	}

	pub fn center(&self) -> (f64, f64) {
		((self.x.0 + self.x.1) / 2.0, (self.y.0 + self.y.1) / 2.0)
	}

	/// Largest side, never zero so a single node still frames.
	pub fn extent(&self) -> f64 {
		let d = (self.x.1 - self.x.0).max(self.y.1 - self.y.0);
		if d > f64::EPSILON { d } else { 1.0 }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	pub ratio: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			ratio: 1.0,
		}
	}
}

/// Screen <-> graph transform. The graph is normalized by the bounding box
/// (auto-computed every frame unless a custom one is fixed), then offset and
/// scaled by the camera.
#[derive(Clone, Debug)]
pub struct Viewport {
	pub camera: Camera,
	pub width: f64,
	pub height: f64,
	auto_bbox: BBox,
	custom_bbox: Option<BBox>,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			camera: Camera::default(),
			width,
			height,
			auto_bbox: BBox::default(),
			custom_bbox: None,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn refresh(&mut self, nodes: &[NodeView]) {
		self.auto_bbox = BBox::from_points(nodes.iter().map(|n| (n.x, n.y)));
	}

	pub fn bbox(&self) -> BBox {
		self.auto_bbox
	}

	pub fn custom_bbox(&self) -> Option<BBox> {
		self.custom_bbox
	}

	pub fn set_custom_bbox(&mut self, bbox: Option<BBox>) {
		self.custom_bbox = bbox;
	}

	fn effective_bbox(&self) -> BBox {
		self.custom_bbox.unwrap_or(self.auto_bbox)
	}

	fn scale(&self) -> f64 {
		(self.width.min(self.height) * (1.0 - 2.0 * PADDING)).max(1.0)
	}

	pub fn graph_to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
		let bbox = self.effective_bbox();
		let ((cx, cy), d) = (bbox.center(), bbox.extent());
		let (scale, cam) = (self.scale(), &self.camera);
		(
			self.width / 2.0 + ((x - cx) / d - cam.x) / cam.ratio * scale,
			self.height / 2.0 + ((y - cy) / d - cam.y) / cam.ratio * scale,
		)
	}

	pub fn viewport_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		let bbox = self.effective_bbox();
		let ((cx, cy), d) = (bbox.center(), bbox.extent());
		let (scale, cam) = (self.scale(), &self.camera);
		(
			((sx - self.width / 2.0) / scale * cam.ratio + cam.x) * d + cx,
			((sy - self.height / 2.0) / scale * cam.ratio + cam.y) * d + cy,
		)
	}

	/// Graph space to WebGL clip space, column-major.
	pub fn clip_matrix(&self) -> [f32; 9] {
		let bbox = self.effective_bbox();
		let ((cx, cy), d) = (bbox.center(), bbox.extent());
		let (scale, cam) = (self.scale(), &self.camera);
		let k = scale / (d * cam.ratio);
		let tx = self.width / 2.0 + (-cx / d - cam.x) / cam.ratio * scale;
		let ty = self.height / 2.0 + (-cy / d - cam.y) / cam.ratio * scale;
		let (w, h) = (self.width.max(1.0), self.height.max(1.0));
		[
			(2.0 * k / w) as f32,
			0.0,
			0.0,
			0.0,
			(-2.0 * k / h) as f32,
			0.0,
			(2.0 * tx / w - 1.0) as f32,
			(1.0 - 2.0 * ty / h) as f32,
			1.0,
		]
	}

	pub fn node_radius(&self, size: f64) -> f64 {
		size / self.camera.ratio.sqrt()
	}

	pub fn pan(&mut self, dx: f64, dy: f64) {
		let step = self.camera.ratio / self.scale();
		self.camera.x -= dx * step;
		self.camera.y -= dy * step;
	}

	/// Zoom keeping the graph point under (sx, sy) fixed. `factor > 1` zooms in.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let scale = self.scale();
		let (vx, vy) = (
			(sx - self.width / 2.0) / scale,
			(sy - self.height / 2.0) / scale,
		);
		let cam = &mut self.camera;
		let (nx, ny) = (vx * cam.ratio + cam.x, vy * cam.ratio + cam.y);
		cam.ratio = (cam.ratio / factor).clamp(MIN_RATIO, MAX_RATIO);
		cam.x = nx - vx * cam.ratio;
		cam.y = ny - vy * cam.ratio;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_sandbox::types::NodeAttributes;

	fn node(x: f64, y: f64) -> NodeView {
		NodeView {
			id: format!("{x},{y}"),
			x,
			y,
			attributes: NodeAttributes::default(),
		}
	}

	fn close(a: (f64, f64), b: (f64, f64)) -> bool {
		(a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
	}

	fn viewport() -> Viewport {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.refresh(&[node(-100.0, 0.0), node(100.0, 50.0), node(0.0, -100.0)]);
		vp
	}

	#[test]
	fn bbox_from_points() {
		let bbox = BBox::from_points([(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)]);
		assert_eq!(bbox.x, (-2.0, 4.0));
		assert_eq!(bbox.y, (-1.0, 5.0));
		assert_eq!(BBox::from_points([]), BBox::default());
		assert_eq!(BBox::from_points([(2.0, 2.0)]).extent(), 1.0);
	}

	#[test]
	fn bbox_center_maps_to_viewport_center() {
		let vp = viewport();
		let (cx, cy) = vp.bbox().center();
		assert!(close(vp.graph_to_viewport(cx, cy), (400.0, 300.0)));
	}

	#[test]
	fn conversions_are_inverse_under_camera_moves() {
		let mut vp = viewport();
		vp.pan(37.0, -12.0);
		vp.zoom_at(120.0, 80.0, 1.7);
		let (sx, sy) = vp.graph_to_viewport(42.0, -17.5);
		assert!(close(vp.viewport_to_graph(sx, sy), (42.0, -17.5)));
	}

	#[test]
	fn zoom_keeps_point_under_cursor() {
		let mut vp = viewport();
		let before = vp.viewport_to_graph(250.0, 100.0);
		vp.zoom_at(250.0, 100.0, 2.0);
		assert!(close(vp.viewport_to_graph(250.0, 100.0), before));
		assert!((vp.camera.ratio - 0.5).abs() < 1e-12);
	}

	#[test]
	fn clip_matrix_matches_viewport_transform() {
		let mut vp = viewport();
		vp.zoom_at(500.0, 200.0, 1.3);
		let m = vp.clip_matrix();
		let (x, y) = (30.0, 60.0);
		let clip = (
			m[0] as f64 * x + m[6] as f64,
			m[4] as f64 * y + m[7] as f64,
		);
		let (sx, sy) = vp.graph_to_viewport(x, y);
		let expected = (2.0 * sx / vp.width - 1.0, 1.0 - 2.0 * sy / vp.height);
		assert!((clip.0 - expected.0).abs() < 1e-4);
		assert!((clip.1 - expected.1).abs() < 1e-4);
	}

	#[test]
	fn custom_bbox_freezes_transform() {
		let mut vp = viewport();
		vp.set_custom_bbox(Some(vp.bbox()));
		let before = vp.viewport_to_graph(10.0, 10.0);
		vp.refresh(&[node(-1000.0, 0.0), node(1000.0, 900.0)]);
		assert!(close(vp.viewport_to_graph(10.0, 10.0), before));

		vp.set_custom_bbox(None);
		assert!(!close(vp.viewport_to_graph(10.0, 10.0), before));
	}
}
