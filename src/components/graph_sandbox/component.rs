use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, WheelEvent, Window,
};

use super::color::Rgba;
use super::gl::NodeLayer;
use super::render::{self, ImageCache};
use super::settings::SandboxSettings;
use super::state::SandboxState;
use super::types::GraphData;

const LAYER_STYLE: &str = "position: absolute; top: 0; left: 0; display: block;";

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|h| h.as_f64())
			.unwrap_or(600.0),
	)
}

/// Mouse position relative to the canvas' top-left corner. May lie outside
/// the canvas.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_size(canvases: &[&HtmlCanvasElement], width: f64, height: f64) {
	for canvas in canvases {
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
	}
}

/// Three stacked canvases: edges (2D), nodes (WebGL2, 2D fallback) and
/// labels (2D). The labels canvas on top captures the mouse.
#[component]
pub fn GraphSandbox(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] layout_running: Signal<bool>,
	#[prop(optional)] settings: SandboxSettings,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let edges_ref = NodeRef::<leptos::html::Canvas>::new();
	let nodes_ref = NodeRef::<leptos::html::Canvas>::new();
	let labels_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SandboxState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Moves and releases are heard on the window so a drag survives leaving
	// the canvas.
	let window_cbs: Rc<RefCell<Vec<Closure<dyn FnMut(Event)>>>> =
		Rc::new(RefCell::new(Vec::new()));
	let (state_init, animate_init, resize_cb_init, window_cbs_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		window_cbs.clone(),
	);

	Effect::new(move |_| {
		let (Some(edges), Some(nodes), Some(labels)) =
			(edges_ref.get(), nodes_ref.get(), labels_ref.get())
		else {
			return;
		};
		let (edges, nodes, labels): (HtmlCanvasElement, HtmlCanvasElement, HtmlCanvasElement) =
			(edges.into(), nodes.into(), labels.into());
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			let parent = labels.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		set_size(&[&edges, &nodes, &labels], w, h);

		let (Some(edges_ctx), Some(labels_ctx)) = (context_2d(&edges), context_2d(&labels)) else {
			error!("Canvas 2D context unavailable");
			return;
		};
		let mut node_layer = match NodeLayer::new(&nodes, settings.node_programs.clone()) {
			Ok(layer) => Some(layer),
			Err(err) => {
				error!("Falling back to Canvas 2D nodes: {err}");
				None
			}
		};
		let fallback_ctx = if node_layer.is_none() {
			context_2d(&nodes)
		} else {
			None
		};
		let border_color = Rgba::from_hex(&settings.border_color).unwrap_or(Rgba::WHITE);
		*state_init.borrow_mut() = Some(SandboxState::new(&data.get(), settings.clone(), w, h));

		if fullscreen {
			let state_resize = state_init.clone();
			let layers = [edges.clone(), nodes.clone(), labels.clone()];
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				set_size(&layers.iter().collect::<Vec<_>>(), nw, nh);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if window_cbs_init.borrow().is_empty() {
			let (state_mm, canvas_mm) = (state_init.clone(), labels.clone());
			let on_mousemove = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				let (x, y) = canvas_point(&canvas_mm, ev);
				if let Some(ref mut s) = *state_mm.borrow_mut() {
					if s.pointer_move(x, y) {
						ev.prevent_default();
						ev.stop_propagation();
					}
					// tachys' `style` shadows the DOM getter
					let _ = web_sys::HtmlElement::style(&canvas_mm)
						.set_property("cursor", s.cursor(x, y));
				}
			});
			let (state_mu, canvas_mu) = (state_init.clone(), labels.clone());
			let on_mouseup = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
				let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
					return;
				};
				let (x, y) = canvas_point(&canvas_mu, ev);
				if let Some(ref mut s) = *state_mu.borrow_mut() {
					s.pointer_up(x, y);
				}
			});
			let state_bl = state_init.clone();
			let on_blur = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
				if let Some(ref mut s) = *state_bl.borrow_mut() {
					s.pointer_leave();
				}
			});

			let mut cbs = window_cbs_init.borrow_mut();
			for (event, cb) in [
				("mousemove", on_mousemove),
				("mouseup", on_mouseup),
				("blur", on_blur),
			] {
				let _ = window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
				cbs.push(cb);
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		let mut images = ImageCache::default();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.layout.set_running(layout_running.get_untracked());
				s.tick(0.016);
				render::render_edges(s, &edges_ctx);
				match (&mut node_layer, &fallback_ctx) {
					(Some(layer), _) => layer.draw(s.frame_nodes(), &s.viewport, border_color),
					(None, Some(ctx)) => render::render_nodes_fallback(s, ctx),
					(None, None) => {}
				}
				render::render_labels(s, &labels_ctx, &mut images);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let pointer = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = labels_ref.get()?.into();
		Some(canvas_point(&canvas, ev))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	view! {
		<div class="graph-sandbox" style="position: relative; width: 100%; height: 100%;">
			<canvas node_ref=edges_ref class="graph-sandbox-edges" style=LAYER_STYLE />
			<canvas node_ref=nodes_ref class="graph-sandbox-nodes" style=LAYER_STYLE />
			<canvas
				node_ref=labels_ref
				class="graph-sandbox-labels"
				on:mousedown=on_mousedown
				on:wheel=on_wheel
				style=LAYER_STYLE
			/>
		</div>
	}
}
