use std::sync::Arc;

use log::info;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{
	HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader,
	WebGlUniformLocation,
};

use super::camera::Viewport;
use super::color::Rgba;
use super::programs::{NodeDisplay, NodeProgram, ProgramRegistry};
use super::types::NodeView;

const FALLBACK_COLOR: Rgba = Rgba {
	r: 0.4,
	g: 0.4,
	b: 0.4,
	a: 1.0,
};

#[derive(Debug, Error)]
pub enum GlError {
	#[error("WebGL2 is not available")]
	ContextUnavailable,
	#[error("could not allocate a GL {0}")]
	Allocation(&'static str),
	#[error("shader compilation failed for `{program}`: {log}")]
	ShaderCompilation { program: &'static str, log: String },
	#[error("program `{program}` failed to link: {log}")]
	ProgramLink { program: &'static str, log: String },
}

pub type Result<T> = std::result::Result<T, GlError>;

pub fn node_display(node: &NodeView, viewport: &Viewport, border_color: Rgba) -> NodeDisplay {
	NodeDisplay {
		x: node.x as f32,
		y: node.y as f32,
		radius: viewport.node_radius(node.attributes.size) as f32,
		color: Rgba::from_hex(&node.attributes.color).unwrap_or(FALLBACK_COLOR),
		border_color,
	}
}

struct CompiledProgram {
	source: Arc<dyn NodeProgram>,
	program: WebGlProgram,
	buffer: WebGlBuffer,
	u_matrix: Option<WebGlUniformLocation>,
	/// (location, components, byte offset)
	attributes: Vec<(u32, i32, i32)>,
	stride_bytes: i32,
	data: Vec<f32>,
}

/// WebGL2 canvas drawing every node as a point sprite through the paint
/// program registered for its type.
pub struct NodeLayer {
	gl: Gl,
	registry: ProgramRegistry,
	programs: Vec<CompiledProgram>,
}

impl NodeLayer {
	pub fn new(canvas: &HtmlCanvasElement, registry: ProgramRegistry) -> Result<Self> {
		let gl: Gl = canvas
			.get_context("webgl2")
			.ok()
			.flatten()
			.ok_or(GlError::ContextUnavailable)?
			.dyn_into()
			.map_err(|_| GlError::ContextUnavailable)?;

		let programs = registry
			.distinct()
			.into_iter()
			.map(|source| compile_program(&gl, source))
			.collect::<Result<Vec<_>>>()?;

		gl.enable(Gl::BLEND);
		gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
		info!(
			"Node layer ready with programs {:?}",
			programs.iter().map(|p| p.source.name()).collect::<Vec<_>>()
		);
		Ok(Self {
			gl,
			registry,
			programs,
		})
	}

	/// Highlighted nodes go in a second pass so they sit on top.
	pub fn draw(&mut self, nodes: &[NodeView], viewport: &Viewport, border_color: Rgba) {
		let gl = &self.gl;
		gl.viewport(0, 0, viewport.width as i32, viewport.height as i32);
		gl.clear_color(0.0, 0.0, 0.0, 0.0);
		gl.clear(Gl::COLOR_BUFFER_BIT);
		let matrix = viewport.clip_matrix();

		for highlighted in [false, true] {
			for node in nodes.iter().filter(|n| n.attributes.highlighted == highlighted) {
				let name = self.registry.program_for(node.attributes.node_type).name();
				if let Some(compiled) = self.programs.iter_mut().find(|p| p.source.name() == name) {
					let display = node_display(node, viewport, border_color);
					compiled.source.process(&display, &mut compiled.data);
				}
			}
			for compiled in &mut self.programs {
				flush(&self.gl, compiled, &matrix);
			}
		}
	}
}

fn flush(gl: &Gl, compiled: &mut CompiledProgram, matrix: &[f32; 9]) {
	let stride = compiled.source.stride();
	let count = if stride == 0 { 0 } else { compiled.data.len() / stride };
	if count == 0 {
		compiled.data.clear();
		return;
	}

	gl.use_program(Some(&compiled.program));
	gl.uniform_matrix3fv_with_f32_array(compiled.u_matrix.as_ref(), false, matrix);
	gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&compiled.buffer));
	let array = js_sys::Float32Array::from(compiled.data.as_slice());
	gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::DYNAMIC_DRAW);
	for &(location, size, offset) in &compiled.attributes {
		gl.enable_vertex_attrib_array(location);
		gl.vertex_attrib_pointer_with_i32(
			location,
			size,
			Gl::FLOAT,
			false,
			compiled.stride_bytes,
			offset,
		);
	}
	gl.draw_arrays(Gl::POINTS, 0, count as i32);
	for &(location, _, _) in &compiled.attributes {
		gl.disable_vertex_attrib_array(location);
	}
	compiled.data.clear();
}

fn compile_program(gl: &Gl, source: Arc<dyn NodeProgram>) -> Result<CompiledProgram> {
	let name = source.name();
	let vert = compile_shader(gl, Gl::VERTEX_SHADER, source.vertex_shader(), name)?;
	let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, source.fragment_shader(), name)?;

	let program = gl.create_program().ok_or(GlError::Allocation("program"))?;
	gl.attach_shader(&program, &vert);
	gl.attach_shader(&program, &frag);
	gl.link_program(&program);
	gl.delete_shader(Some(&vert));
	gl.delete_shader(Some(&frag));
	if !gl
		.get_program_parameter(&program, Gl::LINK_STATUS)
		.as_bool()
		.unwrap_or(false)
	{
		let log = gl.get_program_info_log(&program).unwrap_or_default();
		gl.delete_program(Some(&program));
		return Err(GlError::ProgramLink { program: name, log });
	}

	let float_size = std::mem::size_of::<f32>() as i32;
	let mut offset = 0;
	let mut attributes = Vec::new();
	for attribute in source.attributes() {
		// unused attributes are optimized out and report -1
		let location = gl.get_attrib_location(&program, attribute.name);
		if location >= 0 {
			attributes.push((location as u32, attribute.size, offset));
		}
		offset += attribute.size * float_size;
	}

	let buffer = gl.create_buffer().ok_or(GlError::Allocation("buffer"))?;
	let u_matrix = gl.get_uniform_location(&program, "u_matrix");
	Ok(CompiledProgram {
		stride_bytes: source.stride() as i32 * float_size,
		source,
		program,
		buffer,
		u_matrix,
		attributes,
		data: Vec::new(),
	})
}

fn compile_shader(gl: &Gl, kind: u32, text: &str, program: &'static str) -> Result<WebGlShader> {
	let shader = gl.create_shader(kind).ok_or(GlError::Allocation("shader"))?;
	gl.shader_source(&shader, text);
	gl.compile_shader(&shader);
	if gl
		.get_shader_parameter(&shader, Gl::COMPILE_STATUS)
		.as_bool()
		.unwrap_or(false)
	{
		Ok(shader)
	} else {
		let log = gl.get_shader_info_log(&shader).unwrap_or_default();
		gl.delete_shader(Some(&shader));
		Err(GlError::ShaderCompilation { program, log })
	}
}
