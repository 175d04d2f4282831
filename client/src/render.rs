use common::render::{self, CLEAR_COLOR, CellKind, RenderFrame, Renderer, Viewport};
use common::{GameSnapshot, Position};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as Gl, WebGlShader,
    WebGlUniformLocation,
};

use crate::WasmGame;

const VERTEX_SHADER: &str = r#"
attribute vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform vec4 u_color;

void main() {
    gl_FragColor = u_color;
}
"#;

/// Draws game frames onto a canvas with WebGL, one quad per cell.
#[wasm_bindgen]
pub struct WebGlRenderer {
    gl: Gl,
    program: WebGlProgram,
    buffer: WebGlBuffer,
    position_location: u32,
    color_location: WebGlUniformLocation,
    viewport: Viewport,
}

#[wasm_bindgen]
impl WebGlRenderer {
    /// Sizes the canvas to `grid_size * cell_size` pixels and compiles the shaders.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, grid_size: u16, cell_size: f32) -> Result<WebGlRenderer, JsValue> {
        let viewport = Viewport::new(grid_size, cell_size);
        let extent = viewport.extent() as u32;
        canvas.set_width(extent);
        canvas.set_height(extent);

        let gl = canvas
            .get_context("webgl")
            .map_err(|_| JsValue::from_str("Failed to get webgl context"))?
            .ok_or_else(|| JsValue::from_str("Unable to initialize WebGL. Your browser may not support it."))?
            .dyn_into::<Gl>()
            .map_err(|_| JsValue::from_str("Failed to cast to webgl context"))?;

        let vertex_shader = compile_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment_shader = compile_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&gl, &vertex_shader, &fragment_shader)?;
        // Linked programs keep their own copy
        gl.delete_shader(Some(&vertex_shader));
        gl.delete_shader(Some(&fragment_shader));
        gl.use_program(Some(&program));

        let position_location = gl.get_attrib_location(&program, "a_position");
        if position_location < 0 {
            return Err(JsValue::from_str("a_position attribute missing from shader"));
        }
        let color_location = gl
            .get_uniform_location(&program, "u_color")
            .ok_or_else(|| JsValue::from_str("u_color uniform missing from shader"))?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("Failed to create vertex buffer"))?;

        gl.viewport(0, 0, extent as i32, extent as i32);
        log::info!("WebGL renderer ready: {}x{} cells of {}px", grid_size, grid_size, cell_size);

        Ok(WebGlRenderer {
            gl,
            program,
            buffer,
            position_location: position_location as u32,
            color_location,
            viewport,
        })
    }

    /// Draw the current state of a running game.
    pub fn draw_game(&mut self, game: &WasmGame) -> Result<(), JsValue> {
        self.draw_snapshot(&game.engine().snapshot())
    }

    /// Draw a snapshot received as JSON, e.g. from `WasmGame::step`.
    pub fn draw_snapshot_json(&mut self, snapshot_json: &str) -> Result<(), JsValue> {
        let snapshot: GameSnapshot = serde_json::from_str(snapshot_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse game state: {}", e)))?;
        self.draw_snapshot(&snapshot)
    }
}

impl WebGlRenderer {
    fn draw_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<(), JsValue> {
        render::draw(self, &RenderFrame::from_snapshot(snapshot))
    }
}

impl Drop for WebGlRenderer {
    fn drop(&mut self) {
        self.gl.delete_buffer(Some(&self.buffer));
        self.gl.delete_program(Some(&self.program));
    }
}

impl Renderer for WebGlRenderer {
    type Error = JsValue;

    fn clear(&mut self) -> Result<(), JsValue> {
        let [r, g, b, a] = CLEAR_COLOR;
        self.gl.clear_color(r, g, b, a);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);
        Ok(())
    }

    fn fill_cell(&mut self, position: Position, kind: CellKind) -> Result<(), JsValue> {
        let triangles = self.viewport.clip_rect(position).triangles();
        let vertices = js_sys::Float32Array::from(&triangles[..]);

        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&self.buffer));
        self.gl
            .buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &vertices, Gl::STATIC_DRAW);
        self.gl.enable_vertex_attrib_array(self.position_location);
        self.gl
            .vertex_attrib_pointer_with_i32(self.position_location, 2, Gl::FLOAT, false, 0, 0);

        self.gl
            .uniform4fv_with_f32_array(Some(&self.color_location), &kind.color());
        self.gl.draw_arrays(Gl::TRIANGLES, 0, 6);
        Ok(())
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("Unable to create shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "Unknown error creating shader".to_string());
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&log))
    }
}

fn link_program(gl: &Gl, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("Unable to create program object"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "Unknown error linking program".to_string());
        gl.delete_program(Some(&program));
        Err(JsValue::from_str(&log))
    }
}
