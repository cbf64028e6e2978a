use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::config::AnimationConfig;
use crate::error::InitError;
use crate::pattern::ColorField;

const VERTEX_SHADER: &str = include_str!("../../shaders/fullscreen.vert");
const FRAGMENT_SHADER: &str = include_str!("../../shaders/lines.frag");

/// Two triangles covering clip space, drawn as a strip.
const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];

/// Fragment-shader implementation of the line field on a WebGL2 context.
///
/// GL objects are deleted on drop.
pub struct LineShader {
    gl: GL,
    program: WebGlProgram,
    shaders: [WebGlShader; 2],
    quad: WebGlBuffer,
    vao: WebGlVertexArrayObject,
    resolution: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

impl LineShader {
    /// Requests a WebGL2 context on `canvas` and builds the program.
    pub fn new(canvas: &HtmlCanvasElement, config: &AnimationConfig) -> Result<Self, InitError> {
        let options = Object::new();
        Reflect::set(&options, &"antialias".into(), &JsValue::from_bool(config.antialias))?;
        Reflect::set(&options, &"alpha".into(), &JsValue::from_bool(config.alpha))?;

        let gl: GL = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or(InitError::ContextUnavailable("WebGL2"))?
            .dyn_into()
            .map_err(|_| InitError::ContextUnavailable("WebGL2"))?;

        let vertex = compile(&gl, GL::VERTEX_SHADER, VERTEX_SHADER)?;
        let fragment = match compile(&gl, GL::FRAGMENT_SHADER, FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(err) => {
                gl.delete_shader(Some(&vertex));
                return Err(err);
            }
        };
        let program = match link(&gl, &vertex, &fragment) {
            Ok(program) => program,
            Err(err) => {
                gl.delete_shader(Some(&vertex));
                gl.delete_shader(Some(&fragment));
                return Err(err);
            }
        };

        let (quad, vao) = match upload_quad(&gl) {
            Ok(objects) => objects,
            Err(err) => {
                gl.delete_program(Some(&program));
                gl.delete_shader(Some(&vertex));
                gl.delete_shader(Some(&fragment));
                return Err(err);
            }
        };

        let resolution = gl.get_uniform_location(&program, "iResolution");
        let time = gl.get_uniform_location(&program, "iTime");

        Ok(Self {
            gl,
            program,
            shaders: [vertex, fragment],
            quad,
            vao,
            resolution,
            time,
        })
    }

    /// Matches the viewport to the canvas backing store.
    pub fn viewport(&self, width: u32, height: u32) {
        self.gl.viewport(0, 0, width as i32, height as i32);
    }

    pub fn draw(&self, field: &ColorField) {
        let gl = &self.gl;
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));
        gl.uniform2f(
            self.resolution.as_ref(),
            field.resolution.width() as f32,
            field.resolution.height() as f32,
        );
        gl.uniform1f(self.time.as_ref(), field.time as f32);
        gl.draw_arrays(GL::TRIANGLE_STRIP, 0, 4);
        gl.bind_vertex_array(None);
    }
}

impl Drop for LineShader {
    fn drop(&mut self) {
        let gl = &self.gl;
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.quad));
        gl.delete_program(Some(&self.program));
        for shader in &self.shaders {
            gl.delete_shader(Some(shader));
        }
    }
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, InitError> {
    let shader = gl
        .create_shader(kind)
        .ok_or(InitError::ContextUnavailable("WebGL2 shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(InitError::ShaderCompile(log))
    }
}

fn link(gl: &GL, vertex: &WebGlShader, fragment: &WebGlShader) -> Result<WebGlProgram, InitError> {
    let program = gl
        .create_program()
        .ok_or(InitError::ContextUnavailable("WebGL2 program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(InitError::ProgramLink(log))
    }
}

fn upload_quad(gl: &GL) -> Result<(WebGlBuffer, WebGlVertexArrayObject), InitError> {
    let buffer = gl
        .create_buffer()
        .ok_or(InitError::ContextUnavailable("WebGL2 buffer"))?;
    let Some(vao) = gl.create_vertex_array() else {
        gl.delete_buffer(Some(&buffer));
        return Err(InitError::ContextUnavailable("WebGL2 vertex array"));
    };

    gl.bind_vertex_array(Some(&vao));
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let vertices = Float32Array::from(&QUAD[..]);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(0);
    gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
    gl.bind_vertex_array(None);
    gl.bind_buffer(GL::ARRAY_BUFFER, None);

    Ok((buffer, vao))
}
