//! In-memory [`Driver`] that records every call, for tests.
//!
//! Handles are plain integers. The driver tracks which objects are alive so
//! tests can assert that nothing leaks, and it can be told to fail links or
//! validation or to report residual errors. A stage compiles only if its
//! source contains `void main`; anything else yields a syntax error log.
//!
//! [`capture_logs`] installs a `log` backend that keeps each test thread's
//! records, so tests can assert on the diagnostic lines a call wrote.

use glam::Vec4;
use log::{Level, Log, Metadata, Record};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Once;

use super::driver::{BufferTarget, Driver, INVALID_VALUE, NO_ERROR};
use crate::layout::VertexAttribute;
use crate::source::ShaderKind;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderKind, u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    ValidateProgram(u32),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    Uniform4(u32, [f32; 4]),
    CreateBuffer(u32),
    BindBuffer(BufferTarget, Option<u32>),
    BufferData(BufferTarget, usize),
    DeleteBuffer(u32),
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    EnableVertexAttrib(u32),
    VertexAttribPointer {
        index: u32,
        components: u8,
        stride: usize,
        offset: usize,
    },
    ClearColor([f32; 4]),
    Clear,
    DrawIndexedTriangles(usize),
}

#[derive(Default)]
pub struct RecordingDriver {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    shaders: RefCell<BTreeMap<u32, String>>,
    compiled: RefCell<BTreeSet<u32>>,
    programs: RefCell<BTreeMap<u32, Vec<String>>>,
    buffers: RefCell<BTreeSet<u32>>,
    vertex_arrays: RefCell<BTreeSet<u32>>,
    uniform_names: RefCell<Vec<String>>,
    errors: RefCell<VecDeque<u32>>,
    stuck_error: Cell<Option<u32>>,
    fail_link: Cell<bool>,
    fail_validate: Cell<bool>,
    fail_upload: Cell<bool>,
    fail_create: Cell<Option<&'static str>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Queues an error code to be reported by the next `error_code` calls.
    pub fn inject_error(&self, code: u32) {
        self.errors.borrow_mut().push_back(code);
    }

    /// Makes `error_code` return `code` forever, like a lost context.
    pub fn stick_error(&self, code: u32) {
        self.stuck_error.set(Some(code));
    }

    pub fn fail_link(&self) {
        self.fail_link.set(true);
    }

    pub fn fail_validate(&self) {
        self.fail_validate.set(true);
    }

    /// Makes every `buffer_data` call raise `INVALID_VALUE`.
    pub fn fail_upload(&self) {
        self.fail_upload.set(true);
    }

    /// Makes the named `create_*` call fail: "shader", "program", "buffer"
    /// or "vertex array".
    pub fn fail_create(&self, what: &'static str) {
        self.fail_create.set(Some(what));
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.borrow().len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.borrow().len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.borrow().len()
    }

    pub fn is_live_shader(&self, id: u32) -> bool {
        self.shaders.borrow().contains_key(&id)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self, what: &'static str) -> Result<u32, String> {
        if self.fail_create.get() == Some(what) {
            return Err(format!("no more {what} names"));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(id)
    }
}

impl Driver for RecordingDriver {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = u32;

    fn create_shader(&self, kind: ShaderKind) -> Result<u32, String> {
        let id = self.allocate("shader")?;
        self.shaders.borrow_mut().insert(id, String::new());
        self.record(Call::CreateShader(kind, id));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(slot) = self.shaders.borrow_mut().get_mut(&shader) {
            *slot = source.to_owned();
        }
    }

    fn compile_shader(&self, shader: u32) {
        self.record(Call::CompileShader(shader));
        let ok = self
            .shaders
            .borrow()
            .get(&shader)
            .is_some_and(|src| src.contains("void main"));
        if ok {
            self.compiled.borrow_mut().insert(shader);
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.compiled.borrow().contains(&shader)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            "ERROR: 0:1: syntax error: missing entry point 'main'".into()
        }
    }

    fn delete_shader(&self, shader: u32) {
        self.shaders.borrow_mut().remove(&shader);
        self.compiled.borrow_mut().remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<u32, String> {
        let id = self.allocate("program")?;
        self.programs.borrow_mut().insert(id, Vec::new());
        self.record(Call::CreateProgram(id));
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let source = self
            .shaders
            .borrow()
            .get(&shader)
            .cloned()
            .unwrap_or_default();
        if let Some(sources) = self.programs.borrow_mut().get_mut(&program) {
            sources.push(source);
        }
        self.record(Call::AttachShader(program, shader));
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        self.record(Call::DetachShader(program, shader));
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        let names = self
            .programs
            .borrow()
            .get(&program)
            .map(|sources| {
                sources
                    .iter()
                    .flat_map(|src| src.lines())
                    .filter_map(|line| line.trim().strip_prefix("uniform "))
                    .filter_map(|decl| decl.trim_end_matches(';').split_whitespace().last())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        *self.uniform_names.borrow_mut() = names;
    }

    fn program_link_status(&self, program: u32) -> bool {
        !self.fail_link.get() && self.programs.borrow().contains_key(&program)
    }

    fn validate_program(&self, program: u32) -> bool {
        self.record(Call::ValidateProgram(program));
        !self.fail_validate.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        if self.fail_link.get() {
            "error: vertex output 'v_uv' not read by fragment shader".into()
        } else if self.fail_validate.get() {
            "validation failed: no vertex array bound".into()
        } else {
            String::new()
        }
    }

    fn delete_program(&self, program: u32) {
        self.programs.borrow_mut().remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.uniform_names
            .borrow()
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32)
    }

    fn uniform_4_f32(&self, location: &u32, value: Vec4) {
        self.record(Call::Uniform4(*location, value.to_array()));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let id = self.allocate("buffer")?;
        self.buffers.borrow_mut().insert(id);
        self.record(Call::CreateBuffer(id));
        Ok(id)
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<u32>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        self.record(Call::BufferData(target, data.len()));
        if self.fail_upload.get() {
            self.inject_error(INVALID_VALUE);
        }
    }

    fn delete_buffer(&self, buffer: u32) {
        self.buffers.borrow_mut().remove(&buffer);
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let id = self.allocate("vertex array")?;
        self.vertex_arrays.borrow_mut().insert(id);
        self.record(Call::CreateVertexArray(id));
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        self.vertex_arrays.borrow_mut().remove(&vertex_array);
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn enable_vertex_attrib(&self, index: u32) {
        self.record(Call::EnableVertexAttrib(index));
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: &VertexAttribute,
        stride: usize,
        offset: usize,
    ) {
        self.record(Call::VertexAttribPointer {
            index,
            components: attribute.components,
            stride,
            offset,
        });
    }

    fn clear_color(&self, color: Vec4) {
        self.record(Call::ClearColor(color.to_array()));
    }

    fn clear(&self) {
        self.record(Call::Clear);
    }

    fn draw_indexed_triangles(&self, count: usize) {
        self.record(Call::DrawIndexedTriangles(count));
    }

    fn error_code(&self) -> u32 {
        if let Some(code) = self.stuck_error.get() {
            return code;
        }
        self.errors.borrow_mut().pop_front().unwrap_or(NO_ERROR)
    }

    fn version(&self) -> String {
        "4.6 (recording)".into()
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let line = record.args().to_string();
        CAPTURED.with(|captured| captured.borrow_mut().push((record.level(), line)));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Routes `log` records into a per-thread buffer and empties this thread's
/// buffer.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Records logged on this thread since the last [`capture_logs`].
pub fn captured_logs() -> Vec<(Level, String)> {
    CAPTURED.with(|captured| captured.borrow().clone())
}
