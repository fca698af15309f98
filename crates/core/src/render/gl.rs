//! [`Driver`] implementation for `glow::Context`.
//!
//! Each method forwards to exactly one `glow` call. Methods are named after
//! the `Driver` trait, so `HasContext` methods are called in fully qualified
//! form to keep the two traits apart.

use glam::Vec4;
use glow::HasContext;

use super::driver::{BufferTarget, Driver};
use crate::layout::{AttributeType, VertexAttribute};
use crate::source::ShaderKind;

fn shader_type(kind: ShaderKind) -> u32 {
    match kind {
        ShaderKind::Vertex => glow::VERTEX_SHADER,
        ShaderKind::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn data_type(kind: AttributeType) -> u32 {
    match kind {
        AttributeType::Float => glow::FLOAT,
        AttributeType::UnsignedByte => glow::UNSIGNED_BYTE,
        AttributeType::UnsignedInt => glow::UNSIGNED_INT,
    }
}

// SAFETY (whole impl): glow marks every GL entry point unsafe. Callers hold
// a current context for the lifetime of the `glow::Context`, every handle
// passed in was produced by this same context, and enum arguments come from
// the fixed mappings above.
#[allow(unsafe_code)]
impl Driver for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Buffer = <glow::Context as HasContext>::Buffer;
    type VertexArray = <glow::Context as HasContext>::VertexArray;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn create_shader(&self, kind: ShaderKind) -> Result<Self::Shader, String> {
        unsafe { HasContext::create_shader(self, shader_type(kind)) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { HasContext::get_shader_compile_status(self, shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { HasContext::get_shader_info_log(self, shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { HasContext::get_program_link_status(self, program) }
    }

    fn validate_program(&self, program: Self::Program) -> bool {
        unsafe {
            HasContext::validate_program(self, program);
            HasContext::get_program_parameter_i32(self, program, glow::VALIDATE_STATUS) != 0
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { HasContext::get_program_info_log(self, program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { HasContext::get_uniform_location(self, program, name) }
    }

    fn uniform_4_f32(&self, location: &Self::UniformLocation, value: Vec4) {
        unsafe {
            HasContext::uniform_4_f32(self, Some(location), value.x, value.y, value.z, value.w)
        }
    }

    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<Self::Buffer>) {
        unsafe { HasContext::bind_buffer(self, buffer_target(target), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            HasContext::buffer_data_u8_slice(self, buffer_target(target), data, glow::STATIC_DRAW)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<Self::VertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn bind_vertex_array(&self, vertex_array: Option<Self::VertexArray>) {
        unsafe { HasContext::bind_vertex_array(self, vertex_array) }
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn enable_vertex_attrib(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: u32,
        attribute: &VertexAttribute,
        stride: usize,
        offset: usize,
    ) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                i32::from(attribute.components),
                data_type(attribute.kind),
                attribute.normalized,
                stride as i32,
                offset as i32,
            )
        }
    }

    fn clear_color(&self, color: Vec4) {
        unsafe { HasContext::clear_color(self, color.x, color.y, color.z, color.w) }
    }

    fn clear(&self) {
        unsafe { HasContext::clear(self, glow::COLOR_BUFFER_BIT) }
    }

    fn draw_indexed_triangles(&self, count: usize) {
        unsafe {
            HasContext::draw_elements(self, glow::TRIANGLES, count as i32, glow::UNSIGNED_INT, 0)
        }
    }

    fn error_code(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn version(&self) -> String {
        unsafe { HasContext::get_parameter_string(self, glow::VERSION) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::driver::{
        INVALID_ENUM, INVALID_FRAMEBUFFER_OPERATION, INVALID_OPERATION, INVALID_VALUE,
        OUT_OF_MEMORY,
    };

    #[test]
    fn error_codes_match_glow_constants() {
        assert_eq!(INVALID_ENUM, glow::INVALID_ENUM);
        assert_eq!(INVALID_VALUE, glow::INVALID_VALUE);
        assert_eq!(INVALID_OPERATION, glow::INVALID_OPERATION);
        assert_eq!(OUT_OF_MEMORY, glow::OUT_OF_MEMORY);
        assert_eq!(
            INVALID_FRAMEBUFFER_OPERATION,
            glow::INVALID_FRAMEBUFFER_OPERATION
        );
    }

    #[test]
    fn shader_kinds_map_to_stage_enums() {
        assert_eq!(shader_type(ShaderKind::Vertex), glow::VERTEX_SHADER);
        assert_eq!(shader_type(ShaderKind::Fragment), glow::FRAGMENT_SHADER);
    }

    #[test]
    fn buffer_targets_map_to_binding_points() {
        assert_eq!(buffer_target(BufferTarget::Array), glow::ARRAY_BUFFER);
        assert_eq!(
            buffer_target(BufferTarget::ElementArray),
            glow::ELEMENT_ARRAY_BUFFER
        );
    }

    #[test]
    fn attribute_types_map_to_data_types() {
        assert_eq!(data_type(AttributeType::Float), glow::FLOAT);
        assert_eq!(data_type(AttributeType::UnsignedByte), glow::UNSIGNED_BYTE);
        assert_eq!(data_type(AttributeType::UnsignedInt), glow::UNSIGNED_INT);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn quad_renders_through_live_context() {
        // Would test: build_program + GeometryBuffers::quad + one render_frame
        // against a real context leave the error register empty.
    }
}
