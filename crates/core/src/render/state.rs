//! Explicit mirror of the driver's binding registers.
//!
//! The driver exposes one global "currently bound" slot per object kind and
//! never checks that the program, vertex layout and index buffer in effect
//! at draw time belong together. [`GraphicsState`] records every binding the
//! renderer makes and walks a fixed per-frame sequence:
//!
//! ```text
//! Idle -> ProgramBound -> UniformWritten -> GeometryBound -> Drawn
//! ```
//!
//! A transition issued out of order is rejected before any driver call is
//! made for it.

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use super::driver::Driver;
use super::geometry::GeometryBuffers;
use super::shader::ProgramHandle;

/// Position within the per-frame binding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    Idle,
    ProgramBound,
    UniformWritten,
    GeometryBound,
    Drawn,
}

impl FrameStage {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameStage::Idle => "idle",
            FrameStage::ProgramBound => "program bound",
            FrameStage::UniformWritten => "uniform written",
            FrameStage::GeometryBound => "geometry bound",
            FrameStage::Drawn => "drawn",
        }
    }
}

impl fmt::Display for FrameStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An illegal transition in the binding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cannot move from '{from}' to '{to}'")]
    OutOfOrder { from: FrameStage, to: FrameStage },
}

/// Bindings the renderer has established, plus the current frame stage.
pub struct GraphicsState<D: Driver> {
    stage: FrameStage,
    program: Option<D::Program>,
    vertex_array: Option<D::VertexArray>,
    array_buffer: Option<D::Buffer>,
    element_buffer: Option<D::Buffer>,
    enabled_attributes: BTreeSet<u32>,
    index_count: usize,
}

impl<D: Driver> GraphicsState<D> {
    pub fn new() -> Self {
        Self {
            stage: FrameStage::Idle,
            program: None,
            vertex_array: None,
            array_buffer: None,
            element_buffer: None,
            enabled_attributes: BTreeSet::new(),
            index_count: 0,
        }
    }

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    pub fn program(&self) -> Option<D::Program> {
        self.program
    }

    pub fn vertex_array(&self) -> Option<D::VertexArray> {
        self.vertex_array
    }

    pub fn array_buffer(&self) -> Option<D::Buffer> {
        self.array_buffer
    }

    pub fn element_buffer(&self) -> Option<D::Buffer> {
        self.element_buffer
    }

    pub fn is_attribute_enabled(&self, index: u32) -> bool {
        self.enabled_attributes.contains(&index)
    }

    /// Index count of the geometry bound this frame.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Starts a new frame. Retained bindings are kept, but the sequence
    /// must be walked again from the program onward.
    pub fn begin_frame(&mut self) {
        self.stage = FrameStage::Idle;
    }

    /// Records `program` as the active program.
    ///
    /// # Errors
    ///
    /// Fails unless the frame is `Idle`.
    pub fn bind_program(&mut self, program: &ProgramHandle<D::Program>) -> Result<(), StateError> {
        self.advance(FrameStage::Idle, FrameStage::ProgramBound)?;
        self.program = Some(program.raw());
        Ok(())
    }

    /// Records that the frame's uniform value landed on the bound program.
    ///
    /// # Errors
    ///
    /// Fails unless a program was bound this frame.
    pub fn write_uniform(&mut self) -> Result<(), StateError> {
        self.advance(FrameStage::ProgramBound, FrameStage::UniformWritten)
    }

    /// Records the vertex array, both buffers and the enabled attributes of
    /// `geometry`.
    ///
    /// # Errors
    ///
    /// Fails unless the uniform was written this frame.
    pub fn bind_geometry(&mut self, geometry: &GeometryBuffers<D>) -> Result<(), StateError> {
        self.advance(FrameStage::UniformWritten, FrameStage::GeometryBound)?;
        self.vertex_array = Some(geometry.vertex_array());
        self.array_buffer = Some(geometry.vertex_buffer());
        self.element_buffer = Some(geometry.index_buffer());
        let locations = geometry.layout().iter().map(|(i, _, _)| i);
        self.enabled_attributes.extend(locations);
        self.index_count = geometry.index_count();
        Ok(())
    }

    /// Records the draw call.
    ///
    /// # Errors
    ///
    /// Fails unless geometry was bound this frame.
    pub fn draw(&mut self) -> Result<(), StateError> {
        self.advance(FrameStage::GeometryBound, FrameStage::Drawn)
    }

    /// Forgets every binding, as after the objects were deleted.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn advance(&mut self, expected: FrameStage, to: FrameStage) -> Result<(), StateError> {
        if self.stage != expected {
            return Err(StateError::OutOfOrder {
                from: self.stage,
                to,
            });
        }
        self.stage = to;
        Ok(())
    }
}

impl<D: Driver> Default for GraphicsState<D> {
    fn default() -> Self {
        Self::new()
    }
}
