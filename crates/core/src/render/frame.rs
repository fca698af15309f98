//! The per-frame draw procedure.
//!
//! Every frame re-asserts the full binding chain instead of trusting state
//! retained from the previous frame:
//!
//! 1. clear the color target
//! 2. bind the program
//! 3. write the animated gray level to `u_Color` (alpha fixed at 1)
//! 4. bind the vertex array, vertex buffer, attribute layout and index buffer
//! 5. draw every index as a triangle list
//! 6. advance the animation
//!
//! Each step is checked for residual driver errors. The first one ends the
//! frame and is returned to the caller.

use glam::Vec4;

use super::driver::{check_errors, clear_errors, Driver};
use super::geometry::GeometryBuffers;
use super::shader::{build_program, destroy_program, resolve_uniform, ProgramHandle, UniformBinding};
use super::state::GraphicsState;
use crate::animation::AnimationState;
use crate::error::RenderError;
use crate::source::ShaderSourceSet;

/// Name of the color uniform the fragment stage must declare.
pub const COLOR_UNIFORM: &str = "u_Color";

/// Owns the program, geometry and animation for the render loop.
pub struct FrameRenderer<D: Driver> {
    program: ProgramHandle<D::Program>,
    color: UniformBinding<D::UniformLocation>,
    geometry: GeometryBuffers<D>,
    animation: AnimationState,
    clear_color: Vec4,
    state: GraphicsState<D>,
    frames: u64,
}

impl<D: Driver> FrameRenderer<D> {
    /// Takes ownership of `program` and `geometry` and resolves `u_Color`.
    ///
    /// If the uniform cannot be resolved, `program` and `geometry` are
    /// released before returning.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::UniformNotFound` if the program does not
    /// declare an active `u_Color`.
    pub fn new(
        driver: &D,
        program: ProgramHandle<D::Program>,
        geometry: GeometryBuffers<D>,
        animation: AnimationState,
        clear_color: Vec4,
    ) -> Result<Self, RenderError> {
        let color = match resolve_uniform(driver, &program, COLOR_UNIFORM) {
            Ok(color) => color,
            Err(e) => {
                destroy_program(driver, program);
                geometry.destroy(driver);
                return Err(e);
            }
        };

        Ok(Self {
            program,
            color,
            geometry,
            animation,
            clear_color,
            state: GraphicsState::new(),
            frames: 0,
        })
    }

    /// Uploads the quad, builds the program from `sources` and resolves
    /// `u_Color`.
    ///
    /// The program is built and validated while the quad's vertex array is
    /// bound, since core-profile drivers refuse to validate without one.
    /// Nothing stays allocated when any step fails.
    ///
    /// # Errors
    ///
    /// Returns the first geometry, shader or uniform error.
    pub fn from_sources(
        driver: &D,
        sources: &ShaderSourceSet,
        animation: AnimationState,
        clear_color: Vec4,
    ) -> Result<Self, RenderError> {
        let geometry = GeometryBuffers::quad(driver)?;

        geometry.bind(driver);
        let program = build_program(driver, sources);
        driver.bind_vertex_array(None);

        let program = match program {
            Ok(program) => program,
            Err(e) => {
                geometry.destroy(driver);
                return Err(e.into());
            }
        };
        Self::new(driver, program, geometry, animation, clear_color)
    }

    /// Draws one frame and advances the animation.
    ///
    /// The animation only advances when the whole frame succeeded.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Driver` for the first residual driver error,
    /// or `RenderError::State` if the binding sequence was violated.
    pub fn render_frame(&mut self, driver: &D) -> Result<(), RenderError> {
        self.state.begin_frame();
        clear_errors(driver);

        driver.clear_color(self.clear_color);
        driver.clear();
        check_errors(driver, "clear")?;

        self.state.bind_program(&self.program)?;
        driver.use_program(Some(self.program.raw()));
        check_errors(driver, "use program")?;

        self.state.write_uniform()?;
        let level = self.animation.value();
        self.color.push(driver, Vec4::new(level, level, level, 1.0));
        check_errors(driver, "uniform u_Color")?;

        self.state.bind_geometry(&self.geometry)?;
        self.geometry.bind(driver);
        check_errors(driver, "bind geometry")?;

        self.state.draw()?;
        driver.draw_indexed_triangles(self.state.index_count());
        check_errors(driver, "draw elements")?;

        self.animation.advance();
        self.frames += 1;
        Ok(())
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn state(&self) -> &GraphicsState<D> {
        &self.state
    }

    pub fn color_uniform(&self) -> &UniformBinding<D::UniformLocation> {
        &self.color
    }

    pub fn geometry(&self) -> &GeometryBuffers<D> {
        &self.geometry
    }

    /// Frames drawn successfully so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Unbinds and releases the program and geometry.
    pub fn destroy(mut self, driver: &D) {
        driver.use_program(None);
        driver.bind_vertex_array(None);
        self.state.reset();
        destroy_program(driver, self.program);
        self.geometry.destroy(driver);
    }
}
