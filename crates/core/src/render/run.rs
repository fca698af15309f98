//! The render loop, driven by an externally owned window.

use super::driver::Driver;
use super::frame::FrameRenderer;
use crate::error::RenderError;

/// The window and context collaborator.
///
/// The loop calls [`should_close`](Surface::should_close) once per
/// iteration boundary, then [`swap_buffers`](Surface::swap_buffers) and
/// [`poll_events`](Surface::poll_events) once per drawn frame.
pub trait Surface {
    fn should_close(&self) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&mut self) -> Result<(), String>;

    /// Processes pending window events without blocking for new ones.
    fn poll_events(&mut self);
}

/// Runs clear, draw, swap and poll until the surface asks to close or
/// `max_frames` frames have been drawn.
///
/// Returns the number of frames drawn by this call.
///
/// # Errors
///
/// Stops at and returns the first frame error, or `RenderError::Surface`
/// if presenting fails.
pub fn run<S, D>(
    surface: &mut S,
    driver: &D,
    renderer: &mut FrameRenderer<D>,
    max_frames: Option<u64>,
) -> Result<u64, RenderError>
where
    S: Surface + ?Sized,
    D: Driver,
{
    let mut drawn = 0;
    while !surface.should_close() {
        if max_frames.is_some_and(|max| drawn >= max) {
            log::info!("frame limit of {drawn} reached");
            break;
        }

        renderer.render_frame(driver)?;
        surface.swap_buffers().map_err(RenderError::Surface)?;
        surface.poll_events();
        drawn += 1;
    }
    log::debug!("render loop finished after {drawn} frames");
    Ok(drawn)
}
