//! Vertex and index buffers for the quad, plus the layout that describes them.
//!
//! Data is uploaded once at creation with static usage and never
//! respecified. [`GeometryBuffers::bind`] re-establishes every binding and
//! re-applies the attribute layout; the renderer calls it before every draw
//! because other code can change the driver's global bindings between
//! frames.

use bytemuck::Pod;

use super::driver::{check_errors, clear_errors, BufferTarget, Driver};
use crate::error::RenderError;
use crate::layout::VertexLayout;

/// Corners of a centered quad in clip space, counter-clockwise from bottom left.
pub const QUAD_POSITIONS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

/// Two triangles covering [`QUAD_POSITIONS`].
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A vertex array, its vertex buffer, its index buffer and their layout.
pub struct GeometryBuffers<D: Driver> {
    vertex_array: D::VertexArray,
    vertex_buffer: D::Buffer,
    index_buffer: D::Buffer,
    layout: VertexLayout,
    vertex_count: usize,
    index_count: usize,
}

impl<D: Driver> GeometryBuffers<D> {
    /// Uploads `vertices` and `indices` once and records `layout`.
    ///
    /// # Errors
    ///
    /// - `InvalidLayout` if the vertex bytes are not a whole number of strides.
    /// - `InvalidIndexCount` if `indices` is empty or not a multiple of 3.
    /// - `IndexOutOfRange` if an index names a vertex that does not exist.
    /// - `Create` if the driver cannot allocate an object.
    /// - `Driver` if the driver reports an error during upload.
    pub fn create<V: Pod>(
        driver: &D,
        vertices: &[V],
        layout: VertexLayout,
        indices: &[u32],
    ) -> Result<Self, RenderError> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        if vertex_bytes.len() % layout.stride() != 0 {
            return Err(RenderError::InvalidLayout(format!(
                "{} bytes of vertex data is not a multiple of stride {}",
                vertex_bytes.len(),
                layout.stride()
            )));
        }
        let vertex_count = vertex_bytes.len() / layout.stride();

        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(RenderError::InvalidIndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(RenderError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let vertex_array = driver
            .create_vertex_array()
            .map_err(|message| RenderError::Create {
                what: "vertex array",
                message,
            })?;
        let vertex_buffer = match driver.create_buffer() {
            Ok(buffer) => buffer,
            Err(message) => {
                driver.delete_vertex_array(vertex_array);
                return Err(RenderError::Create {
                    what: "vertex buffer",
                    message,
                });
            }
        };
        let index_buffer = match driver.create_buffer() {
            Ok(buffer) => buffer,
            Err(message) => {
                driver.delete_buffer(vertex_buffer);
                driver.delete_vertex_array(vertex_array);
                return Err(RenderError::Create {
                    what: "index buffer",
                    message,
                });
            }
        };

        let geometry = Self {
            vertex_array,
            vertex_buffer,
            index_buffer,
            layout,
            vertex_count,
            index_count: indices.len(),
        };

        clear_errors(driver);
        driver.bind_vertex_array(Some(vertex_array));
        driver.bind_buffer(BufferTarget::Array, Some(vertex_buffer));
        driver.buffer_data(BufferTarget::Array, vertex_bytes);
        driver.bind_buffer(BufferTarget::ElementArray, Some(index_buffer));
        driver.buffer_data(BufferTarget::ElementArray, bytemuck::cast_slice(indices));
        geometry.apply_layout(driver);
        driver.bind_vertex_array(None);
        driver.bind_buffer(BufferTarget::Array, None);
        driver.bind_buffer(BufferTarget::ElementArray, None);

        if let Err(e) = check_errors(driver, "upload geometry") {
            geometry.destroy(driver);
            return Err(e.into());
        }

        log::debug!(
            "uploaded {vertex_count} vertices and {} indices",
            geometry.index_count
        );
        Ok(geometry)
    }

    /// The centered unit quad: 4 positions and 6 indices.
    ///
    /// # Errors
    ///
    /// Fails only if the driver cannot allocate or upload the buffers.
    pub fn quad(driver: &D) -> Result<Self, RenderError> {
        Self::create(
            driver,
            &QUAD_POSITIONS,
            VertexLayout::position_2d(),
            &QUAD_INDICES,
        )
    }

    /// Re-establishes the vertex array, both buffers and every attribute.
    pub fn bind(&self, driver: &D) {
        driver.bind_vertex_array(Some(self.vertex_array));
        driver.bind_buffer(BufferTarget::Array, Some(self.vertex_buffer));
        self.apply_layout(driver);
        driver.bind_buffer(BufferTarget::ElementArray, Some(self.index_buffer));
    }

    fn apply_layout(&self, driver: &D) {
        for (index, attribute, offset) in self.layout.iter() {
            driver.enable_vertex_attrib(index);
            driver.vertex_attrib_pointer(index, attribute, self.layout.stride(), offset);
        }
    }

    pub fn vertex_array(&self) -> D::VertexArray {
        self.vertex_array
    }

    pub fn vertex_buffer(&self) -> D::Buffer {
        self.vertex_buffer
    }

    pub fn index_buffer(&self) -> D::Buffer {
        self.index_buffer
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of indices drawn per frame.
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }

    /// Releases the buffers and the vertex array.
    pub fn destroy(self, driver: &D) {
        driver.delete_buffer(self.vertex_buffer);
        driver.delete_buffer(self.index_buffer);
        driver.delete_vertex_array(self.vertex_array);
    }
}
