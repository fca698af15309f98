#![deny(unsafe_code)]
//! Core of the quad renderer.
//!
//! Splits a combined shader file into stage sources ([`source`]), builds a
//! program from them, uploads the quad's vertex and index buffers, and draws
//! it once per frame with an animated `u_Color` ([`render`]). Everything that
//! talks to the graphics driver goes through the [`render::Driver`] trait;
//! the `glow` implementation is enabled by the `render` feature.

pub mod animation;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod source;

pub use animation::AnimationState;
pub use config::RenderConfig;
pub use error::RenderError;
pub use layout::{AttributeType, VertexAttribute, VertexLayout};
pub use source::{split, ShaderKind, ShaderSourceSet};
