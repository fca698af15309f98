//! Vertex attribute layout: how the bytes of one vertex map to shader inputs.
//!
//! Attributes are laid out back to back in enumeration order. Attribute `i`
//! is bound to shader input location `i`, and its byte offset is the sum of
//! the sizes of the attributes before it.

use crate::error::RenderError;

/// Scalar element type of a vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Float,
    UnsignedByte,
    UnsignedInt,
}

impl AttributeType {
    /// Size in bytes of a single component.
    pub fn size(self) -> usize {
        match self {
            AttributeType::Float | AttributeType::UnsignedInt => 4,
            AttributeType::UnsignedByte => 1,
        }
    }
}

/// Description of one per-vertex input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Number of components, 1 through 4.
    pub components: u8,
    pub kind: AttributeType,
    /// Whether integer data is normalized to `[0, 1]` when read as float.
    pub normalized: bool,
}

impl VertexAttribute {
    /// A non-normalized float attribute with `components` components.
    pub fn floats(components: u8) -> Self {
        Self {
            components,
            kind: AttributeType::Float,
            normalized: false,
        }
    }

    /// Size in bytes of the whole attribute.
    pub fn size(&self) -> usize {
        usize::from(self.components) * self.kind.size()
    }
}

/// Ordered attributes plus their computed offsets and the vertex stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    offsets: Vec<usize>,
    stride: usize,
}

impl VertexLayout {
    /// Builds a tightly packed layout from `attributes`.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidLayout` if there are no attributes or an
    /// attribute has a component count outside 1..=4.
    pub fn new(attributes: Vec<VertexAttribute>) -> Result<Self, RenderError> {
        if attributes.is_empty() {
            return Err(RenderError::InvalidLayout(
                "layout must describe at least attribute 0".into(),
            ));
        }

        let mut offsets = Vec::with_capacity(attributes.len());
        let mut stride = 0;
        for (index, attribute) in attributes.iter().enumerate() {
            if !(1..=4).contains(&attribute.components) {
                return Err(RenderError::InvalidLayout(format!(
                    "attribute {index} has {} components, expected 1 to 4",
                    attribute.components
                )));
            }
            offsets.push(stride);
            stride += attribute.size();
        }

        Ok(Self {
            attributes,
            offsets,
            stride,
        })
    }

    /// Builds a layout and checks it against an explicitly stated stride.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::InvalidLayout` if `stride` differs from the sum
    /// of the attribute sizes, or for any reason [`VertexLayout::new`] fails.
    pub fn with_stride(
        attributes: Vec<VertexAttribute>,
        stride: usize,
    ) -> Result<Self, RenderError> {
        let layout = Self::new(attributes)?;
        if layout.stride != stride {
            return Err(RenderError::InvalidLayout(format!(
                "stride {stride} does not match packed attribute size {}",
                layout.stride
            )));
        }
        Ok(layout)
    }

    /// A single two-component float position at location 0.
    pub fn position_2d() -> Self {
        Self {
            attributes: vec![VertexAttribute::floats(2)],
            offsets: vec![0],
            stride: 2 * AttributeType::Float.size(),
        }
    }

    /// Byte distance between consecutive vertices.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates `(location, attribute, byte offset)` in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &VertexAttribute, usize)> + '_ {
        self.attributes
            .iter()
            .zip(self.offsets.iter().copied())
            .enumerate()
            .map(|(i, (attribute, offset))| (i as u32, attribute, offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_sizes_follow_element_type() {
        assert_eq!(VertexAttribute::floats(2).size(), 8);
        let color = VertexAttribute {
            components: 4,
            kind: AttributeType::UnsignedByte,
            normalized: true,
        };
        assert_eq!(color.size(), 4);
    }

    #[test]
    fn new_packs_offsets_in_order() {
        let layout = VertexLayout::new(vec![
            VertexAttribute::floats(2),
            VertexAttribute::floats(3),
            VertexAttribute {
                components: 4,
                kind: AttributeType::UnsignedByte,
                normalized: true,
            },
        ])
        .unwrap();

        let offsets: Vec<(u32, usize)> = layout.iter().map(|(i, _, o)| (i, o)).collect();
        assert_eq!(offsets, vec![(0, 0), (1, 8), (2, 20)]);
        assert_eq!(layout.stride(), 24);
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn empty_layout_is_rejected() {
        let err = VertexLayout::new(Vec::new()).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLayout(_)));
    }

    #[test]
    fn zero_or_five_components_are_rejected() {
        assert!(VertexLayout::new(vec![VertexAttribute::floats(0)]).is_err());
        assert!(VertexLayout::new(vec![VertexAttribute::floats(5)]).is_err());
    }

    #[test]
    fn with_stride_accepts_matching_stride() {
        let layout = VertexLayout::with_stride(vec![VertexAttribute::floats(2)], 8).unwrap();
        assert_eq!(layout.stride(), 8);
    }

    #[test]
    fn with_stride_rejects_mismatch() {
        let err = VertexLayout::with_stride(vec![VertexAttribute::floats(2)], 12).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("12") && msg.contains('8'), "got: {msg}");
    }

    #[test]
    fn position_2d_matches_explicit_construction() {
        let explicit = VertexLayout::new(vec![VertexAttribute::floats(2)]).unwrap();
        assert_eq!(VertexLayout::position_2d(), explicit);
        assert!(!explicit.is_empty());
    }
}
