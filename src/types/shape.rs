use serde::{Deserialize, Serialize};

use super::Anchor;

/// Native sub-point unit of shadow offsets (EMU per point).
pub const EMU_PER_POINT: f64 = 12700.0;

/// Kind of drawable object.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Shape,
    Picture,
    Chart,
    Group,
    TextBox,
    /// Cell comment popup; never printed as a page object
    Comment,
}

/// Shadow rendering style.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ShadowKind {
    #[default]
    None,
    /// Single offset copy of the shape
    Normal,
    /// Two offset copies (primary and secondary)
    Double,
    /// Light/dark pair on opposite sides
    EmbossOrEngrave,
    /// Offset copy with independent per-axis scale and origin
    Rich,
}

impl ShadowKind {
    /// Whether drawing uses the secondary shadow pass.
    pub fn has_secondary(self) -> bool {
        matches!(self, Self::Double | Self::EmbossOrEngrave)
    }
}

/// Shadow parameters of a shape.
///
/// Offsets are in EMU ([`EMU_PER_POINT`] per point) and may be negative.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Shadow {
    pub kind: ShadowKind,
    /// Draw the shadow in place of the shape body in the obscured pass
    pub obscured: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Offset of the secondary pass; defaults to the negated primary offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_offset: Option<(f64, f64)>,
    /// Horizontal scale of a rich shadow
    pub scale_x: f64,
    /// Vertical scale of a rich shadow
    pub scale_y: f64,
    /// Horizontal scaling origin of a rich shadow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_x: Option<f64>,
    /// Vertical scaling origin of a rich shadow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_y: Option<f64>,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            kind: ShadowKind::None,
            obscured: false,
            offset_x: 0.0,
            offset_y: 0.0,
            secondary_offset: None,
            scale_x: 1.0,
            scale_y: 1.0,
            origin_x: None,
            origin_y: None,
        }
    }
}

impl Shadow {
    /// A plain shadow offset by `(dx, dy)` EMU.
    #[must_use]
    pub fn offset(kind: ShadowKind, dx: f64, dy: f64) -> Self {
        Self {
            kind,
            offset_x: dx,
            offset_y: dy,
            ..Self::default()
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == ShadowKind::None
    }

    /// Offset used by the secondary pass, in EMU.
    pub fn secondary(&self) -> (f64, f64) {
        self.secondary_offset
            .unwrap_or((-self.offset_x, -self.offset_y))
    }
}

/// Which invocation of a shape's drawing is in progress.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ShadowPass {
    /// The shape itself
    #[default]
    Body,
    /// Shadow silhouette drawn in place of an obscured shape
    Obscured,
    /// Second shadow of double and emboss/engrave shadows
    Secondary,
    /// The regular shadow
    Primary,
}

impl ShadowPass {
    pub fn is_shadow(self) -> bool {
        self != Self::Body
    }
}

/// A drawable object, possibly a group with nested children.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShapeNode {
    pub kind: ShapeKind,
    pub anchor: Anchor,
    /// Rotation in degrees, clockwise on the page
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub shadow: Shadow,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ShapeNode>,
    /// The node's resolved frame is the parent frame of its later siblings
    #[serde(default)]
    pub governing: bool,
    pub visible: bool,
    pub printable: bool,
    /// 1-based position in the document's object list; 0 until indexed
    #[serde(default)]
    pub z_order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ShapeNode {
    /// A visible, printable, unrotated shape without shadow.
    #[must_use]
    pub fn new(kind: ShapeKind, anchor: Anchor) -> Self {
        Self {
            kind,
            anchor,
            rotation: 0.0,
            shadow: Shadow::default(),
            children: Vec::new(),
            governing: false,
            visible: true,
            printable: true,
            z_order: 0,
            hyperlink: None,
            name: None,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    #[must_use]
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = shadow;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ShapeNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn governing(mut self) -> Self {
        self.governing = true;
        self
    }

    #[must_use]
    pub fn with_hyperlink(mut self, target: impl Into<String>) -> Self {
        self.hyperlink = Some(target.into());
        self
    }

    /// Objects that take part in page output.
    pub fn is_page_object(&self) -> bool {
        self.printable && self.visible && self.kind != ShapeKind::Comment
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_secondary_defaults_to_negated_primary() {
        let s = Shadow::offset(ShadowKind::Double, 25400.0, -12700.0);
        assert_eq!(s.secondary(), (-25400.0, 12700.0));
        let s = Shadow {
            secondary_offset: Some((1.0, 2.0)),
            ..s
        };
        assert_eq!(s.secondary(), (1.0, 2.0));
    }

    #[test]
    fn test_page_object_filter() {
        let a = Anchor::cells(1, 1, 2, 2);
        assert!(ShapeNode::new(ShapeKind::Shape, a).is_page_object());
        assert!(!ShapeNode::new(ShapeKind::Comment, a).is_page_object());
        let mut hidden = ShapeNode::new(ShapeKind::Picture, a);
        hidden.visible = false;
        assert!(!hidden.is_page_object());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"kind":"textBox","anchor":{"row1":1,"col1":1,"row2":3,"col2":2},
            "visible":true,"printable":true}"#;
        let node: ShapeNode = match serde_json::from_str(json) {
            Ok(n) => n,
            Err(e) => panic!("deserialize failed: {e}"),
        };
        assert_eq!(node.kind, ShapeKind::TextBox);
        assert!(node.shadow.is_none());
        assert!(node.children.is_empty());
    }
}
