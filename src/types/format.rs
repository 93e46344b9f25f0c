use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Numeric identifier of a cell format record in the workbook.
pub type FormatId = u32;

/// Fully resolved visual format of one cell.
///
/// This is what remains after default, row, column, explicit and conditional
/// formatting have been applied; rendering never looks past it. Empty parts
/// are left out of the serialized form.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolvedFormat {
    #[serde(skip_serializing_if = "FontSpec::is_empty")]
    pub font: FontSpec,
    #[serde(skip_serializing_if = "FillSpec::is_empty")]
    pub fill: FillSpec,
    #[serde(skip_serializing_if = "BorderSet::is_empty")]
    pub borders: BorderSet,
    #[serde(skip_serializing_if = "Alignment::is_empty")]
    pub alignment: Alignment,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Size in points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
}

impl FontSpec {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FillSpec {
    pub pattern: FillPattern,
    /// Pattern foreground (the solid color for `Solid`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl FillSpec {
    /// A solid fill of `color`.
    #[must_use]
    pub fn solid(color: impl Into<String>) -> Self {
        Self {
            pattern: FillPattern::Solid,
            color: Some(color.into()),
            background: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    /// Any shaded or hatched pattern; exporters choose how to approximate it
    Shaded,
}

/// Edge borders of a cell.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BorderSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderEdge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderEdge>,
}

impl BorderSet {
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BorderEdge {
    pub line: LineStyle,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    #[default]
    Thin,
    Medium,
    Thick,
    Double,
    Dashed,
    Dotted,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Alignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HorizontalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrap: bool,
    /// Text rotation in degrees
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
}

impl Alignment {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
    Justify,
    /// Centered across the following empty cells
    CenterAcross,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    Top,
    Center,
    Bottom,
}

/// Shared handle to a resolved format.
///
/// Every cell using the same format id gets a clone of the same handle from
/// the format cache, so equality checks on hot paths can use `ptr_eq`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRef(pub Arc<ResolvedFormat>);

impl FormatRef {
    #[must_use]
    pub fn new(format: ResolvedFormat) -> Self {
        Self(Arc::new(format))
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ResolvedFormat> for FormatRef {
    fn from(format: ResolvedFormat) -> Self {
        Self::new(format)
    }
}

impl Deref for FormatRef {
    type Target = ResolvedFormat;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for FormatRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FormatRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ResolvedFormat::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ref_serializes_transparently() {
        let f = FormatRef::new(ResolvedFormat {
            font: FontSpec {
                bold: true,
                ..FontSpec::default()
            },
            fill: FillSpec::solid("#FFFF00"),
            ..ResolvedFormat::default()
        });
        let json = serde_json::to_string(&f).unwrap();
        assert_eq!(
            json,
            r##"{"font":{"bold":true},"fill":{"pattern":"solid","color":"#FFFF00"}}"##
        );
        let back: FormatRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert!(!back.ptr_eq(&f));
        assert!(f.clone().ptr_eq(&f));
    }

    #[test]
    fn test_empty_parts_skipped() {
        let json = serde_json::to_string(&ResolvedFormat::default()).unwrap();
        assert_eq!(json, "{}");
        let parsed: ResolvedFormat = serde_json::from_str("{}").unwrap();
        assert!(parsed.borders.is_empty());
    }
}
