//! Layout descriptor model and JSON io.
//!
//! The descriptor is the single source of physical truth for a
//! calibration session: board and storage dimensions, reference marker
//! geometry and per-component placement data. It is loaded once per
//! calibration, validated, and never mutated afterwards. Field names
//! mirror the descriptor file keys.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("component `{name}`: {occurrences} occurrences but {rows} coordinate rows")]
    OccurrenceMismatch {
        name: String,
        occurrences: usize,
        rows: usize,
    },
    #[error("`{field}` must be positive")]
    NonPositiveSpan { field: &'static str },
    #[error("storage grid needs at least one row and one column")]
    EmptyGrid,
    #[error("storage grid {rows}x{columns} exceeds the supported cell count")]
    GridTooLarge { rows: u32, columns: u32 },
    #[error("component `{name}`: storage box {box_number} out of range ({cells} cells)")]
    BoxOutOfRange {
        name: String,
        box_number: u32,
        cells: u32,
    },
}

/// Offset of the board's physical coordinate origin from its top-left
/// corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OriginVector {
    pub x: f64,
    pub y: f64,
}

/// Physical measurements of the board and its reference stickers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardAttributes {
    #[serde(rename = "origin_vector")]
    pub origin: OriginVector,
    /// True if the real-world axes are swapped relative to the camera
    /// axes (stored as 0/1 in the descriptor file).
    #[serde(rename = "rotation", with = "int_bool")]
    pub rotated: bool,
    #[serde(rename = "referencewidth")]
    pub reference_width: f64,
    #[serde(rename = "referenceheight")]
    pub reference_height: f64,
    #[serde(rename = "boardwidth")]
    pub board_width: f64,
    #[serde(rename = "boardheight")]
    pub board_height: f64,
    /// Per-corner reference-to-board-corner distance vectors, one
    /// `[dx, dy]` row per canonical corner, expressed along the
    /// corner's two neighbor-edge directions (positive values point
    /// into the quad).
    #[serde(rename = "distRefsToBoardCorners")]
    pub dist_refs_to_corners: [[f64; 2]; 4],
}

/// Physical measurements of the component storage rack.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageAttributes {
    pub rows: u32,
    pub columns: u32,
    #[serde(rename = "referenceMiddlePointswidth")]
    pub reference_mid_width: f64,
    #[serde(rename = "referenceMiddlePointsheight")]
    pub reference_mid_height: f64,
    #[serde(rename = "referenceCornerPointswidth")]
    pub reference_corner_width: f64,
    #[serde(rename = "referenceCornerPointsheight")]
    pub reference_corner_height: f64,
    #[serde(rename = "boxOffsetX")]
    pub box_offset_x: f64,
    #[serde(rename = "boxOffsetY")]
    pub box_offset_y: f64,
    #[serde(rename = "boxWidth")]
    pub box_width: f64,
    #[serde(rename = "boxHeight")]
    pub box_height: f64,
    #[serde(rename = "distRefsToStorageCorners")]
    pub dist_refs_to_corners: [[f64; 2]; 4],
}

/// One component type on the board.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub occurrences: u32,
    /// One row per occurrence: raw x, raw y, center offset x, center
    /// offset y.
    pub coordinates: Vec<[f64; 4]>,
    pub width: f64,
    pub height: f64,
    /// Polarity marking for the UI (stored as 0/1).
    #[serde(with = "int_bool")]
    pub polarity: bool,
    /// One-based index of the storage cell holding this component.
    #[serde(rename = "box")]
    pub box_number: u32,
}

/// Immutable snapshot of the layout descriptor file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    #[serde(rename = "conductor_board")]
    pub board_name: String,
    #[serde(rename = "physicalattributes")]
    pub board: BoardAttributes,
    #[serde(rename = "componentstorage")]
    pub storage: StorageAttributes,
    pub components: Vec<ComponentSpec>,
}

impl LayoutDescriptor {
    /// Load and validate a descriptor from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a descriptor from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, LayoutError> {
        let descriptor: Self = serde_json::from_str(raw)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Write the descriptor to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let spans = [
            ("referencewidth", self.board.reference_width),
            ("referenceheight", self.board.reference_height),
            ("boardwidth", self.board.board_width),
            ("boardheight", self.board.board_height),
            (
                "referenceMiddlePointswidth",
                self.storage.reference_mid_width,
            ),
            (
                "referenceMiddlePointsheight",
                self.storage.reference_mid_height,
            ),
            (
                "referenceCornerPointswidth",
                self.storage.reference_corner_width,
            ),
            (
                "referenceCornerPointsheight",
                self.storage.reference_corner_height,
            ),
            ("boxWidth", self.storage.box_width),
            ("boxHeight", self.storage.box_height),
        ];
        for (field, span) in spans {
            if span <= 0.0 {
                return Err(LayoutError::NonPositiveSpan { field });
            }
        }

        if self.storage.rows < 1 || self.storage.columns < 1 {
            return Err(LayoutError::EmptyGrid);
        }

        // rows and columns come straight from the file; their product
        // must not be trusted to fit either.
        let cells = self
            .storage
            .rows
            .checked_mul(self.storage.columns)
            .ok_or(LayoutError::GridTooLarge {
                rows: self.storage.rows,
                columns: self.storage.columns,
            })?;
        for component in &self.components {
            if component.occurrences as usize != component.coordinates.len() {
                return Err(LayoutError::OccurrenceMismatch {
                    name: component.name.clone(),
                    occurrences: component.occurrences as usize,
                    rows: component.coordinates.len(),
                });
            }
            if component.box_number < 1 || component.box_number > cells {
                return Err(LayoutError::BoxOutOfRange {
                    name: component.name.clone(),
                    box_number: component.box_number,
                    cells,
                });
            }
        }

        Ok(())
    }
}

mod int_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*value as u8)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}
