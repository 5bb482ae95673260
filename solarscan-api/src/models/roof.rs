//! Roof geometry and panel layout

use serde::{Deserialize, Serialize};

/// Nameplate rating of one panel in the layout (kW)
pub const PANEL_RATING_KW: f64 = 0.3;

const CAPACITY_TOLERANCE_KW: f64 = 1e-9;

/// Roof facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Area on the roof that cannot hold panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// e.g. "chimney", "skylight"
    #[serde(rename = "type")]
    pub kind: String,
    /// m²
    pub area: f64,
}

/// Panel grid chosen for the usable roof area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelLayout {
    pub rows: u32,
    pub columns: u32,
    pub panel_count: u32,
    #[serde(rename = "totalCapacityKW")]
    pub total_capacity_kw: f64,
}

impl PanelLayout {
    /// Grid layout of `rows` x `columns` panels at [`PANEL_RATING_KW`] each
    ///
    /// The count saturates at `u32::MAX`; [`RoofAnalysis::validate`] rejects such a grid.
    pub fn grid(rows: u32, columns: u32) -> Self {
        let panel_count = rows.saturating_mul(columns);
        Self {
            rows,
            columns,
            panel_count,
            total_capacity_kw: panel_count as f64 * PANEL_RATING_KW,
        }
    }
}

/// Roof analysis for one building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofAnalysis {
    /// Total roof area (m²)
    pub area: f64,
    pub direction: CompassDirection,
    /// Pitch in degrees
    pub angle: f64,
    /// Area available for panels (m²), never more than `area`
    pub usable_area: f64,
    pub obstacles: Vec<Obstacle>,
    pub optimal_layout: PanelLayout,
}

impl RoofAnalysis {
    /// Check geometric and layout consistency
    ///
    /// Returns a description of the first violated invariant.
    pub fn validate(&self) -> Result<(), String> {
        if self.area < 0.0 || self.usable_area < 0.0 {
            return Err("roof areas must not be negative".to_string());
        }
        if self.usable_area > self.area {
            return Err(format!(
                "usable area {} exceeds roof area {}",
                self.usable_area, self.area
            ));
        }
        let layout = &self.optimal_layout;
        let Some(grid_count) = layout.rows.checked_mul(layout.columns) else {
            return Err(format!(
                "panel grid {}x{} is too large",
                layout.rows, layout.columns
            ));
        };
        if layout.panel_count != grid_count {
            return Err(format!(
                "panel count {} does not match {}x{} grid",
                layout.panel_count, layout.rows, layout.columns
            ));
        }
        let expected_kw = layout.panel_count as f64 * PANEL_RATING_KW;
        if (layout.total_capacity_kw - expected_kw).abs() > CAPACITY_TOLERANCE_KW {
            return Err(format!(
                "capacity {} kW inconsistent with {} panels ({} kW expected)",
                layout.total_capacity_kw, layout.panel_count, expected_kw
            ));
        }
        Ok(())
    }
}
