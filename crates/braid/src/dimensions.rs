//! Fixed row, header and footer heights.

/// A bundle of fixed heights, registered in one call.
///
/// Unset entries leave whatever is already registered untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    /// Row height.
    pub cell_height: Option<f64>,
    /// Estimated row height.
    pub estimated_cell_height: Option<f64>,
    /// Header height.
    pub header_height: Option<f64>,
    /// Estimated header height.
    pub estimated_header_height: Option<f64>,
    /// Footer height.
    pub footer_height: Option<f64>,
    /// Estimated footer height.
    pub estimated_footer_height: Option<f64>,
}

impl Dimensions {
    /// No heights set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row height.
    pub fn with_cell_height(mut self, height: f64) -> Self {
        self.cell_height = Some(height);
        self
    }

    /// Set the estimated row height.
    pub fn with_estimated_cell_height(mut self, height: f64) -> Self {
        self.estimated_cell_height = Some(height);
        self
    }

    /// Set the header height.
    pub fn with_header_height(mut self, height: f64) -> Self {
        self.header_height = Some(height);
        self
    }

    /// Set the estimated header height.
    pub fn with_estimated_header_height(mut self, height: f64) -> Self {
        self.estimated_header_height = Some(height);
        self
    }

    /// Set the footer height.
    pub fn with_footer_height(mut self, height: f64) -> Self {
        self.footer_height = Some(height);
        self
    }

    /// Set the estimated footer height.
    pub fn with_estimated_footer_height(mut self, height: f64) -> Self {
        self.estimated_footer_height = Some(height);
        self
    }
}
