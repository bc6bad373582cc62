//! Responsive grid scaling.
//!
//! Given the available container width and the item count, choose an integer
//! column count and a uniform scale so the grid is as square as possible
//! without any column dropping below the minimum item width. One scale value
//! (the font size) is propagated to every dependent part, including the
//! feedback popup, so all visuals stay consistent.

/// Minimum width per item, including its required margin, in pixels.
pub const ITEM_MIN_SIZE: f64 = 100.0;
/// Reference item size the scale is computed against, in pixels.
pub const ITEM_STD_SIZE: f64 = 116.0;
/// Reference font size, in pixels.
pub const STD_FONT_SIZE: f64 = 16.0;
/// List padding, in em units of the reference font.
pub const LIST_PADDING: f64 = 1.0;

/// Solved grid geometry for one container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Number of columns.
    pub cols: usize,
    /// Width share per item, percent, truncated to four decimals so rounding
    /// can never push a row over 100%.
    pub col_percent: f64,
    /// Uniform scale propagated to all dependent rendering.
    pub font_size: f64,
    /// Whether the column count changed, requiring per-item width and
    /// row-break markers to be reapplied.
    pub cols_changed: bool,
    /// Index of the first element of the second visual row.
    pub row_break_index: usize,
}

/// Computes [`GridSpec`]s, memoizing the last seen width so repeated resize
/// notifications with an unchanged width are free.
#[derive(Debug, Default)]
pub struct GridScaler {
    last_width: Option<f64>,
    cols: Option<usize>,
}

impl GridScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solve for a container width and item count.
    ///
    /// Returns `None` when the width is unchanged since the last call, or
    /// when fewer than four items are laid out (degenerate layouts are not
    /// optimized).
    pub fn rescale(&mut self, width: f64, item_count: usize) -> Option<GridSpec> {
        if self.last_width == Some(width) {
            return None;
        }
        self.last_width = Some(width);

        if item_count < 4 {
            return None;
        }

        let ideal = (item_count as f64).sqrt().ceil() as usize;
        // Never narrower than the minimum item width; one column floor for
        // containers narrower than a single item.
        let max_cols = ((width / ITEM_MIN_SIZE).floor() as usize).max(1);
        let cols = ideal.min(max_cols);

        let cols_changed = self.cols != Some(cols);
        self.cols = Some(cols);

        let col_percent = ((100.0 / cols as f64) * 10_000.0).floor() / 10_000.0;

        // How much one percent of the reference layout is worth, used to
        // subtract the list padding before sizing items.
        let one_percent = (ITEM_STD_SIZE * cols as f64 + STD_FONT_SIZE) / 100.0;
        let padding_share = (STD_FONT_SIZE * LIST_PADDING) / one_percent;
        let item_share = (100.0 - padding_share) / cols as f64;
        let font_size = (width * (item_share / 100.0) * STD_FONT_SIZE) / ITEM_STD_SIZE;

        Some(GridSpec {
            cols,
            col_percent,
            font_size,
            cols_changed,
            row_break_index: cols,
        })
    }

    /// Forget the memoized width and column count so the next call recomputes
    /// everything. Required after a reshuffle: column membership changes, so
    /// the row-break marker must be reapplied.
    pub fn invalidate(&mut self) {
        self.last_width = None;
        self.cols = None;
    }

    pub fn cols(&self) -> Option<usize> {
        self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_items_in_a_wide_container_use_two_columns() {
        let mut scaler = GridScaler::new();
        let spec = scaler.rescale(1000.0, 4).unwrap();
        // ceil(sqrt(4)) = 2, floor(1000 / 100) = 10.
        assert_eq!(spec.cols, 2);
        assert!(spec.cols_changed);
        assert_eq!(spec.row_break_index, 2);
        assert_eq!(spec.col_percent, 50.0);
    }

    #[test]
    fn narrow_container_caps_the_column_count() {
        let mut scaler = GridScaler::new();
        let spec = scaler.rescale(250.0, 9).unwrap();
        // ideal 3 columns, but only floor(250 / 100) = 2 fit.
        assert_eq!(spec.cols, 2);
    }

    #[test]
    fn unchanged_width_skips_recomputation() {
        let mut scaler = GridScaler::new();
        assert!(scaler.rescale(600.0, 16).is_some());
        assert!(scaler.rescale(600.0, 16).is_none());
        assert!(scaler.rescale(601.0, 16).is_some());
    }

    #[test]
    fn fewer_than_four_items_skip_scaling() {
        let mut scaler = GridScaler::new();
        assert!(scaler.rescale(800.0, 2).is_none());
    }

    #[test]
    fn col_percent_is_truncated_to_four_decimals() {
        let mut scaler = GridScaler::new();
        let spec = scaler.rescale(800.0, 36).unwrap();
        assert_eq!(spec.cols, 6);
        assert_eq!(spec.col_percent, 16.6666);
    }

    #[test]
    fn stable_cols_do_not_flag_a_change() {
        let mut scaler = GridScaler::new();
        let first = scaler.rescale(600.0, 16).unwrap();
        assert!(first.cols_changed);
        let second = scaler.rescale(620.0, 16).unwrap();
        assert_eq!(second.cols, first.cols);
        assert!(!second.cols_changed);
    }

    #[test]
    fn invalidate_forces_marker_reapplication() {
        let mut scaler = GridScaler::new();
        scaler.rescale(600.0, 16).unwrap();
        scaler.invalidate();
        let spec = scaler.rescale(600.0, 16).unwrap();
        assert!(spec.cols_changed);
    }

    #[test]
    fn font_size_tracks_width() {
        let mut scaler = GridScaler::new();
        let narrow = scaler.rescale(500.0, 16).unwrap();
        scaler.invalidate();
        let wide = scaler.rescale(1000.0, 16).unwrap();
        assert_eq!(narrow.cols, wide.cols);
        assert!(wide.font_size > narrow.font_size);
    }

    #[test]
    fn sliver_container_still_yields_one_column() {
        let mut scaler = GridScaler::new();
        let spec = scaler.rescale(60.0, 9).unwrap();
        assert_eq!(spec.cols, 1);
        assert!(spec.font_size.is_finite());
    }
}
