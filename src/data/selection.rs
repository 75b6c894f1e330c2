use super::model::{CellValue, PressureDataset};

// ---------------------------------------------------------------------------
// Row-range selection
// ---------------------------------------------------------------------------

/// Half-open row range `[start, end)` picked with the two sliders.
///
/// Both bounds live in `[0, len - 1]` and are chosen independently, so the
/// range may be empty (`start == end`) or inverted (`start > end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    /// Initial slider positions for a dataset of `len` rows: first row to last row.
    pub fn full(len: usize) -> Self {
        Self {
            start: 0,
            end: len.saturating_sub(1),
        }
    }

    /// Clamp both bounds to the slider range of a dataset with `len` rows.
    pub fn clamped(self, len: usize) -> Self {
        let max = len.saturating_sub(1);
        Self {
            start: self.start.min(max),
            end: self.end.min(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Number of selected rows (zero when empty or inverted).
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// A borrowed window of rows from a [`PressureDataset`].
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    dataset: &'a PressureDataset,
    range: SelectionRange,
}

impl<'a> Selection<'a> {
    /// Select `range` from `dataset`. Bounds past the last row are cut off;
    /// an inverted range yields an empty selection that remembers its bounds.
    pub fn new(dataset: &'a PressureDataset, range: SelectionRange) -> Self {
        let len = dataset.len();
        let range = SelectionRange {
            start: range.start.min(len),
            end: range.end.min(len),
        };
        Self { dataset, range }
    }

    pub fn range(&self) -> SelectionRange {
        self.range
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Absolute row index of the first selected row.
    pub fn offset(&self) -> usize {
        self.range.start
    }

    pub fn pressure(&self) -> &'a [f64] {
        if self.is_empty() {
            return &[];
        }
        &self.dataset.pressure()[self.range.start..self.range.end]
    }

    pub fn time(&self) -> &'a [CellValue] {
        if self.is_empty() {
            return &[];
        }
        &self.dataset.time()[self.range.start..self.range.end]
    }

    /// Selected rows of any column, by position in the dataset.
    pub fn column(&self, idx: usize) -> &'a [CellValue] {
        if self.is_empty() {
            return &[];
        }
        &self.dataset.columns[idx].values[self.range.start..self.range.end]
    }
}
