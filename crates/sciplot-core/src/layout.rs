//! Dashboard grid arithmetic
//!
//! Figures are arranged in columns whose widths are percentages of the
//! page. Only the placement is computed here; rendering the page is left
//! to whatever front end consumes the grid.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::error::{validation, PlotResult};

/// Equal column widths in percent, `clamp(trunc(100/n - 2), min, max)`
pub fn column_widths(n_columns: usize, min: u32, max: u32) -> Vec<u32> {
    if n_columns == 0 {
        return Vec::new();
    }
    let width = (100.0 / n_columns as f64 - 2.0).trunc().max(0.0) as u32;
    vec![width.max(min).min(max); n_columns]
}

/// Equal widths for `n` items sharing `total` percent, rounded down
pub fn row_widths(n: usize, total: u32) -> Vec<u32> {
    if n == 0 {
        return Vec::new();
    }
    vec![total / n as u32; n]
}

/// Figures arranged in columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardGrid<T> {
    /// Title lines above the grid
    pub title: Vec<String>,
    columns: Vec<Vec<T>>,
    widths: Vec<u32>,
}

impl<T> DashboardGrid<T> {
    /// Build from columns of optional cells
    ///
    /// Empty cells are dropped, then empty columns together with their
    /// entry in `explicit_widths`. Without explicit widths every column gets
    /// [`column_widths`] of the remaining count.
    pub fn from_columns(
        columns: Vec<Vec<Option<T>>>,
        explicit_widths: Option<Vec<u32>>,
        config: &LayoutConfig,
    ) -> PlotResult<Self> {
        if let Some(widths) = &explicit_widths {
            validation::validate_same_len("column widths", columns.len(), widths.len())?;
        }

        let mut kept_columns = Vec::with_capacity(columns.len());
        let mut kept_widths = Vec::new();
        for (i, column) in columns.into_iter().enumerate() {
            let cells: Vec<T> = column.into_iter().flatten().collect();
            if cells.is_empty() {
                tracing::debug!("Dropping empty dashboard column {}", i);
                continue;
            }
            kept_columns.push(cells);
            if let Some(widths) = &explicit_widths {
                kept_widths.push(widths[i]);
            }
        }

        let widths = match explicit_widths {
            Some(_) => kept_widths,
            None => column_widths(
                kept_columns.len(),
                config.min_column_width,
                config.max_column_width,
            ),
        };

        Ok(Self {
            title: Vec::new(),
            columns: kept_columns,
            widths,
        })
    }

    /// Near-square grid with `ceil(sqrt(n))` figures per row
    ///
    /// Figures fill rows left to right, top to bottom.
    pub fn square(figures: Vec<T>, config: &LayoutConfig) -> Self {
        let n = figures.len();
        let per_row = (n as f64).sqrt().ceil() as usize;

        let mut columns: Vec<Vec<T>> = (0..per_row).map(|_| Vec::new()).collect();
        for (i, figure) in figures.into_iter().enumerate() {
            columns[i % per_row].push(figure);
        }

        Self {
            title: Vec::new(),
            widths: column_widths(per_row, config.min_column_width, config.max_column_width),
            columns,
        }
    }

    pub fn with_title(mut self, line: impl Into<String>) -> Self {
        self.title.push(line.into());
        self
    }

    pub fn columns(&self) -> &[Vec<T>] {
        &self.columns
    }

    /// Column widths in percent
    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Figure at `row` of column `col`
    pub fn cell(&self, row: usize, col: usize) -> Option<&T> {
        self.columns.get(col)?.get(row)
    }

    /// Total number of figures
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths() {
        assert_eq!(column_widths(1, 18, 50), vec![50]);
        assert_eq!(column_widths(3, 18, 50), vec![31, 31, 31]);
        assert_eq!(column_widths(10, 18, 50), vec![18; 10]);
        assert!(column_widths(0, 18, 50).is_empty());
    }

    #[test]
    fn test_row_widths() {
        assert_eq!(row_widths(3, 50), vec![16, 16, 16]);
        assert!(row_widths(0, 50).is_empty());
    }

    #[test]
    fn test_from_columns_drops_empty() {
        let columns = vec![
            vec![Some("a"), None, Some("b")],
            vec![None],
            vec![Some("c")],
        ];
        let grid =
            DashboardGrid::from_columns(columns, Some(vec![20, 30, 40]), &LayoutConfig::default())
                .unwrap();

        assert_eq!(grid.columns(), &[vec!["a", "b"], vec!["c"]]);
        assert_eq!(grid.widths(), &[20, 40]);
        assert_eq!(grid.cell(1, 0), Some(&"b"));
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_from_columns_computed_widths() {
        let columns = vec![vec![Some(1)], vec![Some(2)]];
        let grid = DashboardGrid::from_columns(columns, None, &LayoutConfig::default()).unwrap();
        assert_eq!(grid.widths(), &[48, 48]);
    }

    #[test]
    fn test_from_columns_width_mismatch() {
        let columns = vec![vec![Some(1)], vec![Some(2)]];
        assert!(
            DashboardGrid::from_columns(columns, Some(vec![50]), &LayoutConfig::default())
                .is_err()
        );
    }

    #[test]
    fn test_square_row_major() {
        let grid = DashboardGrid::square(vec![0, 1, 2, 3, 4], &LayoutConfig::default());
        // ceil(sqrt(5)) = 3 per row
        assert_eq!(grid.n_columns(), 3);
        assert_eq!(grid.cell(0, 0), Some(&0));
        assert_eq!(grid.cell(0, 2), Some(&2));
        assert_eq!(grid.cell(1, 0), Some(&3));
        assert_eq!(grid.cell(1, 1), Some(&4));
        assert_eq!(grid.cell(1, 2), None);
        assert_eq!(grid.widths(), &[31, 31, 31]);
    }

    #[test]
    fn test_square_empty() {
        let grid = DashboardGrid::<u8>::square(Vec::new(), &LayoutConfig::default());
        assert!(grid.is_empty());
        assert_eq!(grid.n_columns(), 0);
    }
}
