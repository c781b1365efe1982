//! Configuration and dashboard layout tests

use proptest::prelude::*;
use sciplot_core::{
    column_widths, row_widths, DashboardGrid, HistogramOptions, LayoutConfig, PlotConfig,
    PlotError,
};

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = PlotConfig::from_toml(
        r#"
        [histogram]
        bins = 25

        [outliers]
        sigma_bound = 4.0
        remove = true
        "#,
    )
    .unwrap();

    assert_eq!(config.histogram.bins, 25);
    assert_eq!(config.outliers.sigma_bound, 4.0);
    assert!(config.outliers.remove);
    assert_eq!(config.bar, PlotConfig::default().bar);
    assert!(config.validate().is_ok());

    let options = HistogramOptions::from_config(&config);
    assert_eq!(options.bins, 25);
    assert!(options.outliers.remove);
}

#[test]
fn test_toml_and_json_round_trip() {
    let mut config = PlotConfig::default();
    config.correlation.max_points = 123;
    config.layout.max_column_width = 40;

    let from_toml = PlotConfig::from_toml(&config.to_toml().unwrap()).unwrap();
    assert_eq!(from_toml, config);
    let from_json = PlotConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(from_json, config);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = PlotConfig::default();
    config.histogram.bins = 0;
    assert!(matches!(config.validate(), Err(PlotError::InvalidConfig(_))));

    let mut config = PlotConfig::default();
    config.layout.min_column_width = 60;
    assert!(config.validate().is_err());
}

#[test]
fn test_bad_toml_is_an_error() {
    assert!(matches!(
        PlotConfig::from_toml("histogram = 3"),
        Err(PlotError::Toml(_))
    ));
}

#[test]
fn test_dashboard_drops_empty_columns() {
    let columns = vec![vec![Some("a"), None], vec![None], vec![Some("b"), Some("c")]];
    let grid =
        DashboardGrid::from_columns(columns, Some(vec![30, 10, 60]), &LayoutConfig::default())
            .unwrap();

    assert_eq!(grid.n_columns(), 2);
    assert_eq!(grid.widths(), &[30, 60]);
    assert_eq!(grid.cell(1, 1), Some(&"c"));
    assert_eq!(grid.len(), 3);
}

#[test]
fn test_square_grid_is_row_major() {
    let grid = DashboardGrid::square((0..5).collect(), &LayoutConfig::default());
    // ceil(sqrt(5)) = 3 per row
    assert_eq!(grid.n_columns(), 3);
    assert_eq!(grid.cell(0, 0), Some(&0));
    assert_eq!(grid.cell(0, 2), Some(&2));
    assert_eq!(grid.cell(1, 0), Some(&3));
    assert_eq!(grid.widths(), &[31, 31, 31]);
}

proptest! {
    #[test]
    fn prop_column_widths_within_bounds(n in 1usize..40, min in 0u32..30, extra in 0u32..50) {
        let max = min + extra;
        let widths = column_widths(n, min, max);
        prop_assert_eq!(widths.len(), n);
        for w in widths {
            prop_assert!(w >= min && w <= max);
        }
    }

    #[test]
    fn prop_row_widths_fit_total(n in 1usize..20, total in 1u32..=100) {
        let widths = row_widths(n, total);
        prop_assert_eq!(widths.len(), n);
        prop_assert!(widths.iter().sum::<u32>() <= total);
    }
}
