use hrrr_regrid::config::{BandConfig, Constants};
use hrrr_regrid::grid::{Band, BandGrid, SourceField, SourceGrid, SourceVolume};
use hrrr_regrid::math::locate::HorizontalLocator;
use hrrr_regrid::regrid::{
    band_statistics, compare_fields, regrid_all_bands, regrid_band, regrid_band_with_threads,
};
use hrrr_regrid::synthetic;
use hrrr_regrid::RegridError;
use ndarray::{arr1, arr2, s, Array3};

// The reference scenario: 2x2 horizontal nodes at lat {0,1} x lon {0,1},
// flat height levels at 0 and 100 m, u counting 1..8 across the corners.
fn cube_volume() -> SourceVolume {
    let lats = arr2(&[[0.0, 0.0], [1.0, 1.0]]);
    let lons = arr2(&[[0.0, 1.0], [0.0, 1.0]]);
    let grid = SourceGrid::new(lats, lons).unwrap();

    let mut heights = Array3::zeros((2, 2, 2));
    heights.slice_mut(s![1, .., ..]).fill(100.0);

    let mut u = Array3::zeros((2, 2, 2));
    u[[0, 0, 0]] = 1.0;
    u[[0, 0, 1]] = 2.0;
    u[[0, 1, 0]] = 3.0;
    u[[0, 1, 1]] = 4.0;
    u[[1, 0, 0]] = 5.0;
    u[[1, 0, 1]] = 6.0;
    u[[1, 1, 0]] = 7.0;
    u[[1, 1, 1]] = 8.0;

    let mut volume = SourceVolume::new(grid, heights).unwrap();
    volume.add_field(SourceField::new("u", "m s-1", u)).unwrap();
    volume
}

#[test]
fn test_end_to_end_cube_scenario() {
    let volume = cube_volume();
    let band = BandGrid::new(Band::Low, arr1(&[0.5]), arr1(&[0.5]), arr1(&[50.0]));
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let u = &output["u"];
    assert_eq!(u.dim(), (1, 1, 1));
    // all three weights are exactly 0.5, so the result is the corner mean
    assert!((u[[0, 0, 0]] - 4.5).abs() < 1e-12);
}

#[test]
fn test_shape_contract_regardless_of_out_of_domain_points() {
    let volume = cube_volume();
    let band = BandGrid::new(
        Band::Mid,
        arr1(&[0.0, 0.25, 0.5, 0.75, 1.0]),
        arr1(&[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]),
        arr1(&[25.0, 50.0, 75.0, 150.0]),
    );
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let u = &output["u"];
    assert_eq!(u.dim(), (4, 5, 6));
    // the 150 m level is above every column's range: entirely NaN
    assert!(u.slice(s![3, .., ..]).iter().all(|v| v.is_nan()));
    // the in-range levels are entirely finite
    assert!(u.slice(s![..3, .., ..]).iter().all(|v| v.is_finite()));
}

#[test]
fn test_horizontal_out_of_envelope_yields_nan() {
    let volume = cube_volume();
    let band = BandGrid::new(
        Band::Low,
        arr1(&[-0.5, 0.5]),
        arr1(&[0.5]),
        arr1(&[50.0]),
    );
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let u = &output["u"];
    assert!(u[[0, 0, 0]].is_nan());
    assert!(u[[0, 1, 0]].is_finite());
}

#[test]
fn test_vertical_bounds_are_column_local() {
    // column at lon 0 reaches 900 m, column at lon 10 only 400 m
    let lats = arr2(&[[0.0, 0.0], [1.0, 1.0]]);
    let lons = arr2(&[[0.0, 10.0], [0.0, 10.0]]);
    let grid = SourceGrid::new(lats, lons).unwrap();

    let mut heights = Array3::zeros((2, 2, 2));
    heights[[1, 0, 0]] = 900.0;
    heights[[1, 1, 0]] = 900.0;
    heights[[1, 0, 1]] = 400.0;
    heights[[1, 1, 1]] = 400.0;

    let u = Array3::from_elem((2, 2, 2), 2.5);
    let mut volume = SourceVolume::new(grid, heights).unwrap();
    volume.add_field(SourceField::new("u", "m s-1", u)).unwrap();

    let band = BandGrid::new(
        Band::High,
        arr1(&[0.5]),
        arr1(&[0.0, 10.0]),
        arr1(&[600.0]),
    );
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let u = &output["u"];
    // 600 m is inside the 900 m column but above the 400 m column
    assert!(u[[0, 0, 0]].is_finite());
    assert!(u[[0, 0, 1]].is_nan());
}

#[test]
fn test_unknown_field_rejected_before_computation() {
    let volume = cube_volume();
    let band = BandGrid::new(Band::Low, arr1(&[0.5]), arr1(&[0.5]), arr1(&[50.0]));
    let result = regrid_band(&volume, &band, &["q"], HorizontalLocator::Curvilinear);
    assert!(matches!(result, Err(RegridError::UnknownField(_))));
}

#[test]
fn test_empty_field_list_rejected() {
    let volume = cube_volume();
    let band = BandGrid::new(Band::Low, arr1(&[0.5]), arr1(&[0.5]), arr1(&[50.0]));
    let result = regrid_band(&volume, &band, &[], HorizontalLocator::Curvilinear);
    assert!(matches!(result, Err(RegridError::EmptyFieldList)));
}

#[test]
fn test_regrid_all_bands_keys_and_shapes() {
    let constants = Constants::default();
    let volume = synthetic::synthetic_volume(8, 5, 5, &constants).unwrap();
    let configs = vec![
        BandConfig {
            band: Band::Low,
            n_levels: 4,
            n_lat: 6,
            n_lon: 5,
            alt_min: 180.0,
            alt_max: 320.0,
        },
        BandConfig {
            band: Band::Mid,
            n_levels: 3,
            n_lat: 4,
            n_lon: 4,
            alt_min: 370.0,
            alt_max: 470.0,
        },
        BandConfig {
            band: Band::High,
            n_levels: 2,
            n_lat: 3,
            n_lon: 3,
            alt_min: 570.0,
            alt_max: 870.0,
        },
    ];
    let bands: Vec<BandGrid> = configs
        .iter()
        .map(|c| BandGrid::from_config(c, &constants))
        .collect();
    let outputs = regrid_all_bands(&volume, &bands, &["u", "v"], HorizontalLocator::Curvilinear)
        .unwrap();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[&Band::Low]["u"].dim(), (4, 6, 5));
    assert_eq!(outputs[&Band::Mid]["v"].dim(), (3, 4, 4));
    assert_eq!(outputs[&Band::High]["u"].dim(), (2, 3, 3));
}

#[test]
fn test_synthetic_linear_field_is_reproduced_exactly() {
    let constants = Constants::default();
    let volume = synthetic::synthetic_volume(8, 9, 9, &constants).unwrap();
    let config = BandConfig {
        band: Band::Mid,
        n_levels: 3,
        n_lat: 47,
        n_lon: 43,
        alt_min: 370.0,
        alt_max: 470.0,
    };
    let band = BandGrid::from_config(&config, &constants);
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let u = &output["u"];

    let (n_alt, n_lat, n_lon) = band.shape();
    let expected = Array3::from_shape_fn((n_alt, n_lat, n_lon), |(k, _, _)| {
        synthetic::u_at_height(band.altitudes[k])
    });
    let diff = compare_fields(u, &expected).unwrap();
    assert_eq!(diff.skipped, 0, "no point should fall outside the domain");
    assert!(diff.max_abs < 1e-9, "max deviation {}", diff.max_abs);
}

#[test]
fn test_rectilinear_locator_matches_curvilinear_through_regrid() {
    let constants = Constants::default();
    let volume = synthetic::synthetic_volume(6, 7, 7, &constants).unwrap();
    let band = BandGrid::new(
        Band::Low,
        arr1(&[constants.lat_min, (constants.lat_min + constants.lat_max) / 2.0]),
        arr1(&[constants.lon_min, (constants.lon_min + constants.lon_max) / 2.0]),
        arr1(&[200.0, 300.0]),
    );
    let a = regrid_band(&volume, &band, &["v"], HorizontalLocator::Curvilinear).unwrap();
    let b = regrid_band(&volume, &band, &["v"], HorizontalLocator::Rectilinear).unwrap();
    let diff = compare_fields(&a["v"], &b["v"]).unwrap();
    assert_eq!(diff.skipped, 0);
    assert!(diff.max_abs < 1e-12);
}

#[test]
fn test_regrid_with_custom_thread_pool() {
    let volume = cube_volume();
    let band = BandGrid::new(
        Band::Low,
        arr1(&[0.25, 0.75]),
        arr1(&[0.25, 0.75]),
        arr1(&[10.0, 90.0]),
    );
    let serial = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let pooled =
        regrid_band_with_threads(&volume, &band, &["u"], HorizontalLocator::Curvilinear, 2)
            .unwrap();
    let diff = compare_fields(&serial["u"], &pooled["u"]).unwrap();
    assert_eq!(diff.max_abs, 0.0);
}

#[test]
fn test_band_statistics_report_nan_coverage() {
    let volume = cube_volume();
    // two altitudes in range, two above every column
    let band = BandGrid::new(
        Band::Low,
        arr1(&[0.25, 0.75]),
        arr1(&[0.5]),
        arr1(&[25.0, 75.0, 200.0, 300.0]),
    );
    let output = regrid_band(&volume, &band, &["u"], HorizontalLocator::Curvilinear).unwrap();
    let stats = band_statistics(&output);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].name, "u");
    assert_eq!(stats[0].total, 8);
    assert_eq!(stats[0].nan_count, 4);
    assert!((stats[0].nan_fraction() - 0.5).abs() < 1e-12);
}
