use clap::{value_parser, Arg, ArgMatches, Command};
use ndarray::Array3;
use rand::Rng;

use hrrr_regrid::{
    config::Config,
    grid::{BandGrid, SourceField, TargetPoint},
    math::locate::{nearest_cell, HorizontalLocator},
    math::physics::{haversine_distance, wind_direction, wind_speed},
    regrid::{
        band_statistics, compare_fields, regrid_band, regrid_band_monitored,
        regrid_band_with_threads, PointSampler, ProgressMonitor,
    },
    synthetic,
};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("sample", sub_matches)) => {
            if let Err(e) = run_sample(sub_matches) {
                eprintln!("Sample error: {}", e);
                std::process::exit(1);
            }
        }
        Some(("regrid", sub_matches)) => {
            if let Err(e) = run_regrid(sub_matches) {
                eprintln!("Regrid error: {}", e);
                std::process::exit(1);
            }
        }
        Some(("check", sub_matches)) => {
            if let Err(e) = run_check(sub_matches) {
                eprintln!("Profile check error: {}", e);
                std::process::exit(1);
            }
        }
        _ => {
            eprintln!("Please specify a subcommand. Use --help for more information.");
            std::process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    let levels_arg = Arg::new("levels")
        .long("levels")
        .value_name("COUNT")
        .help("Number of synthetic model levels")
        .value_parser(value_parser!(usize))
        .default_value("8");
    let locator_arg = Arg::new("locator")
        .long("locator")
        .value_name("METHOD")
        .help("Horizontal cell-location strategy")
        .value_parser(["curvilinear", "rectilinear"])
        .default_value("curvilinear");

    Command::new("hrrr-regrid")
        .version("0.1.0")
        .about("Regrid HRRR native-level wind fields onto the CFD domain lattices")
        .subcommand(
            Command::new("sample")
                .about("Interpolate all fields at one target point of a synthetic volume")
                .arg(
                    Arg::new("lat")
                        .long("lat")
                        .value_name("DEGREES")
                        .help("Target latitude (random within the domain if omitted)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("lon")
                        .long("lon")
                        .value_name("DEGREES")
                        .help("Target longitude (random within the domain if omitted)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .value_name("METERS")
                        .help("Target altitude (random in 0-870 m if omitted)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(levels_arg.clone())
                .arg(locator_arg.clone()),
        )
        .subcommand(
            Command::new("regrid")
                .about("Regrid a synthetic volume onto the configured band lattices")
                .arg(
                    Arg::new("band")
                        .long("band")
                        .value_name("BAND")
                        .help("Altitude band to regrid")
                        .value_parser(["low", "mid", "high", "all"])
                        .default_value("all"),
                )
                .arg(
                    Arg::new("fields")
                        .long("fields")
                        .value_name("LIST")
                        .help("Comma-separated field variables")
                        .default_value("u,v,w"),
                )
                .arg(
                    Arg::new("num-threads")
                        .short('j')
                        .long("num-threads")
                        .value_name("COUNT")
                        .help("Number of parallel threads (0 = rayon default)")
                        .value_parser(value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    Arg::new("cycle")
                        .long("cycle")
                        .value_name("DATETIME")
                        .help("Model cycle time (YYYY-MM-DD HH:MM:SS)"),
                )
                .arg(
                    Arg::new("forecast-hour")
                        .short('f')
                        .long("forecast-hour")
                        .value_name("HOURS")
                        .help("Forecast lead hour")
                        .value_parser(value_parser!(u32))
                        .default_value("2"),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .help("Report per-level progress")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(levels_arg.clone())
                .arg(locator_arg.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Inspect synthetic gh profiles for non-monotonic columns")
                .arg(
                    Arg::new("jitter")
                        .long("jitter")
                        .value_name("METERS")
                        .help("Random gh perturbation amplitude")
                        .value_parser(value_parser!(f64))
                        .default_value("0.0"),
                )
                .arg(
                    Arg::new("columns")
                        .long("columns")
                        .value_name("COUNT")
                        .help("Number of random columns to report")
                        .value_parser(value_parser!(usize))
                        .default_value("5"),
                )
                .arg(levels_arg),
        )
}

fn parse_locator(matches: &ArgMatches) -> Result<HorizontalLocator, String> {
    let name = matches.get_one::<String>("locator").unwrap();
    HorizontalLocator::from_name(name).ok_or_else(|| format!("Unknown locator: {}", name))
}

fn run_sample(matches: &ArgMatches) -> Result<(), String> {
    let config = Config::default();
    let nlev = *matches.get_one::<usize>("levels").unwrap();
    let locator = parse_locator(matches)?;
    let volume =
        synthetic::synthetic_volume(nlev, 9, 9, &config.constants).map_err(|e| e.to_string())?;

    let mut rng = rand::thread_rng();
    let env = *volume.grid.envelope();
    let lat = matches
        .get_one::<f64>("lat")
        .copied()
        .unwrap_or_else(|| rng.gen_range(env.lat_min..env.lat_max));
    let lon = matches
        .get_one::<f64>("lon")
        .copied()
        .unwrap_or_else(|| rng.gen_range(env.lon_min..env.lon_max));
    let height = matches
        .get_one::<f64>("height")
        .copied()
        .unwrap_or_else(|| rng.gen_range(0.0..870.0));
    let point = TargetPoint { lat, lon, height };

    println!(
        "Target point: lat={:.6}, lon={:.6}, height={:.1} m",
        point.lat, point.lon, point.height
    );
    let (i_c, j_c) = nearest_cell(
        volume.grid.lats.view(),
        volume.grid.lons.view(),
        point.lat,
        point.lon,
    );
    let node_distance = haversine_distance(
        point.lat,
        point.lon,
        volume.grid.lats[[i_c, j_c]],
        volume.grid.lons[[i_c, j_c]],
        config.constants.earth_radius,
    );
    println!(
        "Nearest grid column: ({}, {}), {:.1} m away, profile {}",
        i_c,
        j_c,
        node_distance,
        volume.profile_stats(i_c, j_c)
    );

    let sampler = PointSampler::new(&volume, locator);
    let fields: Vec<&SourceField> = volume.fields().iter().collect();
    let values = sampler.sample_fields(&point, &fields);
    println!("Interpolated values:");
    for (field, value) in fields.iter().zip(&values) {
        println!("  {} = {:.4} {}", field.name, value, field.units);
    }

    let u = field_value(&fields, &values, "u");
    let v = field_value(&fields, &values, "v");
    if let (Some(u), Some(v)) = (u, v) {
        if u.is_finite() && v.is_finite() {
            println!(
                "Horizontal wind: speed {:.4} m/s, direction {:.1} deg",
                wind_speed(u, v),
                wind_direction(u, v)
            );
        } else {
            println!("Point is outside the source domain; all values are NaN");
        }
    }
    Ok(())
}

fn field_value(fields: &[&SourceField], values: &[f64], name: &str) -> Option<f64> {
    fields
        .iter()
        .position(|f| f.name == name)
        .map(|idx| values[idx])
}

fn run_regrid(matches: &ArgMatches) -> Result<(), String> {
    let mut config = Config::default();
    config.fields = matches
        .get_one::<String>("fields")
        .unwrap()
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();
    if let Some(cycle) = matches.get_one::<String>("cycle") {
        config.cycle = Config::parse_datetime(cycle)?;
    }
    config.forecast_hour = *matches.get_one::<u32>("forecast-hour").unwrap();
    config.num_threads = *matches.get_one::<usize>("num-threads").unwrap();
    config.verbose = matches.get_flag("verbose");
    config.locator = parse_locator(matches)?;
    config.validate()?;

    let nlev = *matches.get_one::<usize>("levels").unwrap();
    let volume =
        synthetic::synthetic_volume(nlev, 9, 9, &config.constants).map_err(|e| e.to_string())?;

    let band_sel = matches.get_one::<String>("band").unwrap();
    let bands: Vec<BandGrid> = config
        .bands
        .iter()
        .filter(|b| band_sel == "all" || b.band.as_str() == band_sel)
        .map(|b| BandGrid::from_config(b, &config.constants))
        .collect();
    if bands.is_empty() {
        return Err(format!("No configured band matches {}", band_sel));
    }

    let field_names: Vec<&str> = config.fields.iter().map(String::as_str).collect();
    println!("Regridding {}", config.output_label());

    for band in &bands {
        let (n_alt, n_lat, n_lon) = band.shape();
        println!(
            "Band {}: {} x {} x {} = {} target points",
            band.band,
            n_alt,
            n_lat,
            n_lon,
            band.n_points()
        );
        let output = if config.verbose {
            let monitor = ProgressMonitor::new(n_alt);
            regrid_band_monitored(&volume, band, &field_names, config.locator, &monitor)
        } else if config.num_threads > 0 {
            regrid_band_with_threads(
                &volume,
                band,
                &field_names,
                config.locator,
                config.num_threads,
            )
        } else {
            regrid_band(&volume, band, &field_names, config.locator)
        }
        .map_err(|e| e.to_string())?;

        for stats in band_statistics(&output) {
            println!("  {}", stats);
        }
        if let Some(u_out) = output.get("u") {
            let expected = Array3::from_shape_fn((n_alt, n_lat, n_lon), |(k, _, _)| {
                synthetic::u_at_height(band.altitudes[k])
            });
            let diff = compare_fields(u_out, &expected).map_err(|e| e.to_string())?;
            println!("  u vs analytic profile: {}", diff);
        }
    }
    Ok(())
}

fn run_check(matches: &ArgMatches) -> Result<(), String> {
    let config = Config::default();
    let nlev = *matches.get_one::<usize>("levels").unwrap();
    let jitter = *matches.get_one::<f64>("jitter").unwrap();
    let columns = *matches.get_one::<usize>("columns").unwrap();

    let mut volume =
        synthetic::synthetic_volume(nlev, 9, 9, &config.constants).map_err(|e| e.to_string())?;
    let mut rng = rand::thread_rng();
    if jitter > 0.0 {
        for gh in volume.heights.iter_mut() {
            *gh += rng.gen_range(-jitter..jitter);
        }
    }

    let (nlat, nlon) = (volume.grid.nlat(), volume.grid.nlon());
    println!(
        "Sampling {} random gh profiles ({} levels, jitter {:.1} m):",
        columns, nlev, jitter
    );
    let mut flagged = 0;
    for _ in 0..columns {
        let i = rng.gen_range(0..nlat);
        let j = rng.gen_range(0..nlon);
        let stats = volume.profile_stats(i, j);
        println!("  column ({}, {}): {}", i, j, stats);
        if stats.inversions > 0 {
            flagged += 1;
        }
    }
    if flagged > 0 {
        println!(
            "{} of {} sampled columns are non-monotonic; nearest-level bracketing may misbehave there",
            flagged, columns
        );
    } else {
        println!("All sampled columns are monotonic");
    }
    Ok(())
}
