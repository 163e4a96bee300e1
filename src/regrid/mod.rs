pub mod compare;
pub mod sampler;
pub mod stats;

pub use compare::*;
pub use sampler::*;
pub use stats::*;

use std::collections::HashMap;

use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;

use crate::error::RegridError;
use crate::grid::{Band, BandGrid, SourceField, SourceVolume, TargetPoint};
use crate::math::locate::HorizontalLocator;

/// Regridded output: one dense array per field, shaped like the band's
/// target lattice.
pub type BandOutput = HashMap<String, Array3<f64>>;

/// Evaluate every target point of one band's lattice for the requested
/// fields.
///
/// Returns one `(n_altitude, n_lat, n_lon)` array per field. Entries
/// outside the source domain are NaN; the pass itself never fails for
/// out-of-domain points. Precondition violations (unknown fields, empty
/// request) are rejected before any per-point work. Altitude levels are
/// processed in parallel; target points are independent, so no
/// synchronization is needed beyond collecting the per-level slabs.
pub fn regrid_band(
    volume: &SourceVolume,
    band: &BandGrid,
    field_names: &[&str],
    locator: HorizontalLocator,
) -> Result<BandOutput, RegridError> {
    regrid_band_inner(volume, band, field_names, locator, None)
}

/// Same as [`regrid_band`], reporting per-level progress to a monitor.
pub fn regrid_band_monitored(
    volume: &SourceVolume,
    band: &BandGrid,
    field_names: &[&str],
    locator: HorizontalLocator,
    monitor: &ProgressMonitor,
) -> Result<BandOutput, RegridError> {
    regrid_band_inner(volume, band, field_names, locator, Some(monitor))
}

fn regrid_band_inner(
    volume: &SourceVolume,
    band: &BandGrid,
    field_names: &[&str],
    locator: HorizontalLocator,
    monitor: Option<&ProgressMonitor>,
) -> Result<BandOutput, RegridError> {
    if field_names.is_empty() {
        return Err(RegridError::EmptyFieldList);
    }
    let fields: Vec<&SourceField> = field_names
        .iter()
        .map(|&name| {
            volume
                .get_field(name)
                .ok_or_else(|| RegridError::UnknownField(name.to_string()))
        })
        .collect::<Result<_, _>>()?;

    let sampler = PointSampler::new(volume, locator);
    let (n_alt, n_lat, n_lon) = band.shape();

    let altitudes: Vec<f64> = band.altitudes.iter().copied().collect();
    let level_slabs: Vec<Vec<Array2<f64>>> = altitudes
        .par_iter()
        .map(|&altitude| {
            let mut slabs: Vec<Array2<f64>> = fields
                .iter()
                .map(|_| Array2::from_elem((n_lat, n_lon), f64::NAN))
                .collect();
            for (i, &lat) in band.lats.iter().enumerate() {
                for (j, &lon) in band.lons.iter().enumerate() {
                    let point = TargetPoint {
                        lat,
                        lon,
                        height: altitude,
                    };
                    let values = sampler.sample_fields(&point, &fields);
                    for (f, value) in values.into_iter().enumerate() {
                        slabs[f][[i, j]] = value;
                    }
                }
            }
            if let Some(monitor) = monitor {
                monitor.increment();
            }
            slabs
        })
        .collect();

    let mut output = BandOutput::new();
    for (f, name) in field_names.iter().enumerate() {
        let mut array = Array3::from_elem((n_alt, n_lat, n_lon), f64::NAN);
        for (k, slabs) in level_slabs.iter().enumerate() {
            array.index_axis_mut(Axis(0), k).assign(&slabs[f]);
        }
        output.insert(name.to_string(), array);
    }
    Ok(output)
}

/// Regrid every band of the target domain, keyed by band.
pub fn regrid_all_bands(
    volume: &SourceVolume,
    bands: &[BandGrid],
    field_names: &[&str],
    locator: HorizontalLocator,
) -> Result<HashMap<Band, BandOutput>, RegridError> {
    let mut outputs = HashMap::new();
    for band in bands {
        let output = regrid_band(volume, band, field_names, locator)?;
        outputs.insert(band.band, output);
    }
    Ok(outputs)
}

/// Regrid one band on a dedicated thread pool of the given size.
pub fn regrid_band_with_threads(
    volume: &SourceVolume,
    band: &BandGrid,
    field_names: &[&str],
    locator: HorizontalLocator,
    num_threads: usize,
) -> Result<BandOutput, RegridError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| RegridError::ThreadPool(e.to_string()))?;
    pool.install(|| regrid_band(volume, band, field_names, locator))
}

/// Monitor batch progress across parallel workers.
pub struct ProgressMonitor {
    total_tasks: usize,
    completed_tasks: std::sync::atomic::AtomicUsize,
    start_time: std::time::Instant,
}

impl ProgressMonitor {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            total_tasks,
            completed_tasks: std::sync::atomic::AtomicUsize::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn increment(&self) {
        let completed = self
            .completed_tasks
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            + 1;

        let elapsed = self.start_time.elapsed();
        let rate = completed as f64 / elapsed.as_secs_f64().max(1e-9);
        println!(
            "Progress: {}/{} levels ({:.1}%) - {:.1} levels/s",
            completed,
            self.total_tasks,
            completed as f64 / self.total_tasks as f64 * 100.0,
            rate
        );
    }
}
