use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::grid::Band;
use crate::math::locate::HorizontalLocator;

/// Physical constants and fixed domain parameters.
#[derive(Clone, Debug)]
pub struct Constants {
    /// Gravitational acceleration (m/s²)
    pub g: f64,
    /// Gas constant for dry air (J/(kg·K))
    pub r_dry: f64,
    /// Earth's radius (m)
    pub earth_radius: f64,

    // Target domain bounding box (degrees), matching the CFD domain extent
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            g: 9.81,
            r_dry: 287.05,
            earth_radius: 6_371_000.0,

            // CFD domain bounding box, Elizabethtown TX
            lat_min: 33.015_998_840_429_69,
            lat_max: 33.036_788_940_429_69,
            lon_min: -97.283_996_582_031_25,
            lon_max: -97.261_352_539_062_5,
        }
    }
}

/// Target lattice definition for one altitude band.
#[derive(Clone, Debug)]
pub struct BandConfig {
    pub band: Band,
    /// Number of target altitude levels
    pub n_levels: usize,
    /// Number of target latitude points
    pub n_lat: usize,
    /// Number of target longitude points
    pub n_lon: usize,
    /// Lowest target altitude (m)
    pub alt_min: f64,
    /// Highest target altitude (m)
    pub alt_max: f64,
}

impl BandConfig {
    /// Band definitions matching the CFD domain's vertical partitioning.
    pub fn defaults() -> Vec<BandConfig> {
        vec![
            BandConfig {
                band: Band::Low,
                n_levels: 15,
                n_lat: 231,
                n_lon: 211,
                alt_min: 180.0,
                alt_max: 320.0,
            },
            BandConfig {
                band: Band::Mid,
                n_levels: 3,
                n_lat: 47,
                n_lon: 43,
                alt_min: 370.0,
                alt_max: 470.0,
            },
            BandConfig {
                band: Band::High,
                n_levels: 4,
                n_lat: 24,
                n_lon: 22,
                alt_min: 570.0,
                alt_max: 870.0,
            },
        ]
    }
}

/// Run configuration for a regrid pass.
#[derive(Clone, Debug)]
pub struct Config {
    /// Physical constants and domain extent
    pub constants: Constants,
    /// Altitude band lattice definitions
    pub bands: Vec<BandConfig>,
    /// Field variables to regrid
    pub fields: Vec<String>,
    /// Horizontal cell-location strategy
    pub locator: HorizontalLocator,
    /// Location tag used in the output label
    pub location_tag: String,
    /// Model cycle time (analysis time of the forecast run)
    pub cycle: DateTime<Utc>,
    /// Forecast lead hour
    pub forecast_hour: u32,
    /// Number of parallel threads (0 = rayon default)
    pub num_threads: usize,
    /// Verbose output
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            constants: Constants::default(),
            bands: BandConfig::defaults(),
            fields: vec!["u".to_string(), "v".to_string(), "w".to_string()],
            locator: HorizontalLocator::Curvilinear,
            location_tag: String::from("usa-tx-elizabethtown"),
            cycle: default_cycle(),
            forecast_hour: 2,
            num_threads: 0,
            verbose: false,
        }
    }
}

// 2023-02-14 13:00 UTC, the reference cycle of the archived test case
fn default_cycle() -> DateTime<Utc> {
    DateTime::from_timestamp(1_676_379_600, 0).unwrap_or_else(Utc::now)
}

impl Config {
    /// Parse datetime string in format "YYYY-MM-DD HH:MM:SS"
    pub fn parse_datetime(datetime_str: &str) -> Result<DateTime<Utc>, String> {
        NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
            .map_err(|_| {
                format!(
                    "Invalid datetime format: {}. Expected: YYYY-MM-DD HH:MM:SS",
                    datetime_str
                )
            })
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
    }

    /// Forecast valid time (cycle + lead hour).
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.cycle + Duration::hours(self.forecast_hour as i64)
    }

    /// Label identifying the regridded dataset, consumed by downstream
    /// writers for file naming.
    pub fn output_label(&self) -> String {
        format!(
            "hrrr-regrid_{}_{}_f{:02}",
            self.location_tag,
            self.valid_time().format("%Y-%m-%dT%H-%M-%S"),
            self.forecast_hour
        )
    }

    /// Lattice definition for one band, if configured.
    pub fn band_config(&self, band: Band) -> Option<&BandConfig> {
        self.bands.iter().find(|b| b.band == band)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.constants.lat_min >= self.constants.lat_max {
            return Err("Domain latitude range is empty".to_string());
        }
        if self.constants.lon_min >= self.constants.lon_max {
            return Err("Domain longitude range is empty".to_string());
        }
        if self.fields.is_empty() {
            return Err("At least one field must be requested".to_string());
        }
        if self.bands.is_empty() {
            return Err("At least one altitude band must be configured".to_string());
        }
        for band in &self.bands {
            if band.n_levels == 0 || band.n_lat == 0 || band.n_lon == 0 {
                return Err(format!(
                    "Band {} has an empty target lattice",
                    band.band.as_str()
                ));
            }
            if band.alt_min > band.alt_max {
                return Err(format!(
                    "Band {} altitude range is inverted: {} > {}",
                    band.band.as_str(),
                    band.alt_min,
                    band.alt_max
                ));
            }
        }
        // HRRR runs extend to 48 hours at most
        if self.forecast_hour > 48 {
            return Err(format!(
                "Forecast hour {} exceeds the 48 h HRRR horizon",
                self.forecast_hour
            ));
        }
        Ok(())
    }

    /// Create a Config for testing purposes (bypasses CLI parsing)
    #[cfg(test)]
    pub fn for_testing(fields: Vec<String>) -> Result<Self, String> {
        let config = Self {
            fields,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_band_defaults_cover_all_bands() {
        let config = Config::default();
        for band in Band::ALL {
            assert!(config.band_config(band).is_some());
        }
        let low = config.band_config(Band::Low).unwrap();
        assert_eq!(low.n_levels, 15);
        assert_eq!((low.n_lat, low.n_lon), (231, 211));
    }

    #[test]
    fn test_output_label() {
        let config = Config::default();
        assert_eq!(
            config.output_label(),
            "hrrr-regrid_usa-tx-elizabethtown_2023-02-14T15-00-00_f02"
        );
    }

    #[test]
    fn test_validation_rejects_empty_fields() {
        let result = Config::for_testing(Vec::new());
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("At least one field"));
    }

    #[test]
    fn test_validation_rejects_long_lead() {
        let config = Config {
            forecast_hour: 60,
            ..Config::default()
        };
        assert!(config.validate().unwrap_err().contains("48 h"));
    }

    #[test]
    fn test_parse_datetime_roundtrip() {
        let dt = Config::parse_datetime("2023-02-14 13:00:00").unwrap();
        assert_eq!(dt, default_cycle());
        assert!(Config::parse_datetime("14/02/2023").is_err());
    }
}
