use std::path::PathBuf;

use clap::Parser;

use geolabel_core::GeoPoint;

#[derive(Debug, Parser)]
#[command(name = "geolabel")]
#[command(about = "Pinpoint a location on a map image and record it with a label")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file (JSON). Defaults to geolabel.json next to the executable.
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Write a default configuration file to the config path and exit.
    #[arg(long)]
    pub(crate) init_config: bool,

    /// Longitude of the location to label, in degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub(crate) lon: Option<f64>,

    /// Latitude of the location to label, in degrees.
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub(crate) lat: Option<f64>,
}

impl Cli {
    /// Session center; [`GeoPoint::UNSET`] when no location was given.
    pub(crate) fn center(&self) -> GeoPoint {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => GeoPoint::new(lon, lat),
            _ => GeoPoint::UNSET,
        }
    }
}
