//! Day/night terminator polygon construction.
//!
//! For each sampled longitude the terminator latitude is the latitude at which
//! the Sun sits exactly on the horizon. The samples, swept from -180° to 180°,
//! are closed off along the pole that is in night, so the polygon covers the
//! dark side of the planet in an equirectangular projection.

use aether_astro::{GeoPoint, SolarEquatorialPosition, SunSnapshot, UtcInstant, normalize_longitude};
use serde::{Deserialize, Serialize};

use crate::error::TerminatorError;

/// Samples per degree of longitude used when nothing else is configured.
pub const DEFAULT_RESOLUTION: u32 = 2;

/// Options for building a terminator polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminatorOptions {
    /// Samples per degree of longitude. Must be at least 1.
    pub resolution: u32,
}

impl Default for TerminatorOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl TerminatorOptions {
    pub fn with_resolution(resolution: u32) -> Self {
        Self { resolution }
    }

    pub fn validate(&self) -> Result<(), TerminatorError> {
        if self.resolution == 0 {
            return Err(TerminatorError::InvalidResolution(self.resolution));
        }
        Ok(())
    }

    /// Number of longitude samples: `360 * resolution + 1`.
    pub fn sample_count(&self) -> usize {
        360 * self.resolution as usize + 1
    }
}

/// A point on the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminatorSample {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl TerminatorSample {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lon_deg, self.lat_deg)
    }
}

/// Latitude in degrees at which the Sun is on the horizon for `hour_angle_rad`.
///
/// Saturates towards ±90° as the declination approaches zero and yields NaN
/// when both the declination and `cos(hour_angle)` are exactly zero.
pub fn latitude_of_terminator(hour_angle_rad: f64, equatorial: &SolarEquatorialPosition) -> f64 {
    (-hour_angle_rad.cos() / equatorial.declination_rad.tan())
        .atan()
        .to_degrees()
}

/// Raw latitude-per-longitude table, `360 * resolution + 1` entries.
///
/// Longitudes are derived from the integer index so the sweep is exact at both
/// ends. Samples are returned as computed, NaN included.
pub fn sample_terminator(sun: &SunSnapshot, resolution: u32) -> Vec<TerminatorSample> {
    let steps = 360 * resolution as usize;
    let resolution = f64::from(resolution);

    (0..=steps)
        .map(|i| {
            let lon_deg = -180.0 + i as f64 / resolution;
            let ha = sun.hour_angle(lon_deg);
            TerminatorSample {
                lon_deg,
                lat_deg: latitude_of_terminator(ha, &sun.equatorial),
            }
        })
        .collect()
}

/// The pole used to close the polygon: always the one in night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosingPole {
    North,
    South,
}

impl ClosingPole {
    /// Sun south of the equator puts the north pole in night, and vice versa.
    /// A declination of exactly zero closes at the south pole.
    pub fn for_declination(declination_rad: f64) -> Self {
        if declination_rad < 0.0 {
            ClosingPole::North
        } else {
            ClosingPole::South
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            ClosingPole::North => 90.0,
            ClosingPole::South => -90.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClosingPole::North => "north",
            ClosingPole::South => "south",
        }
    }
}

/// Night-side polygon for one instant.
///
/// Recomputed from scratch for every instant and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminatorPolygon {
    pub instant: UtcInstant,
    pub resolution: u32,
    pub declination_deg: f64,
    pub closing_pole: ClosingPole,
    /// Terminator samples from -180° to 180°, all finite.
    pub samples: Vec<TerminatorSample>,
}

/// Build the night polygon for `instant`.
pub fn build_terminator_polygon(
    instant: UtcInstant,
    options: &TerminatorOptions,
) -> Result<TerminatorPolygon, TerminatorError> {
    options.validate()?;

    let sun = SunSnapshot::at(instant);
    let mut samples = sample_terminator(&sun, options.resolution);

    let patched = patch_non_finite(&mut samples).ok_or(TerminatorError::Degenerate { instant })?;
    if patched > 0 {
        log::warn!("terminator at {instant}: replaced {patched} non-finite latitude samples");
    }

    let closing_pole = ClosingPole::for_declination(sun.equatorial.declination_rad);
    log::debug!(
        "terminator at {instant}: declination {:.4}°, {} samples, closing at {} pole",
        sun.declination_deg(),
        samples.len(),
        closing_pole.as_str()
    );

    Ok(TerminatorPolygon {
        instant,
        resolution: options.resolution,
        declination_deg: sun.declination_deg(),
        closing_pole,
        samples,
    })
}

/// Replace non-finite latitudes with the previous finite one; a leading run
/// takes the first finite value. Returns the number of replaced samples, or
/// `None` when no sample is finite.
fn patch_non_finite(samples: &mut [TerminatorSample]) -> Option<usize> {
    let first_finite = samples.iter().find(|s| s.lat_deg.is_finite())?.lat_deg;

    let mut previous = first_finite;
    let mut patched = 0;
    for sample in samples.iter_mut() {
        if sample.lat_deg.is_finite() {
            previous = sample.lat_deg;
        } else {
            sample.lat_deg = previous;
            patched += 1;
        }
    }
    Some(patched)
}

impl TerminatorPolygon {
    /// Vertices including the two pole corners.
    pub fn vertex_count(&self) -> usize {
        self.samples.len() + 2
    }

    /// `[lat, lng]` vertex pairs for a map polygon primitive: pole corner at
    /// -180°, the samples, pole corner at 180°.
    pub fn lat_lngs(&self) -> Vec<[f64; 2]> {
        let pole = self.closing_pole.latitude();
        let mut out = Vec::with_capacity(self.vertex_count());
        out.push([pole, -180.0]);
        out.extend(self.samples.iter().map(|s| [s.lat_deg, s.lon_deg]));
        out.push([pole, 180.0]);
        out
    }

    /// Closed `[lng, lat]` ring: first vertex repeated at the end.
    pub fn ring(&self) -> Vec<GeoPoint> {
        let pole = self.closing_pole.latitude();
        let mut out = Vec::with_capacity(self.vertex_count() + 1);
        out.push(GeoPoint::new(-180.0, pole));
        out.extend(self.samples.iter().map(TerminatorSample::point));
        out.push(GeoPoint::new(180.0, pole));
        out.push(GeoPoint::new(-180.0, pole));
        out
    }

    /// Even-odd test in the equirectangular plane.
    ///
    /// Points exactly on an edge may land on either side.
    pub fn contains(&self, point: GeoPoint) -> bool {
        let ring = self.ring();
        let (x, y) = (point.lon_deg, point.lat_deg);

        let mut inside = false;
        for edge in ring.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            if (a.lat_deg > y) != (b.lat_deg > y) {
                let x_cross =
                    a.lon_deg + (y - a.lat_deg) * (b.lon_deg - a.lon_deg) / (b.lat_deg - a.lat_deg);
                if x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Whether `point` is on the night side, at the polygon's sampling
    /// resolution. Longitude is wrapped first.
    pub fn is_night(&self, point: GeoPoint) -> bool {
        self.contains(GeoPoint::new(normalize_longitude(point.lon_deg), point.lat_deg))
    }
}
