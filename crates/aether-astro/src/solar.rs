//! Low-precision solar position: ecliptic longitude, obliquity, equatorial
//! coordinates, Greenwich sidereal time and hour angle.
//!
//! Angles handed to and returned from callers are in degrees, except the
//! equatorial coordinates and hour angles, which stay in radians because they
//! feed straight back into trigonometry. Accuracy is on the order of 0.01°,
//! plenty for drawing a day/night boundary on a map.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::instant::UtcInstant;

/// GMST at J2000.0, in hours.
const GMST_J2000_HOURS: f64 = 18.697_374_558;
/// Sidereal hours gained per solar day.
const GMST_HOURS_PER_DAY: f64 = 24.065_709_824_419_08;

/// Sun's position in the ecliptic plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEclipticPosition {
    /// Apparent ecliptic longitude λ in degrees.
    pub ecliptic_longitude_deg: f64,
    /// Earth-Sun distance R in astronomical units.
    pub radius_vector_au: f64,
}

/// Sun's position in the equatorial frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarEquatorialPosition {
    /// Right ascension α in radians, in (-π, π].
    pub right_ascension_rad: f64,
    /// Declination δ in radians.
    pub declination_rad: f64,
}

impl SolarEquatorialPosition {
    pub fn declination_deg(&self) -> f64 {
        self.declination_rad.to_degrees()
    }

    pub fn right_ascension_deg(&self) -> f64 {
        self.right_ascension_rad.to_degrees()
    }
}

/// Mean anomaly `g` in degrees, normalized to [0, 360).
fn mean_anomaly_deg(n: f64) -> f64 {
    (357.528 + 0.985_600_3 * n).rem_euclid(360.0)
}

/// Mean longitude `L` in degrees, normalized to [0, 360).
fn mean_longitude_deg(n: f64) -> f64 {
    (280.460 + 0.985_647_4 * n).rem_euclid(360.0)
}

/// Sun's ecliptic longitude and radius vector at `instant`.
///
/// Both values derive from the same mean anomaly of the supplied instant.
pub fn solar_ecliptic_position(instant: &UtcInstant) -> SolarEclipticPosition {
    let n = instant.days_since_j2000();
    let l = mean_longitude_deg(n);
    let g = mean_anomaly_deg(n).to_radians();

    let lambda = l + 1.915 * g.sin() + 0.020 * (2.0 * g).sin();
    let r = 1.000_14 - 0.016_71 * g.cos() - 0.000_14 * (2.0 * g).cos();

    SolarEclipticPosition {
        ecliptic_longitude_deg: lambda,
        radius_vector_au: r,
    }
}

/// Obliquity of the ecliptic ε in degrees.
pub fn obliquity_deg(instant: &UtcInstant) -> f64 {
    let t = instant.centuries_since_j2000();
    23.439_291_11 - 46.8150 / 3600.0 * t - 0.000_59 / 3600.0 * t * t
        + 0.001_813 / 3600.0 * t * t * t
}

/// Project an ecliptic longitude onto the equatorial frame.
///
/// `lambda_deg` and `epsilon_deg` are in degrees; the result is in radians.
pub fn equatorial_position(lambda_deg: f64, epsilon_deg: f64) -> SolarEquatorialPosition {
    let lambda = lambda_deg.to_radians();
    let epsilon = epsilon_deg.to_radians();

    let alpha = (epsilon.cos() * lambda.sin()).atan2(lambda.cos());
    let delta = (epsilon.sin() * lambda.sin()).clamp(-1.0, 1.0).asin();

    SolarEquatorialPosition {
        right_ascension_rad: alpha,
        declination_rad: delta,
    }
}

/// Greenwich mean sidereal time in hours, in [0, 24).
pub fn greenwich_sidereal_hours(instant: &UtcInstant) -> f64 {
    let d = instant.days_since_j2000();
    (GMST_J2000_HOURS + GMST_HOURS_PER_DAY * d).rem_euclid(24.0)
}

/// Hour angle of the Sun at `longitude_deg`, in radians.
pub fn hour_angle(
    longitude_deg: f64,
    equatorial: &SolarEquatorialPosition,
    sidereal_hours: f64,
) -> f64 {
    let lst = sidereal_hours + longitude_deg / 15.0;
    lst * 15.0 * PI / 180.0 - equatorial.right_ascension_rad
}

/// Everything needed to evaluate the Sun's geometry at one instant.
///
/// Computed once per instant; all derived quantities share the same `instant`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunSnapshot {
    pub instant: UtcInstant,
    pub ecliptic: SolarEclipticPosition,
    pub obliquity_deg: f64,
    pub equatorial: SolarEquatorialPosition,
    pub sidereal_hours: f64,
}

impl SunSnapshot {
    pub fn at(instant: UtcInstant) -> Self {
        let ecliptic = solar_ecliptic_position(&instant);
        let obliquity = obliquity_deg(&instant);
        let equatorial = equatorial_position(ecliptic.ecliptic_longitude_deg, obliquity);
        Self {
            instant,
            ecliptic,
            obliquity_deg: obliquity,
            equatorial,
            sidereal_hours: greenwich_sidereal_hours(&instant),
        }
    }

    pub fn declination_deg(&self) -> f64 {
        self.equatorial.declination_deg()
    }

    /// Hour angle at a longitude, in radians.
    pub fn hour_angle(&self, longitude_deg: f64) -> f64 {
        hour_angle(longitude_deg, &self.equatorial, self.sidereal_hours)
    }

    /// The point where the Sun is at the zenith.
    pub fn subsolar_point(&self) -> GeoPoint {
        subsolar_point(self)
    }

    /// Sun altitude above the horizon at `point`, in degrees. Positive is day.
    pub fn elevation_deg(&self, point: GeoPoint) -> f64 {
        solar_elevation_deg(self, point)
    }
}

/// The sub-solar point: latitude δ, longitude where the hour angle is zero.
pub fn subsolar_point(sun: &SunSnapshot) -> GeoPoint {
    let lon = sun.equatorial.right_ascension_deg() - sun.sidereal_hours * 15.0;
    GeoPoint::new(lon, sun.declination_deg()).normalized()
}

/// Geometric altitude of the Sun's center at `point`, without refraction.
pub fn solar_elevation_deg(sun: &SunSnapshot, point: GeoPoint) -> f64 {
    let phi = point.lat_deg.to_radians();
    let delta = sun.equatorial.declination_rad;
    let ha = sun.hour_angle(point.lon_deg);
    let sin_alt = phi.sin() * delta.sin() + phi.cos() * delta.cos() * ha.cos();
    sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
}
