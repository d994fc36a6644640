//! Moon illumination and named phase.
//!
//! Uses a low-precision geocentric lunar position (a few tenths of a degree),
//! combined with the solar equatorial position from [`crate::solar`]. Good
//! enough to label the phase, not to predict occultations.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instant::UtcInstant;
use crate::solar::{SolarEquatorialPosition, SunSnapshot};

/// Mean Earth-Sun distance in kilometers.
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

/// Geocentric position of the Moon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonPosition {
    pub right_ascension_rad: f64,
    pub declination_rad: f64,
    pub distance_km: f64,
}

/// Fraction and phase of the illuminated lunar disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoonIllumination {
    /// Illuminated fraction, 0 (new) to 1 (full).
    pub fraction: f64,
    /// Position in the synodic cycle, in [0, 1): 0 new, 0.25 first quarter,
    /// 0.5 full, 0.75 last quarter.
    pub phase: f64,
    /// Position angle of the bright limb's midpoint, in radians.
    pub angle_rad: f64,
}

impl MoonIllumination {
    pub fn named_phase(&self) -> MoonPhase {
        MoonPhase::from_phase(self.phase)
    }
}

/// Geocentric lunar position at `instant`.
pub fn moon_position(instant: &UtcInstant, obliquity_deg: f64) -> MoonPosition {
    let d = instant.days_since_j2000();

    let l = (218.316 + 13.176_396 * d).to_radians();
    let m = (134.963 + 13.064_993 * d).to_radians();
    let f = (93.272 + 13.229_350 * d).to_radians();

    let lon = l + 6.289f64.to_radians() * m.sin();
    let lat = 5.128f64.to_radians() * f.sin();
    let distance_km = 385_001.0 - 20_905.0 * m.cos();

    let e = obliquity_deg.to_radians();
    let ra = (lon.sin() * e.cos() - lat.tan() * e.sin()).atan2(lon.cos());
    let dec = (lat.sin() * e.cos() + lat.cos() * e.sin() * lon.sin())
        .clamp(-1.0, 1.0)
        .asin();

    MoonPosition {
        right_ascension_rad: ra,
        declination_rad: dec,
        distance_km,
    }
}

/// Illuminated fraction and phase of the Moon at `instant`.
pub fn moon_illumination(instant: &UtcInstant) -> MoonIllumination {
    let sun = SunSnapshot::at(*instant);
    let moon = moon_position(instant, sun.obliquity_deg);
    illumination_from(&sun.equatorial, &moon)
}

fn illumination_from(sun: &SolarEquatorialPosition, moon: &MoonPosition) -> MoonIllumination {
    let (sd, sr) = (sun.declination_rad, sun.right_ascension_rad);
    let (md, mr) = (moon.declination_rad, moon.right_ascension_rad);

    // Geocentric elongation between the Sun and the Moon.
    let phi = (sd.sin() * md.sin() + sd.cos() * md.cos() * (sr - mr).cos())
        .clamp(-1.0, 1.0)
        .acos();
    let inc = (SUN_DISTANCE_KM * phi.sin()).atan2(moon.distance_km - SUN_DISTANCE_KM * phi.cos());
    let angle = (sd.cos() * (sr - mr).sin())
        .atan2(sd.sin() * md.cos() - sd.cos() * md.sin() * (sr - mr).cos());

    let sign = if angle < 0.0 { -1.0 } else { 1.0 };
    let phase = (0.5 + 0.5 * inc * sign / PI).rem_euclid(1.0);

    MoonIllumination {
        fraction: (1.0 + inc.cos()) / 2.0,
        phase,
        angle_rad: angle,
    }
}

/// The eight conventional named phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Classify a phase value in [0, 1).
    pub fn from_phase(p: f64) -> Self {
        if !(0.03..=0.97).contains(&p) {
            MoonPhase::New
        } else if p < 0.22 {
            MoonPhase::WaxingCrescent
        } else if p < 0.28 {
            MoonPhase::FirstQuarter
        } else if p < 0.47 {
            MoonPhase::WaxingGibbous
        } else if p < 0.53 {
            MoonPhase::Full
        } else if p < 0.72 {
            MoonPhase::WaningGibbous
        } else if p < 0.78 {
            MoonPhase::LastQuarter
        } else {
            MoonPhase::WaningCrescent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
