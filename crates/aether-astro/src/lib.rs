//! Astronomical primitives for the Aether map overlays.
//!
//! Everything here is a pure function of a [`UtcInstant`]: Julian Day
//! arithmetic, the Sun's ecliptic and equatorial position, Greenwich sidereal
//! time, hour angles, the sub-solar point, and the Moon's illuminated fraction.
//! Nothing reads the wall clock except [`UtcInstant::now`].

pub mod geo;
pub mod instant;
pub mod moon;
pub mod solar;

pub use geo::{GeoPoint, normalize_longitude};
pub use instant::{InvalidInstantError, UtcInstant};
pub use moon::{MoonIllumination, MoonPhase, MoonPosition, moon_illumination, moon_position};
pub use solar::{
    SolarEclipticPosition, SolarEquatorialPosition, SunSnapshot, equatorial_position,
    greenwich_sidereal_hours, hour_angle, obliquity_deg, solar_ecliptic_position,
    solar_elevation_deg, subsolar_point,
};
