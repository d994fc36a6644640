//! Rendering a terminator polygon in the configured output format.

use aether_astro::{GeoPoint, SunSnapshot, moon_illumination};
use aether_config::{Config, OutputFormat, OverlayStyle};
use aether_terminator::{TerminatorError, TerminatorPolygon};
use serde_json::{Map, Value};

/// Render `polygon` as the text printed for one update.
pub fn render(polygon: &TerminatorPolygon, config: &Config) -> Result<String, TerminatorError> {
    let output = &config.output;
    match output.format {
        OutputFormat::GeoJson => {
            let mut feature = polygon.to_feature_with(&output.feature_options());
            if output.include_metadata {
                insert_style_properties(&mut feature.properties, &config.style);
            }
            Ok(to_json(&feature, output.pretty)?)
        }
        OutputFormat::LatLngs => Ok(to_json(&polygon.lat_lngs(), output.pretty)?),
        OutputFormat::Summary => Ok(summary(polygon)),
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Overlay styling as simplestyle keys, which most GeoJSON viewers honor.
fn insert_style_properties(properties: &mut Map<String, Value>, style: &OverlayStyle) {
    properties.insert("stroke".into(), Value::String(style.color.clone()));
    properties.insert("stroke-opacity".into(), Value::from(f64::from(style.opacity)));
    properties.insert("fill".into(), Value::String(style.fill_color.clone()));
    properties.insert(
        "fill-opacity".into(),
        Value::from(f64::from(style.fill_opacity)),
    );
}

/// Human-readable description of the polygon and the sky at its instant.
pub fn summary(polygon: &TerminatorPolygon) -> String {
    let sun = SunSnapshot::at(polygon.instant);
    let moon = moon_illumination(&polygon.instant);

    format!(
        "instant:       {instant}\n\
         declination:   {declination:.4}°\n\
         sub-solar:     {subsolar}\n\
         closing pole:  {pole}\n\
         vertices:      {vertices} (resolution {resolution})\n\
         moon:          {phase} ({lit:.0}% lit)",
        instant = polygon.instant,
        declination = polygon.declination_deg,
        subsolar = format_point(sun.subsolar_point()),
        pole = polygon.closing_pole.as_str(),
        vertices = polygon.vertex_count(),
        resolution = polygon.resolution,
        phase = moon.named_phase(),
        lit = moon.fraction * 100.0,
    )
}

/// `12.34°N, 56.78°W` style coordinates.
fn format_point(point: GeoPoint) -> String {
    let ns = if point.lat_deg < 0.0 { 'S' } else { 'N' };
    let ew = if point.lon_deg < 0.0 { 'W' } else { 'E' };
    format!(
        "{:.2}°{ns}, {:.2}°{ew}",
        point.lat_deg.abs(),
        point.lon_deg.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aether_astro::UtcInstant;
    use aether_terminator::{TerminatorOptions, build_terminator_polygon};

    fn june_polygon() -> TerminatorPolygon {
        let instant = UtcInstant::parse("2024-06-21T00:00:00Z").unwrap();
        build_terminator_polygon(instant, &TerminatorOptions::default()).unwrap()
    }

    #[test]
    fn test_geojson_without_metadata_has_empty_properties() {
        let polygon = june_polygon();
        let text = render(&polygon, &Config::default()).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Polygon");
        assert!(value["properties"].as_object().unwrap().is_empty());
        assert!(!text.contains('\n'), "compact output expected");
    }

    #[test]
    fn test_geojson_metadata_includes_style() {
        let polygon = june_polygon();
        let mut config = Config::default();
        config.output.include_metadata = true;
        config.output.pretty = true;
        config.style.fill_color = "#112233".to_string();

        let text = render(&polygon, &config).unwrap();
        assert!(text.contains('\n'), "pretty output expected");
        let value: Value = serde_json::from_str(&text).unwrap();
        let props = &value["properties"];
        assert_eq!(props["fill"], "#112233");
        assert_eq!(props["stroke"], "#000000");
        assert!((props["fill-opacity"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(props["closing_pole"], "south");
        assert_eq!(props["resolution"], 2);
    }

    #[test]
    fn test_lat_lngs_output_starts_at_pole_corner() {
        let polygon = june_polygon();
        let mut config = Config::default();
        config.output.format = OutputFormat::LatLngs;

        let text = render(&polygon, &config).unwrap();
        let pairs: Vec<[f64; 2]> = serde_json::from_str(&text).unwrap();
        assert_eq!(pairs.len(), polygon.vertex_count());
        assert_eq!(pairs[0], [-90.0, -180.0]);
        assert_eq!(pairs[pairs.len() - 1], [-90.0, 180.0]);
    }

    #[test]
    fn test_summary_lines() {
        let polygon = june_polygon();
        let mut config = Config::default();
        config.output.format = OutputFormat::Summary;

        let text = render(&polygon, &config).unwrap();
        assert!(text.contains("instant:       2024-06-21T00:00:00.000Z"));
        assert!(text.contains("closing pole:  south"));
        assert!(text.contains("vertices:      723 (resolution 2)"));
        assert!(text.contains("°N"), "June sub-solar point is north: {text}");
        assert!(text.contains("moon:"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn test_format_point_hemispheres() {
        assert_eq!(format_point(GeoPoint::new(-73.5, 40.25)), "40.25°N, 73.50°W");
        assert_eq!(format_point(GeoPoint::new(151.2, -33.87)), "33.87°S, 151.20°E");
    }
}
