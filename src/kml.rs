use itertools::Itertools;

use crate::geo::{circle_points, LatLon};
use crate::obstacle::Obstacle;

/// A 6-hex-digit RGB color plus a 2-hex-digit opacity byte.
#[derive(Clone, Debug)]
pub struct ColorSpec {
    pub rgb: String,
    pub opacity: String,
}

impl ColorSpec {
    pub fn new(rgb: &str, opacity: &str) -> Self {
        ColorSpec {
            rgb: rgb.to_string(),
            opacity: opacity.to_string(),
        }
    }

    pub fn to_kml(&self) -> String {
        kml_color(&self.rgb, &self.opacity)
    }
}

#[derive(Clone, Debug)]
pub struct StyleSpec {
    pub outline: ColorSpec,
    pub fill: ColorSpec,
    pub fill_enabled: bool,
}

/// Convert HTML hex (#RRGGBB) plus an opacity byte to the KML color order
/// (aabbggrr). KML reads color bytes reversed relative to HTML notation.
///
/// No validation: a short or non-hex input produces a garbled (but printable)
/// color rather than an error.
pub fn kml_color(hex: &str, opacity: &str) -> String {
    let hex = hex.trim_start_matches('#').to_ascii_lowercase();
    let r = hex.get(0..2).unwrap_or("");
    let g = hex.get(2..4).unwrap_or("");
    let b = hex.get(4..6).unwrap_or("");
    format!("{}{}{}{}", opacity.to_ascii_lowercase(), b, g, r)
}

/// Minimal XML text escaping for obstacle-sourced fields.
pub fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// The 37 ring vertices around `center` as space-joined "lon,lat,0" triples.
/// Longitude leads latitude, per the KML coordinate axis order.
pub fn ring_coordinates(center: LatLon, radius_sm: f64) -> String {
    circle_points(center, radius_sm)
        .iter()
        .map(|p| format!("{},{},0", p.lon(), p.lat()))
        .join(" ")
}

/// Assemble the KML document: header, the shared circle style, one placemark
/// per obstacle, footer. The layout is fixed; consumers parse it structurally.
pub fn build_document(
    obstacles: &[&Obstacle],
    style: &StyleSpec,
    ring_radius_sm: f64,
    min_agl: u32,
) -> String {
    let mut kml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml xmlns=\"http://www.opengis.net/kml/2.2\">\n<Document>\n",
    );
    kml += &format!("\t<name>Obstacles > {} AGL</name>\n", min_agl);
    kml += &format!(
        "\t<Style id=\"customCircle\">\n\t\t<LineStyle>\n\t\t\t<color>{}</color>\n\t\t\t<width>2</width>\n\t\t</LineStyle>\n",
        style.outline.to_kml()
    );
    kml += &format!(
        "\t\t<PolyStyle>\n\t\t\t<color>{}</color>\n\t\t\t<fill>{}</fill>\n\t\t</PolyStyle>\n\t</Style>\n",
        style.fill.to_kml(),
        if style.fill_enabled { "1" } else { "0" }
    );

    for obs in obstacles {
        let coords = ring_coordinates(obs.latlon(), ring_radius_sm);
        kml += &format!(
            "\t<Placemark>\n\t\t<name>{} ({}) - {} AGL</name>\n\t\t<styleUrl>#customCircle</styleUrl>\n",
            escape_text(&obs.city),
            escape_text(&obs.id),
            obs.agl
        );
        kml += &format!(
            "\t\t<Polygon>\n\t\t\t<outerBoundaryIs>\n\t\t\t\t<LinearRing>\n\t\t\t\t\t<coordinates>\n\t\t\t\t\t\t{}\n\t\t\t\t\t</coordinates>\n\t\t\t\t</LinearRing>\n\t\t\t</outerBoundaryIs>\n\t\t</Polygon>\n\t</Placemark>\n",
            coords
        );
    }

    kml += "</Document>\n</kml>";
    kml
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> StyleSpec {
        StyleSpec {
            outline: ColorSpec::new("#ff0000", "ff"),
            fill: ColorSpec::new("#ff0000", "80"),
            fill_enabled: true,
        }
    }

    #[test]
    fn color_bytes_are_reversed_with_opacity_prepended() {
        assert_eq!(kml_color("#FF0000", "ff"), "ff0000ff");
        assert_eq!(kml_color("112233", "80"), "80332211");
        assert_eq!(kml_color("#abcdef", "ff").len(), 8);
    }

    #[test]
    fn malformed_color_degrades_without_panicking() {
        assert_eq!(kml_color("#f00", "ff"), "fff0");
        assert_eq!(kml_color("", "ff"), "ff");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(escape_text("A&B <TOWER>"), "A&amp;B &lt;TOWER&gt;");
        assert_eq!(escape_text("PLAIN"), "PLAIN");
    }

    #[test]
    fn ring_coordinates_emit_37_closed_triples() {
        let coords = ring_coordinates(LatLon::new(46.93, -96.82), 0.5);
        let triples: Vec<_> = coords.split(' ').collect();
        assert_eq!(triples.len(), 37);
        assert_eq!(triples[0], triples[36]);
        for t in &triples {
            assert!(t.ends_with(",0"));
        }
    }

    #[test]
    fn zero_radius_ring_repeats_the_center_triple() {
        let coords = ring_coordinates(LatLon::new(0.0, 0.0), 0.0);
        for t in coords.split(' ') {
            assert_eq!(t, "0,0,0");
        }
    }

    #[test]
    fn single_obstacle_document() {
        let obs = Obstacle {
            id: "1".to_string(),
            city: "A".to_string(),
            lat: 0.0,
            lon: 0.0,
            agl: 500,
        };
        let doc = build_document(&[&obs], &style(), 1.0, 200);

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<kml"));
        assert!(doc.ends_with("</Document>\n</kml>"));
        assert_eq!(doc.matches("<Placemark>").count(), 1);
        assert!(doc.contains("<name>Obstacles > 200 AGL</name>"));
        assert!(doc.contains("<name>A (1) - 500 AGL</name>"));
        assert!(doc.contains("<color>ff0000ff</color>"));
        assert!(doc.contains("<color>800000ff</color>"));
        assert!(doc.contains("<fill>1</fill>"));

        let coords = doc
            .split("<coordinates>")
            .nth(1)
            .unwrap()
            .split("</coordinates>")
            .next()
            .unwrap()
            .trim();
        assert_eq!(coords.split(' ').count(), 37);
    }

    #[test]
    fn empty_filter_result_still_produces_a_wellformed_document() {
        let doc = build_document(&[], &style(), 1.0, 200);
        assert_eq!(doc.matches("<Placemark>").count(), 0);
        assert!(doc.contains("<Style id=\"customCircle\">"));
        assert!(doc.ends_with("</Document>\n</kml>"));
    }

    #[test]
    fn fill_toggle_and_opacities_are_independent() {
        let mut s = style();
        s.fill_enabled = false;
        s.fill = ColorSpec::new("#00ff00", "40");
        let doc = build_document(&[], &s, 1.0, 200);
        assert!(doc.contains("<fill>0</fill>"));
        assert!(doc.contains("<color>4000ff00</color>"));
        assert!(doc.contains("<color>ff0000ff</color>"));
    }

    #[test]
    fn document_generation_is_deterministic() {
        let obs = Obstacle {
            id: "2".to_string(),
            city: "B".to_string(),
            lat: 29.98,
            lon: -95.34,
            agl: 1049,
        };
        let a = build_document(&[&obs], &style(), 0.5, 200);
        let b = build_document(&[&obs], &style(), 0.5, 200);
        assert_eq!(a, b);
    }
}
