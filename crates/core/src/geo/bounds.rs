//! Initial map viewport for a set of asset locations.

use serde::{Deserialize, Serialize};

use super::{wrap_lng, GeoPoint};

/// Span thresholds in degrees, ascending, paired with the zoom that still
/// fits that span. Anything wider than the last entry gets [`WORLD_ZOOM`].
const ZOOM_BREAKPOINTS: [(f64, u8); 15] = [
    (0.005, 17),
    (0.01, 16),
    (0.02, 15),
    (0.05, 14),
    (0.1, 13),
    (0.2, 12),
    (0.5, 11),
    (1.0, 10),
    (2.0, 9),
    (5.0, 8),
    (10.0, 7),
    (20.0, 6),
    (40.0, 5),
    (80.0, 4),
    (160.0, 3),
];

const WORLD_ZOOM: u8 = 2;

/// Tuning for [`compute_bounds`]. Missing fields take their defaults when
/// deserialised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoundsOptions {
    /// Centre used when there is nothing to frame.
    pub fallback_center: GeoPoint,
    pub default_zoom: u8,
    pub single_point_zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Fraction of the span added on each side before picking a zoom.
    pub padding: f64,
}

impl Default for BoundsOptions {
    fn default() -> Self {
        Self {
            fallback_center: GeoPoint::new(20.0, 0.0),
            default_zoom: 2,
            single_point_zoom: 12,
            min_zoom: 2,
            max_zoom: 18,
            padding: 0.1,
        }
    }
}

impl BoundsOptions {
    fn clamp(&self, zoom: u8) -> u8 {
        if self.min_zoom > self.max_zoom {
            return zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Centre and zoom for the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

/// Frame `points`.
///
/// Invalid points are ignored. With nothing left the fallback centre and
/// default zoom are returned; a single point is shown close in. Longitude
/// spans take the shorter way around, so a set straddling the antimeridian
/// is framed across it rather than across the whole globe.
pub fn compute_bounds(points: &[GeoPoint], options: &BoundsOptions) -> MapView {
    let mut valid = points.iter().filter(|p| p.is_valid());

    let Some(first) = valid.next() else {
        return MapView {
            center: options.fallback_center,
            zoom: options.default_zoom,
        };
    };

    let mut lat = (first.lat, first.lat);
    let mut lng = (first.lng, first.lng);
    // Same extent with negative longitudes moved to (180, 360].
    let shift = |l: f64| if l < 0.0 { l + 360.0 } else { l };
    let mut shifted = (shift(first.lng), shift(first.lng));
    let mut count = 1usize;

    for p in valid {
        count += 1;
        lat = (lat.0.min(p.lat), lat.1.max(p.lat));
        lng = (lng.0.min(p.lng), lng.1.max(p.lng));
        let s = shift(p.lng);
        shifted = (shifted.0.min(s), shifted.1.max(s));
    }

    if count == 1 {
        return MapView {
            center: *first,
            zoom: options.clamp(options.single_point_zoom),
        };
    }

    let raw_span = lng.1 - lng.0;
    let shifted_span = shifted.1 - shifted.0;
    let (lng_span, lng_center) = if shifted_span < raw_span {
        (shifted_span, wrap_lng((shifted.0 + shifted.1) / 2.0))
    } else {
        (raw_span, (lng.0 + lng.1) / 2.0)
    };

    let lat_span = lat.1 - lat.0;
    let span = lat_span.max(lng_span) * (1.0 + 2.0 * options.padding.max(0.0));

    MapView {
        center: GeoPoint::new((lat.0 + lat.1) / 2.0, lng_center),
        zoom: options.clamp(zoom_for_span(span)),
    }
}

/// Largest zoom whose breakpoint still covers `span` degrees.
pub fn zoom_for_span(span: f64) -> u8 {
    ZOOM_BREAKPOINTS
        .iter()
        .find(|(limit, _)| span <= *limit)
        .map_or(WORLD_ZOOM, |(_, zoom)| *zoom)
}
