//! Grid clustering of map markers.
//!
//! Markers are projected to Web-Mercator pixel coordinates at the requested
//! zoom and bucketed into square cells; each occupied cell becomes one
//! cluster.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;

use super::GeoPoint;

/// Side of a map tile in pixels.
const TILE_SIZE: f64 = 256.0;

/// Web-Mercator cannot represent the poles.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// A located asset on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterOptions {
    /// Grid cell side in screen pixels.
    pub cell_size_px: f64,
    /// From this zoom on, markers are never merged.
    pub max_cluster_zoom: u8,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            cell_size_px: 60.0,
            max_cluster_zoom: 16,
        }
    }
}

/// One or more markers drawn as a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerCluster {
    /// Mean position of the members.
    pub center: GeoPoint,
    pub count: usize,
    pub marker_ids: Vec<String>,
}

/// Group `markers` that fall in the same pixel cell at `zoom`.
///
/// Markers with invalid coordinates are skipped. Clusters come out in the
/// order of their first member.
pub fn cluster_markers(markers: &[MapMarker], zoom: u8, options: &ClusterOptions) -> Vec<MarkerCluster> {
    let valid = markers.iter().filter(|m| m.point.is_valid());

    if zoom >= options.max_cluster_zoom || options.cell_size_px <= 0.0 {
        return valid
            .map(|m| MarkerCluster {
                center: m.point,
                count: 1,
                marker_ids: vec![m.id.clone()],
            })
            .collect();
    }

    let mut cells: HashMap<(i64, i64), usize> = HashMap::new();
    let mut members: Vec<Vec<&MapMarker>> = Vec::new();

    for marker in valid {
        let (x, y) = project(marker.point, zoom);
        let key = (
            (x / options.cell_size_px).floor() as i64,
            (y / options.cell_size_px).floor() as i64,
        );
        let slot = *cells.entry(key).or_insert_with(|| {
            members.push(Vec::new());
            members.len() - 1
        });
        members[slot].push(marker);
    }

    members.into_iter().map(|group| summarize(&group)).collect()
}

fn summarize(group: &[&MapMarker]) -> MarkerCluster {
    let n = group.len() as f64;
    let lat = group.iter().map(|m| m.point.lat).sum::<f64>() / n;
    let lng = group.iter().map(|m| m.point.lng).sum::<f64>() / n;
    MarkerCluster {
        center: GeoPoint::new(lat, lng),
        count: group.len(),
        marker_ids: group.iter().map(|m| m.id.clone()).collect(),
    }
}

/// World pixel coordinates of `point` at `zoom`.
fn project(point: GeoPoint, zoom: u8) -> (f64, f64) {
    let world = TILE_SIZE * 2f64.powi(i32::from(zoom));
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (point.lng + 180.0) / 360.0 * world;
    let y = (0.5 - ((PI / 4.0 + lat / 2.0).tan().ln()) / (2.0 * PI)) * world;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(id: &str, lat: f64, lng: f64) -> MapMarker {
        MapMarker {
            id: id.to_string(),
            point: GeoPoint::new(lat, lng),
        }
    }

    #[test]
    fn nearby_markers_merge_at_low_zoom() {
        let markers = vec![
            marker("a", 51.50, -0.12),
            marker("b", 51.51, -0.13),
            marker("c", 40.71, -74.0),
        ];
        let clusters = cluster_markers(&markers, 4, &ClusterOptions::default());

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].marker_ids, vec!["a", "b"]);
        assert_eq!(clusters[0].count, 2);
        assert!((clusters[0].center.lat - 51.505).abs() < 1e-9);
        assert_eq!(clusters[1].marker_ids, vec!["c"]);
    }

    #[test]
    fn markers_split_as_zoom_increases() {
        let markers = vec![marker("a", 51.50, -0.12), marker("b", 51.60, -0.30)];
        let options = ClusterOptions::default();
        assert_eq!(cluster_markers(&markers, 5, &options).len(), 1);
        assert_eq!(cluster_markers(&markers, 14, &options).len(), 2);
    }

    #[test]
    fn max_cluster_zoom_disables_merging() {
        let markers = vec![marker("a", 1.0, 1.0), marker("b", 1.0, 1.0)];
        let clusters = cluster_markers(&markers, 16, &ClusterOptions::default());
        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.count == 1));
    }

    #[test]
    fn invalid_markers_are_skipped() {
        let markers = vec![marker("bad", 120.0, 0.0), marker("ok", 0.0, 0.0)];
        let clusters = cluster_markers(&markers, 3, &ClusterOptions::default());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].marker_ids, vec!["ok"]);
    }

    #[test]
    fn no_markers_no_clusters() {
        assert!(cluster_markers(&[], 3, &ClusterOptions::default()).is_empty());
    }

    #[test]
    fn projection_maps_origin_to_world_centre() {
        let (x, y) = project(GeoPoint::new(0.0, 0.0), 0);
        assert!((x - 128.0).abs() < 1e-9);
        assert!((y - 128.0).abs() < 1e-9);
    }

    #[test]
    fn marker_json_is_flat() {
        let m: MapMarker = serde_json::from_str(r#"{"id":"p1","lat":1.5,"lng":2.5}"#).unwrap();
        assert_eq!(m, marker("p1", 1.5, 2.5));
    }
}
