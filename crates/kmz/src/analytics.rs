//! Statistics derived from a parsed placemark tree.
//!
//! Everything here is recomputed from scratch on each call. Clustering is a
//! greedy single pass and is O(n²) in the number of point placemarks.

use crate::model::{ArchiveDocument, Geometry, Placemark};
use fieldmap_geo::{centroid, haversine_distance, BoundingBox, Coordinate};
use serde::{Deserialize, Serialize};

/// Default clustering radius in kilometers.
pub const DEFAULT_CLUSTER_DISTANCE_KM: f64 = 1.0;

/// Tuning for [`analyze_with_options`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Maximum distance from a cluster's seed point for a point to join it
    pub cluster_max_distance_km: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            cluster_max_distance_km: DEFAULT_CLUSTER_DISTANCE_KM,
        }
    }
}

/// A group of nearby point placemarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCluster {
    /// `cluster_<n>` in formation order
    pub id: String,
    pub center: Coordinate,
    pub members: Vec<Placemark>,
    pub radius_km: f64,
}

/// Distance and extent of a line placemark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteAnalysis {
    /// Id of the source placemark
    pub id: String,
    pub name: String,
    pub total_distance_km: f64,
    pub coordinates: Vec<Coordinate>,
    pub waypoint_count: usize,
    pub bounds: BoundingBox,
}

/// Aggregate analytics for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub total_placemarks: usize,
    pub point_count: usize,
    pub line_string_count: usize,
    pub polygon_count: usize,
    /// Mean over every folded coordinate, so long lines weigh more than points
    pub average_coordinates: Coordinate,
    /// [`BoundingBox::EMPTY`] when the document has no coordinates
    pub bounds: BoundingBox,
    /// Largest cluster first
    pub clusters: Vec<LocationCluster>,
    /// Longest route first
    pub routes: Vec<RouteAnalysis>,
}

/// Analyze a document with default options.
pub fn analyze(doc: &ArchiveDocument) -> LocationStats {
    analyze_with_options(doc, &AnalysisOptions::default())
}

/// Analyze a document.
///
/// Total over any document, including one with no placemarks.
pub fn analyze_with_options(doc: &ArchiveDocument, options: &AnalysisOptions) -> LocationStats {
    let placemarks = doc.flatten();

    let mut point_count = 0;
    let mut line_string_count = 0;
    let mut polygon_count = 0;
    let mut bounds = BoundingBox::EMPTY;
    let (mut lat_sum, mut lng_sum, mut folded) = (0.0, 0.0, 0usize);

    for placemark in &placemarks {
        match placemark.geometry {
            Geometry::Point(_) => point_count += 1,
            Geometry::LineString(_) => line_string_count += 1,
            Geometry::Polygon(_) => polygon_count += 1,
        }
        for coord in placemark.geometry.primary_coordinates() {
            lat_sum += coord.lat;
            lng_sum += coord.lng;
            folded += 1;
            bounds.extend(coord);
        }
    }

    let average_coordinates = if folded > 0 {
        Coordinate::new(lat_sum / folded as f64, lng_sum / folded as f64)
    } else {
        Coordinate::new(0.0, 0.0)
    };

    let points: Vec<&Placemark> = placemarks
        .iter()
        .copied()
        .filter(|p| matches!(p.geometry, Geometry::Point(_)))
        .collect();
    let lines: Vec<&Placemark> = placemarks
        .iter()
        .copied()
        .filter(|p| matches!(p.geometry, Geometry::LineString(_)))
        .collect();

    let stats = LocationStats {
        total_placemarks: placemarks.len(),
        point_count,
        line_string_count,
        polygon_count,
        average_coordinates,
        bounds,
        clusters: cluster_points(&points, options.cluster_max_distance_km),
        routes: analyze_routes(&lines),
    };

    tracing::debug!(
        placemarks = stats.total_placemarks,
        clusters = stats.clusters.len(),
        routes = stats.routes.len(),
        "Analyzed document"
    );

    stats
}

/// Greedy distance clustering of point placemarks.
///
/// Each unassigned point seeds a cluster, and every later unassigned point
/// within `max_distance_km` of that seed joins it. Membership is always tested
/// against the seed, never the running centroid, so a member may end up
/// farther than `max_distance_km` from the final center. Multi-member
/// clusters get an arithmetic-mean center and a radius equal to the farthest
/// member from it. Non-point placemarks are ignored.
pub fn cluster_points(points: &[&Placemark], max_distance_km: f64) -> Vec<LocationCluster> {
    let coords: Vec<Option<Coordinate>> = points
        .iter()
        .map(|p| match p.geometry {
            Geometry::Point(c) => Some(c),
            _ => None,
        })
        .collect();

    let mut assigned = vec![false; points.len()];
    let mut clusters = Vec::new();

    for (i, seed) in coords.iter().enumerate() {
        let Some(seed) = seed else { continue };
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let mut members = vec![i];
        for (j, other) in coords.iter().enumerate().skip(i + 1) {
            let Some(other) = other else { continue };
            if !assigned[j] && haversine_distance(seed, other) <= max_distance_km {
                assigned[j] = true;
                members.push(j);
            }
        }

        let (center, radius_km) = if members.len() > 1 {
            let member_coords: Vec<Coordinate> = members.iter().filter_map(|&m| coords[m]).collect();
            let center = centroid(&member_coords).unwrap_or(*seed);
            let radius = member_coords
                .iter()
                .map(|c| haversine_distance(&center, c))
                .fold(0.0, f64::max);
            (center, radius)
        } else {
            (*seed, 0.0)
        };

        clusters.push(LocationCluster {
            id: format!("cluster_{}", clusters.len()),
            center,
            members: members.into_iter().map(|m| points[m].clone()).collect(),
            radius_km,
        });
    }

    // Stable: equal sizes keep formation order.
    clusters.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    clusters
}

/// Distance and bounds for each line placemark, longest first.
pub fn analyze_routes(lines: &[&Placemark]) -> Vec<RouteAnalysis> {
    let mut routes: Vec<RouteAnalysis> = lines
        .iter()
        .filter_map(|p| match &p.geometry {
            Geometry::LineString(coords) => Some(RouteAnalysis {
                id: p.id.clone(),
                name: p.name.clone(),
                total_distance_km: route_distance(coords),
                coordinates: coords.clone(),
                waypoint_count: coords.len(),
                bounds: BoundingBox::from_coordinates(coords),
            }),
            _ => None,
        })
        .collect();

    routes.sort_by(|a, b| b.total_distance_km.total_cmp(&a.total_distance_km));
    routes
}

/// Sum of great-circle distances between consecutive coordinates, in km.
pub fn route_distance(coordinates: &[Coordinate]) -> f64 {
    coordinates
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Folder, Properties};
    use proptest::prelude::*;

    fn placemark(id: &str, geometry: Geometry) -> Placemark {
        Placemark {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            style_url: None,
            geometry,
            extra_properties: Properties::new(),
        }
    }

    fn point(id: &str, lat: f64, lng: f64) -> Placemark {
        placemark(id, Geometry::Point(Coordinate::new(lat, lng)))
    }

    fn line(id: &str, coords: &[(f64, f64)]) -> Placemark {
        placemark(id, Geometry::LineString(coords.iter().copied().map(Coordinate::from).collect()))
    }

    fn doc_with(placemarks: Vec<Placemark>) -> ArchiveDocument {
        ArchiveDocument {
            name: "test".into(),
            placemarks,
            ..ArchiveDocument::default()
        }
    }

    #[test]
    fn test_empty_document() {
        let stats = analyze(&ArchiveDocument::default());
        assert_eq!(stats.total_placemarks, 0);
        assert_eq!(stats.point_count, 0);
        assert_eq!(stats.line_string_count, 0);
        assert_eq!(stats.polygon_count, 0);
        assert!(stats.clusters.is_empty());
        assert!(stats.routes.is_empty());
        assert_eq!(stats.bounds, BoundingBox::EMPTY);
        assert_eq!(stats.average_coordinates, Coordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_point_and_line_scenario() {
        let doc = doc_with(vec![
            point("p", 10.0, 20.0),
            line("l", &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]),
        ]);
        let stats = analyze(&doc);

        assert_eq!(stats.point_count, 1);
        assert_eq!(stats.line_string_count, 1);
        assert_eq!(stats.polygon_count, 0);

        assert_eq!(stats.clusters.len(), 1);
        assert_eq!(stats.clusters[0].members.len(), 1);
        assert_eq!(stats.clusters[0].center, Coordinate::new(10.0, 20.0));
        assert_eq!(stats.clusters[0].radius_km, 0.0);

        let expected = haversine_distance(&Coordinate::new(0.0, 0.0), &Coordinate::new(0.0, 1.0))
            + haversine_distance(&Coordinate::new(0.0, 1.0), &Coordinate::new(1.0, 1.0));
        assert_eq!(stats.routes.len(), 1);
        assert_eq!(stats.routes[0].waypoint_count, 3);
        assert!((stats.routes[0].total_distance_km - expected).abs() < 1e-9);
    }

    #[test]
    fn test_average_is_weighted_by_vertices() {
        let doc = doc_with(vec![
            point("p", 4.0, 0.0),
            line("l", &[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]),
        ]);
        let stats = analyze(&doc);
        // Four folded coordinates, not two placemarks.
        assert!((stats.average_coordinates.lat - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_polygon_outer_ring_only() {
        let outer = vec![Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 2.0)];
        let hole = vec![Coordinate::new(50.0, 50.0)];
        let doc = doc_with(vec![placemark("poly", Geometry::Polygon(vec![outer, hole]))]);
        let stats = analyze(&doc);
        assert_eq!(stats.polygon_count, 1);
        assert_eq!(stats.bounds.north, 2.0);
        assert_eq!(stats.bounds.east, 2.0);
        assert!(stats.clusters.is_empty());
    }

    #[test]
    fn test_nested_folders_counted() {
        let doc = ArchiveDocument {
            name: "nested".into(),
            folders: vec![Folder {
                name: "outer".into(),
                placemarks: vec![point("a", 0.0, 0.0)],
                folders: vec![Folder {
                    name: "inner".into(),
                    placemarks: vec![point("b", 45.0, 45.0)],
                    ..Folder::default()
                }],
                ..Folder::default()
            }],
            ..ArchiveDocument::default()
        };
        let stats = analyze(&doc);
        assert_eq!(stats.total_placemarks, 2);
        assert_eq!(stats.clusters.len(), 2);
    }

    #[test]
    fn test_cluster_groups_nearby_points() {
        // ~0.11 km apart, the third one far away
        let points = [
            point("a", 52.5200, 13.4050),
            point("b", 52.5210, 13.4050),
            point("far", 48.8566, 2.3522),
        ];
        let refs: Vec<&Placemark> = points.iter().collect();
        let clusters = cluster_points(&refs, 1.0);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].id, "cluster_0");
        assert_eq!(clusters[0].members.len(), 2);
        assert!((clusters[0].center.lat - 52.5205).abs() < 1e-9);
        let expected_radius = haversine_distance(&clusters[0].center, &Coordinate::new(52.5200, 13.4050));
        assert!((clusters[0].radius_km - expected_radius).abs() < 1e-12);
        assert_eq!(clusters[1].members[0].id, "far");
    }

    #[test]
    fn test_cluster_membership_uses_seed() {
        // b is within 1 km of seed a, c is within 1 km of b but not of a:
        // c must start its own cluster.
        let step = 0.008; // ~0.89 km of latitude
        let points = [
            point("a", 0.0, 0.0),
            point("b", step, 0.0),
            point("c", 2.0 * step, 0.0),
        ];
        let refs: Vec<&Placemark> = points.iter().collect();
        let clusters = cluster_points(&refs, 1.0);

        assert_eq!(clusters.len(), 2);
        let ids: Vec<&str> = clusters[0].members.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(clusters[1].members[0].id, "c");
    }

    #[test]
    fn test_cluster_sort_is_stable() {
        let points = [
            point("x", 0.0, 0.0),
            point("y", 10.0, 10.0),
            point("z1", 20.0, 20.0),
            point("z2", 20.0, 20.0),
        ];
        let refs: Vec<&Placemark> = points.iter().collect();
        let clusters = cluster_points(&refs, 1.0);
        let ids: Vec<&str> = clusters.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["cluster_2", "cluster_0", "cluster_1"]);
    }

    #[test]
    fn test_duplicate_ids_still_clustered_separately() {
        let points = [point("same", 0.0, 0.0), point("same", 30.0, 30.0)];
        let refs: Vec<&Placemark> = points.iter().collect();
        assert_eq!(cluster_points(&refs, 1.0).len(), 2);
    }

    #[test]
    fn test_routes_sorted_by_distance() {
        let lines = [
            line("short", &[(0.0, 0.0), (0.0, 0.1)]),
            line("long", &[(0.0, 0.0), (0.0, 5.0)]),
            line("single", &[(1.0, 1.0)]),
        ];
        let refs: Vec<&Placemark> = lines.iter().collect();
        let routes = analyze_routes(&refs);
        let ids: Vec<&str> = routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["long", "short", "single"]);
        assert_eq!(routes[2].total_distance_km, 0.0);
        assert_eq!(routes[1].bounds.east, 0.1);
    }

    #[test]
    fn test_route_distance_is_additive() {
        let p0 = Coordinate::new(0.0, 0.0);
        let p1 = Coordinate::new(0.0, 1.0);
        let p2 = Coordinate::new(1.0, 1.0);
        let along = route_distance(&[p0, p1, p2]);
        let direct = haversine_distance(&p0, &p2);
        assert!((along - (haversine_distance(&p0, &p1) + haversine_distance(&p1, &p2))).abs() < 1e-12);
        assert!(along > direct);
    }

    #[test]
    fn test_stats_json_shape() {
        let stats = analyze(&doc_with(vec![point("p", 1.0, 2.0)]));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalPlacemarks"], 1);
        assert_eq!(json["lineStringCount"], 0);
        assert_eq!(json["averageCoordinates"]["lat"], 1.0);
        assert_eq!(json["clusters"][0]["radiusKm"], 0.0);
    }

    proptest! {
        #[test]
        fn prop_every_point_in_exactly_one_cluster(
            raw in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 0..40),
            max_km in 0.5f64..50.0,
        ) {
            let points: Vec<Placemark> = raw
                .iter()
                .enumerate()
                .map(|(i, &(lat, lng))| point(&format!("p{i}"), lat, lng))
                .collect();
            let refs: Vec<&Placemark> = points.iter().collect();
            let clusters = cluster_points(&refs, max_km);

            let mut seen: Vec<&str> = clusters
                .iter()
                .flat_map(|c| c.members.iter().map(|m| m.id.as_str()))
                .collect();
            seen.sort_unstable();
            let mut expected: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
            expected.sort_unstable();
            prop_assert_eq!(seen, expected);

            for pair in clusters.windows(2) {
                prop_assert!(pair[0].members.len() >= pair[1].members.len());
            }

            for cluster in clusters.iter().filter(|c| c.members.len() > 1) {
                let max = cluster
                    .members
                    .iter()
                    .map(|m| haversine_distance(&cluster.center, &m.geometry.primary_coordinates()[0]))
                    .fold(0.0, f64::max);
                prop_assert!((cluster.radius_km - max).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_route_distance_splits_additively(
            raw in prop::collection::vec((-80.0f64..80.0, -170.0f64..170.0), 2..20),
            split in any::<prop::sample::Index>(),
        ) {
            let coords: Vec<Coordinate> = raw.into_iter().map(Coordinate::from).collect();
            let k = split.index(coords.len());
            let total = route_distance(&coords);
            let head = route_distance(&coords[..=k]);
            let tail = route_distance(&coords[k..]);
            prop_assert!((total - (head + tail)).abs() < 1e-6);
        }
    }
}
