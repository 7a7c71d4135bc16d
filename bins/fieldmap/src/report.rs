//! Human-readable summaries for the terminal

use fieldmap_cli::output::{
    format_bounds, format_coordinate, format_count, format_distance_km, format_size, Status,
};
use fieldmap_kmz::{ArchiveDocument, Folder, LocationStats, Placemark};

const MAX_LISTED: usize = 10;

/// Print the folder tree with each placemark's geometry type
pub fn print_tree(doc: &ArchiveDocument) {
    Status::header(&doc.name);
    if let Some(description) = &doc.description {
        println!("{}", description);
    }

    print_placemarks(&doc.placemarks, 1);
    for folder in &doc.folders {
        print_folder(folder, 1);
    }

    if !doc.resources.is_empty() {
        println!();
        println!("Embedded resources:");
        for resource in &doc.resources {
            println!(
                "  {} ({:?}, {})",
                resource.path,
                resource.kind,
                format_size(resource.size)
            );
        }
    }

    println!();
    Status::info(&format!(
        "{} in {}",
        format_count(doc.placemark_count(), "placemark", "placemarks"),
        format_count(count_folders(&doc.folders), "folder", "folders")
    ));
}

fn print_folder(folder: &Folder, depth: usize) {
    println!(
        "{}{}/ ({})",
        "  ".repeat(depth),
        folder.name,
        format_count(folder.placemark_count(), "placemark", "placemarks")
    );
    print_placemarks(&folder.placemarks, depth + 1);
    for child in &folder.folders {
        print_folder(child, depth + 1);
    }
}

fn print_placemarks(placemarks: &[Placemark], depth: usize) {
    for placemark in placemarks {
        println!(
            "{}- {} [{:?}]",
            "  ".repeat(depth),
            placemark.name,
            placemark.geometry.kind()
        );
    }
}

fn count_folders(folders: &[Folder]) -> usize {
    folders
        .iter()
        .map(|f| 1 + count_folders(&f.folders))
        .sum()
}

/// Print aggregate statistics, largest clusters and longest routes
pub fn print_stats(doc: &ArchiveDocument, stats: &LocationStats, max_distance_km: f64) {
    Status::header(&format!("{} analytics", doc.name));
    Status::field("Placemarks", &stats.total_placemarks.to_string());
    Status::field("Points", &stats.point_count.to_string());
    Status::field("Lines", &stats.line_string_count.to_string());
    Status::field("Polygons", &stats.polygon_count.to_string());
    Status::field("Average position", &format_coordinate(&stats.average_coordinates));
    Status::field("Bounds", &format_bounds(&stats.bounds));

    Status::header(&format!(
        "Clusters (within {})",
        format_distance_km(max_distance_km)
    ));
    if stats.clusters.is_empty() {
        println!("  none");
    }
    for cluster in stats.clusters.iter().take(MAX_LISTED) {
        println!(
            "  {:<12} {:>4} members  center {}  radius {}",
            cluster.id,
            cluster.members.len(),
            format_coordinate(&cluster.center),
            format_distance_km(cluster.radius_km)
        );
    }

    Status::header("Routes");
    if stats.routes.is_empty() {
        println!("  none");
    }
    for route in stats.routes.iter().take(MAX_LISTED) {
        println!(
            "  {:<24} {:>10}  {}",
            route.name,
            format_distance_km(route.total_distance_km),
            format_count(route.waypoint_count, "waypoint", "waypoints")
        );
    }

    let hidden = stats.clusters.len().saturating_sub(MAX_LISTED)
        + stats.routes.len().saturating_sub(MAX_LISTED);
    if hidden > 0 {
        println!();
        Status::info(&format!("{} more not shown; use --json for the full report", hidden));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldmap_kmz::parse_kml;

    #[test]
    fn test_count_folders_nested() {
        let doc = parse_kml(
            r#"<kml><Document>
                <Folder><name>A</name><Folder><name>B</name></Folder></Folder>
                <Folder><name>C</name></Folder>
            </Document></kml>"#,
        )
        .unwrap();
        assert_eq!(count_folders(&doc.folders), 3);
    }
}
