use anyhow::Result;

use crate::location::is_valid_coordinate;

/// Link to the external map for a coordinate pair. Invalid coordinates
/// are rejected instead of producing a broken link.
pub fn google_maps_url(latitude: f64, longitude: f64) -> Result<String> {
    if !is_valid_coordinate(latitude, longitude) {
        bail!("invalid coordinates: {latitude}, {longitude}");
    }
    Ok(format!(
        "https://www.google.com/maps?q={latitude},{longitude}"
    ))
}

/// Embeddable map view centered on the coordinate, with a marker and a
/// 0.01 degree bounding box on each side.
pub fn osm_embed_url(latitude: f64, longitude: f64) -> Result<String> {
    if !is_valid_coordinate(latitude, longitude) {
        bail!("invalid coordinates: {latitude}, {longitude}");
    }
    let left = longitude - 0.01;
    let bottom = latitude - 0.01;
    let right = longitude + 0.01;
    let top = latitude + 0.01;
    Ok(format!(
        "https://www.openstreetmap.org/export/embed.html?bbox={left}%2C{bottom}%2C{right}%2C{top}&layer=mapnik&marker={latitude}%2C{longitude}"
    ))
}
