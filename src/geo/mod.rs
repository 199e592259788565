//! Country boundary geometry, loaded once from a local GeoJSON file.

use crate::Result;
use camino::Utf8Path;
use ohno::IntoAppError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

/// Log target for the geometry loader
const LOG_TARGET: &str = "       geo";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<GeoFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    properties: GeoProperties,
    geometry: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeoProperties {
    #[serde(rename = "ISO_A3")]
    iso_a3: String,

    #[serde(rename = "NAME_SORT")]
    name_sort: String,
}

/// One country's outline, carried opaquely to the published payload.
#[derive(Debug, Clone)]
pub struct CountryGeometry {
    pub title: String,
    pub geometry: serde_json::Value,
}

/// Boundary geometry per canonical code.
pub type GeometryTable = HashMap<String, CountryGeometry>;

/// Load the world map file and index its outlines by ISO-A3 code.
pub fn load_geometries(path: &Utf8Path) -> Result<GeometryTable> {
    let text = fs::read_to_string(path).into_app_err_with(|| format!("unable to read world map file '{path}'"))?;
    let collection: FeatureCollection =
        serde_json::from_str(&text).into_app_err_with(|| format!("unable to parse world map file '{path}'"))?;

    let table: GeometryTable = collection
        .features
        .into_iter()
        .map(|feature| {
            (
                feature.properties.iso_a3,
                CountryGeometry {
                    title: feature.properties.name_sort,
                    geometry: feature.geometry,
                },
            )
        })
        .collect();

    log::info!(target: LOG_TARGET, "Loaded outlines for {} countries", table.len());
    Ok(table)
}
