//! GeoJSON export of resolved edges.

use crate::error::{Result, WalkwaysError};
use crate::stops::StopCatalog;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use walkways_types::edge::Edge;

/// One `LineString` feature per edge, from the start stop to the end stop,
/// carrying `start`, `end`, `duration` and `distance` as properties.
///
/// # Examples
///
/// ```
/// use walkways::export::edges_to_geojson;
/// use walkways::{Stop, StopCatalog};
/// use walkways_types::edge::Edge;
///
/// let catalog = StopCatalog::new(vec![Stop::new("a", 8.0, 50.0), Stop::new("b", 8.001, 50.0)])?;
/// let edges = vec![Edge::new("a".to_string(), "b".to_string(), 60.0, 72.0)];
///
/// let collection = edges_to_geojson(&edges, &catalog)?;
/// assert_eq!(collection.features.len(), 1);
/// # Ok::<(), walkways::WalkwaysError>(())
/// ```
pub fn edges_to_geojson(edges: &[Edge<String>], catalog: &StopCatalog) -> Result<FeatureCollection> {
    let locate = |id: &str| {
        catalog
            .coord(id)
            .map(|[lng, lat]| vec![lng, lat])
            .ok_or_else(|| WalkwaysError::UnknownStop(id.to_string()))
    };

    let features = edges
        .iter()
        .map(|edge| {
            let line = vec![locate(&edge.start)?, locate(&edge.end)?];

            let mut properties = JsonObject::new();
            properties.insert("start".to_string(), edge.start.clone().into());
            properties.insert("end".to_string(), edge.end.clone().into());
            properties.insert("duration".to_string(), edge.duration.into());
            properties.insert("distance".to_string(), edge.distance.into());

            Ok(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(line))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
