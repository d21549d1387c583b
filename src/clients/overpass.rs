//! Client for the Overpass API hospital-lookup collaborator.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::hospital::{Coordinates, Hospital};

/// Placeholder for hospitals the source has no name for.
pub const UNNAMED_HOSPITAL: &str = "Unnamed Hospital";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

/// One element of an Overpass reply. Nodes carry `lat`/`lon` directly;
/// ways and relations only have a `center` because of `out center`.
#[derive(Debug, Deserialize)]
struct OverpassElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassTags {
    name: Option<String>,
}

/// HTTP client for the hospital lookup.
pub struct HospitalLookupClient {
    http: reqwest::Client,
    url: String,
}

impl HospitalLookupClient {
    /// Creates a new client from the shared HTTP client and configuration.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            url: config.overpass_url.clone(),
        }
    }

    fn around_query(center: Coordinates, radius_m: u32) -> String {
        format!(
            "[out:json];(\
             node[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\
             way[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\
             relation[\"amenity\"=\"hospital\"](around:{radius},{lat},{lon});\
             );out center;",
            radius = radius_m,
            lat = center.lat,
            lon = center.lon,
        )
    }

    /// Fetches hospitals around `center` within `radius_m` meters.
    ///
    /// Elements without resolvable coordinates are skipped; the caller
    /// applies the result cap.
    ///
    /// # Arguments
    ///
    /// * `center` - The center of the search.
    /// * `radius_m` - The search radius in meters.
    ///
    /// # Returns
    ///
    /// A `Result` containing the uncapped hospital list.
    pub async fn find_nearby(&self, center: Coordinates, radius_m: u32) -> Result<Vec<Hospital>> {
        let query = Self::around_query(center, radius_m);

        let response = self
            .http
            .get(&self.url)
            .query(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach the hospital lookup: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Hospital lookup returned {}",
                response.status()
            )));
        }

        let payload: OverpassResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse hospital lookup response: {}", e)))?;

        Ok(hospitals_from_response(payload))
    }
}

fn hospitals_from_response(payload: OverpassResponse) -> Vec<Hospital> {
    payload
        .elements
        .into_iter()
        .filter_map(|element| {
            let (lat, lon) = match (element.lat, element.lon, element.center) {
                (Some(lat), Some(lon), _) => (lat, lon),
                (_, _, Some(center)) => (center.lat, center.lon),
                _ => return None,
            };
            Some(Hospital {
                lat,
                lon,
                name: element
                    .tags
                    .name
                    .unwrap_or_else(|| UNNAMED_HOSPITAL.to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "node", "id": 1, "lat": 17.4, "lon": 78.5, "tags": {"name": "Apollo Hospital", "amenity": "hospital"}},
            {"type": "way", "id": 2, "center": {"lat": 17.41, "lon": 78.51}, "tags": {"name": "Care Hospital"}},
            {"type": "node", "id": 3, "lat": 17.42, "lon": 78.52},
            {"type": "relation", "id": 4, "tags": {"name": "No Coordinates Clinic"}}
        ]
    }"#;

    #[test]
    fn nodes_ways_and_nameless_elements_are_mapped() {
        let payload: OverpassResponse = serde_json::from_str(FIXTURE).unwrap();
        let hospitals = hospitals_from_response(payload);

        assert_eq!(hospitals.len(), 3);
        assert_eq!(hospitals[0].name, "Apollo Hospital");
        assert_eq!(hospitals[1].name, "Care Hospital");
        assert!((hospitals[1].lat - 17.41).abs() < 1e-9);
        assert_eq!(hospitals[2].name, UNNAMED_HOSPITAL);
    }

    #[test]
    fn empty_reply_maps_to_no_hospitals() {
        let payload: OverpassResponse = serde_json::from_str(r#"{"elements": []}"#).unwrap();
        assert!(hospitals_from_response(payload).is_empty());

        let payload: OverpassResponse = serde_json::from_str("{}").unwrap();
        assert!(hospitals_from_response(payload).is_empty());
    }

    #[test]
    fn around_query_targets_all_element_kinds() {
        let query = HospitalLookupClient::around_query(
            Coordinates {
                lat: 17.4,
                lon: 78.5,
            },
            10000,
        );
        assert!(query.starts_with("[out:json];"));
        assert!(query.contains("node[\"amenity\"=\"hospital\"](around:10000,17.4,78.5)"));
        assert!(query.contains("way[\"amenity\"=\"hospital\"]"));
        assert!(query.contains("relation[\"amenity\"=\"hospital\"]"));
        assert!(query.ends_with("out center;"));
    }
}
