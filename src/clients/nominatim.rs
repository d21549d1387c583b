//! Client for the Nominatim geocoding collaborator.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::hospital::Coordinates;

/// One search hit. Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// HTTP client for the geocoder.
pub struct GeocoderClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocoderClient {
    /// Creates a new client from the shared HTTP client and configuration.
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.nominatim_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a place name to coordinates.
    ///
    /// Returns `Ok(None)` when the geocoder has no match. The call is made
    /// once per search and never retried.
    ///
    /// # Arguments
    ///
    /// * `place` - The place name to resolve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the coordinates, if any.
    pub async fn geocode(&self, place: &str) -> Result<Option<Coordinates>> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to reach the geocoder: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Geocoder returned {}",
                response.status()
            )));
        }

        let hits: Vec<GeocodeHit> = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to parse geocoder response: {}", e)))?;

        hits.into_iter().next().map(hit_to_coordinates).transpose()
    }
}

fn hit_to_coordinates(hit: GeocodeHit) -> Result<Coordinates> {
    let lat = hit
        .lat
        .parse::<f64>()
        .map_err(|_| AppError::Upstream("Geocoder returned malformed coordinates".to_string()))?;
    let lon = hit
        .lon
        .parse::<f64>()
        .map_err(|_| AppError::Upstream("Geocoder returned malformed coordinates".to_string()))?;
    Ok(Coordinates { lat, lon })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_hit_parses_string_coordinates() {
        let hits: Vec<GeocodeHit> = serde_json::from_str(
            r#"[{"place_id": 100, "lat": "17.3850", "lon": "78.4867", "display_name": "Hyderabad"}]"#,
        )
        .unwrap();
        let coords = hit_to_coordinates(hits.into_iter().next().unwrap()).unwrap();
        assert!((coords.lat - 17.3850).abs() < 1e-9);
        assert!((coords.lon - 78.4867).abs() < 1e-9);
    }

    #[test]
    fn malformed_coordinates_are_an_upstream_error() {
        let hit = GeocodeHit {
            lat: "not-a-number".to_string(),
            lon: "78.4867".to_string(),
        };
        assert!(matches!(
            hit_to_coordinates(hit),
            Err(AppError::Upstream(_))
        ));
    }
}
