use serde::Serialize;

use crate::clients::nominatim::GeocoderClient;
use crate::clients::overpass::HospitalLookupClient;
use crate::error::{AppError, Result};
use crate::models::hospital::{Coordinates, Hospital, HospitalMarker};
use crate::state::AppState;

/// The data handed to the map renderer: the searched center plus one
/// marker per hospital.
#[derive(Debug, Serialize)]
pub struct HospitalSearch {
    pub center: Coordinates,
    pub hospitals: Vec<HospitalMarker>,
}

/// Searches for hospitals near a place name.
///
/// One geocode call, one lookup call, no retries. "No geocode match" and
/// "no hospitals" are reported as not-found; nothing is fabricated.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `location` - The place name to search around.
/// * `radius_m` - The search radius in meters.
/// * `limit` - The cap on returned hospitals.
///
/// # Returns
///
/// A `Result` containing the search outcome.
pub async fn search(
    state: &AppState,
    location: &str,
    radius_m: u32,
    limit: usize,
) -> Result<HospitalSearch> {
    let geocoder = GeocoderClient::new(state.http.clone(), &state.config);
    let center = geocoder.geocode(location).await?.ok_or_else(|| {
        AppError::NotFound("Could not find the specified location. Please try again.".to_string())
    })?;

    tracing::debug!(
        "📍 Geocoded '{}' to ({}, {})",
        location,
        center.lat,
        center.lon
    );

    let lookup = HospitalLookupClient::new(state.http.clone(), &state.config);
    let found = lookup.find_nearby(center, radius_m).await?;

    let hospitals = build_markers(center, found, limit);
    if hospitals.is_empty() {
        return Err(AppError::NotFound("No hospitals found nearby.".to_string()));
    }

    tracing::info!("🏥 Found {} hospitals near '{}'", hospitals.len(), location);
    Ok(HospitalSearch { center, hospitals })
}

/// Caps the collaborator's list at `limit` and attaches a driving-directions
/// link from the searched center to each hospital.
fn build_markers(
    center: Coordinates,
    mut hospitals: Vec<Hospital>,
    limit: usize,
) -> Vec<HospitalMarker> {
    hospitals.truncate(limit);
    hospitals
        .into_iter()
        .map(|hospital| {
            let directions_url = format!(
                "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=driving",
                center.lat, center.lon, hospital.lat, hospital.lon
            );
            HospitalMarker {
                lat: hospital.lat,
                lon: hospital.lon,
                name: hospital.name,
                directions_url,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(count: usize) -> Vec<Hospital> {
        (0..count)
            .map(|i| Hospital {
                lat: 17.0 + i as f64,
                lon: 78.0 + i as f64,
                name: format!("Hospital {}", i),
            })
            .collect()
    }

    #[test]
    fn result_list_is_truncated_to_the_cap() {
        let center = Coordinates { lat: 17.0, lon: 78.0 };
        let markers = build_markers(center, sample(25), 10);
        assert_eq!(markers.len(), 10);
        assert_eq!(markers[0].name, "Hospital 0");
        assert_eq!(markers[9].name, "Hospital 9");
    }

    #[test]
    fn fewer_results_than_the_cap_pass_through() {
        let center = Coordinates { lat: 17.0, lon: 78.0 };
        assert_eq!(build_markers(center, sample(3), 10).len(), 3);
        assert!(build_markers(center, sample(0), 10).is_empty());
    }

    #[test]
    fn markers_carry_directions_from_the_center() {
        let center = Coordinates { lat: 17.5, lon: 78.5 };
        let markers = build_markers(center, sample(1), 10);
        assert_eq!(
            markers[0].directions_url,
            "https://www.google.com/maps/dir/?api=1&origin=17.5,78.5&destination=17,78&travelmode=driving"
        );
    }
}
