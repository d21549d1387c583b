use serde::Serialize;

/// A geographic point.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A hospital returned by the lookup collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct Hospital {
    pub lat: f64,
    pub lon: f64,
    /// The hospital's name, or a placeholder when the source has none.
    pub name: String,
}

/// A marker handed to the map renderer: one hospital plus its
/// driving-directions link from the searched location.
#[derive(Debug, Clone, Serialize)]
pub struct HospitalMarker {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub directions_url: String,
}
