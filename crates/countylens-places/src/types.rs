//! Google Maps Platform response types.
//!
//! All types model the JSON returned by the legacy Geocoding and Places web
//! service endpoints. Every response carries a top-level `"status"` string
//! (`"OK"`, `"ZERO_RESULTS"`, `"INVALID_REQUEST"`, `"REQUEST_DENIED"`, ...)
//! alongside a `results` array; `error_message` is only present on failures
//! and not always even then, so callers synthesize a message when it is
//! absent.
//!
//! ## Observed quirks
//!
//! - Text search results carry `formatted_address`; nearby search results
//!   carry `vicinity` instead. Both are optional on the wire, which is why
//!   normalization has an address fallback chain.
//! - `next_page_token` is issued before it is queryable; requesting it too
//!   early yields `INVALID_REQUEST` rather than an empty page.
//! - `rating` is omitted entirely for unrated places (never `0`), and
//!   `user_ratings_total` is omitted alongside it.

use serde::Deserialize;

/// A WGS84 coordinate pair from `geometry.location`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Top-level envelope for `geocode/json`.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One geocoding candidate; the first candidate is authoritative.
#[derive(Debug, Deserialize)]
pub struct GeocodeCandidate {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// A successfully geocoded county: canonical address plus center point.
#[derive(Debug, Clone)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub location: LatLng,
}

/// Top-level envelope for the paged search endpoints
/// (`place/textsearch/json` and `place/nearbysearch/json`).
#[derive(Debug, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A single point of interest as returned by either search endpoint.
///
/// `place_id` is the provider-assigned stable identity and the only field
/// guaranteed present besides `name`; everything else is defaulted.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    /// Full address; populated by text search.
    #[serde(default)]
    pub formatted_address: Option<String>,
    /// Short address; populated by nearby search.
    #[serde(default)]
    pub vicinity: Option<String>,
    /// Relative expensiveness, 0 (free) to 4 (very expensive).
    #[serde(default)]
    pub price_level: Option<i32>,
    /// Category tags such as `"gym"` or `"point_of_interest"`.
    #[serde(default)]
    pub types: Vec<String>,
}
