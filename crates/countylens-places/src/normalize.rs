//! Mapping from provider-native place records to the stable business shape
//! returned to callers.

use serde::Serialize;

use crate::types::PlaceResult;

/// Literal used when neither address field survives the fallback chain.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// A provider-agnostic business record, the externally visible unit of the
/// lookup pipeline. Serializes with camelCase field names for the map
/// frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub place_id: String,
    pub name: String,
    pub address: String,
    /// Provider rating on its native 0–5 scale. Absent means unrated, which
    /// is deliberately distinct from a true zero rating.
    pub rating: Option<f64>,
    pub total_ratings: u32,
    pub price_level: Option<i32>,
    pub types: Vec<String>,
}

/// Normalizes one raw place record. Pure and element-wise; callers map it
/// over a result list without reordering.
///
/// - `address` is the first non-empty of `formatted_address` / `vicinity`,
///   else the [`ADDRESS_UNAVAILABLE`] literal.
/// - `rating` passes through untouched — an absent rating stays absent.
/// - `user_ratings_total` defaults to 0 when omitted.
#[must_use]
pub fn normalize_place(place: PlaceResult) -> Business {
    let address = [place.formatted_address, place.vicinity]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or_else(|| ADDRESS_UNAVAILABLE.to_owned());

    Business {
        place_id: place.place_id,
        name: place.name,
        address,
        rating: place.rating,
        total_ratings: place.user_ratings_total.unwrap_or(0),
        price_level: place.price_level,
        types: place.types,
    }
}
