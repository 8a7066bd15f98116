//! The county business lookup pipeline.
//!
//! Sequential orchestration of geocode → paged text search → conditional
//! nearby fallback → de-duplication → normalization → ranking. No step runs
//! in parallel: whether the nearby search fires at all depends on the text
//! search's result count. State is confined to function-local accumulators;
//! the pipeline holds nothing across invocations.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::normalize::{normalize_place, Business};
use crate::types::PlaceResult;

/// When text search yields fewer results than this, the nearby keyword
/// search tops up the list. Free-text search is high-precision but sparse
/// for niche categories.
pub(crate) const NEARBY_FALLBACK_THRESHOLD: usize = 5;

/// One validated lookup request.
#[derive(Debug, Clone)]
pub struct BusinessQuery {
    pub county_name: String,
    pub state_name: String,
    pub business_type: String,
    pub radius_meters: u32,
}

/// Runs the full lookup pipeline and returns the ranked business list.
///
/// # Errors
///
/// - [`PlacesError::Geocode`] when the county cannot be resolved; no search
///   call is made in that case.
/// - [`PlacesError::Search`] when either search strategy hits an
///   unrecoverable provider status.
/// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport
///   failures. Nothing is retried here beyond the paged runner's own
///   token-propagation handling; every failure aborts the pipeline.
pub async fn fetch_county_businesses(
    client: &PlacesClient,
    query: &BusinessQuery,
) -> Result<Vec<Business>, PlacesError> {
    let geocoded = client
        .geocode_county(&query.county_name, &query.state_name)
        .await?;
    tracing::debug!(address = %geocoded.formatted_address, "geocoded county");

    let text_query = format!(
        "{} in {} County, {}",
        query.business_type, query.county_name, query.state_name
    );
    let mut places = client
        .search_text(&text_query, geocoded.location, query.radius_meters)
        .await?;

    if places.len() < NEARBY_FALLBACK_THRESHOLD {
        tracing::debug!(
            text_results = places.len(),
            "sparse text results, running nearby fallback"
        );
        let nearby = client
            .search_nearby(&query.business_type, geocoded.location, query.radius_meters)
            .await?;
        merge_unique(&mut places, nearby);
    }

    let mut businesses: Vec<Business> = places.into_iter().map(normalize_place).collect();
    rank_businesses(&mut businesses);
    Ok(businesses)
}

/// Merges nearby results into the text results, dropping any whose identity
/// was already seen. The seen-set is seeded from the text identities and
/// grows as nearby records are admitted, so duplicates among the nearby
/// results themselves are also suppressed. Order is preserved: text results
/// first, then admitted nearby results in their returned order.
fn merge_unique(places: &mut Vec<PlaceResult>, nearby: Vec<PlaceResult>) {
    let mut seen: HashSet<String> = places.iter().map(|p| p.place_id.clone()).collect();
    for place in nearby {
        if seen.insert(place.place_id.clone()) {
            places.push(place);
        }
    }
}

/// Sorts businesses by rating descending, then review count descending.
///
/// An absent rating compares as 0 but is never written back — the stored
/// `rating` stays absent. The sort is stable, so records with equal keys
/// keep their merge order.
pub fn rank_businesses(businesses: &mut [Business]) {
    businesses.sort_by(|a, b| {
        let by_rating = b
            .rating
            .unwrap_or(0.0)
            .partial_cmp(&a.rating.unwrap_or(0.0))
            .unwrap_or(Ordering::Equal);
        by_rating.then_with(|| b.total_ratings.cmp(&a.total_ratings))
    });
}
