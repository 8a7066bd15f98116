//! HTTP client for the Google Maps Platform web services.
//!
//! Wraps `reqwest` with API key management, typed response deserialization,
//! and the page-token pagination protocol shared by the Places search
//! endpoints. Every endpoint checks the `"status"` field in the JSON envelope
//! and surfaces provider-level errors as [`PlacesError::Geocode`] or
//! [`PlacesError::Search`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{GeocodeResponse, GeocodeResult, LatLng, PlaceResult, PlacesResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

pub(crate) const GEOCODE_PATH: &str = "geocode/json";
pub(crate) const TEXT_SEARCH_PATH: &str = "place/textsearch/json";
pub(crate) const NEARBY_SEARCH_PATH: &str = "place/nearbysearch/json";

/// Client for the Google Geocoding and Places web services.
///
/// Manages the HTTP client, API key, base URL, and the pagination timing
/// knobs. Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    page_delay: Duration,
    max_pages: u32,
}

impl PlacesClient {
    /// Creates a new client pointed at the production Google Maps API.
    ///
    /// `page_delay_ms` is the pause between paginated requests (Google's
    /// `next_page_token` is not queryable immediately after issue) and
    /// `max_pages` bounds how many pages a single search may fetch.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        page_delay_ms: u64,
        max_pages: u32,
    ) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, page_delay_ms, max_pages, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        page_delay_ms: u64,
        max_pages: u32,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("countylens/0.1 (county-business-lookup)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joining relative endpoint paths appends rather than replaces the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            page_delay: Duration::from_millis(page_delay_ms),
            max_pages,
        })
    }

    /// Resolves a county and state name to a canonical address and center point.
    ///
    /// Appends `" County"` to the name when it lacks the suffix, then queries
    /// `geocode/json` for `"<county>, <state>, USA"`. Exactly one network
    /// call is made; there are no retries. The first candidate returned by
    /// the provider is authoritative.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Geocode`] if the provider reports a non-OK status or
    ///   no candidates, carrying the provider's `error_message` when present.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode_county(
        &self,
        county_name: &str,
        state_name: &str,
    ) -> Result<GeocodeResult, PlacesError> {
        let formatted_county = format_county_name(county_name);
        let address = format!("{formatted_county}, {state_name}, USA");

        let url = self.build_url(GEOCODE_PATH, &[("address", address.as_str())])?;
        let body = self.request_json(&url).await?;

        let response: GeocodeResponse =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("geocode({address})"),
                source: e,
            })?;

        if response.status != "OK" {
            tracing::warn!(status = %response.status, %address, "geocoding rejected");
            return Err(PlacesError::Geocode(response.error_message.unwrap_or_else(
                || format!("Unable to find {formatted_county}, {state_name}"),
            )));
        }

        let first = response.results.into_iter().next().ok_or_else(|| {
            PlacesError::Geocode(format!("Unable to find {formatted_county}, {state_name}"))
        })?;

        Ok(GeocodeResult {
            formatted_address: first.formatted_address,
            location: first.geometry.location,
        })
    }

    /// Runs a free-text Places search around `location`.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_paged`].
    pub async fn search_text(
        &self,
        query: &str,
        location: LatLng,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let location = format_location(location);
        let radius = radius_meters.to_string();
        self.fetch_paged(
            TEXT_SEARCH_PATH,
            &[
                ("query", query),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
            ],
        )
        .await
    }

    /// Runs a keyword Places search around `location` against the nearby
    /// search endpoint.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_paged`].
    pub async fn search_nearby(
        &self,
        keyword: &str,
        location: LatLng,
        radius_meters: u32,
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let location = format_location(location);
        let radius = radius_meters.to_string();
        self.fetch_paged(
            NEARBY_SEARCH_PATH,
            &[
                ("keyword", keyword),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
            ],
        )
        .await
    }

    /// Drives the provider's page-token pagination protocol for one search.
    ///
    /// The first request carries the caller's query parameters; continuation
    /// requests carry only the API key and the `pagetoken` from the previous
    /// page. Per-page status handling:
    ///
    /// - `"OK"` — results are accumulated; when a `next_page_token` is
    ///   present the loop sleeps the configured page delay before continuing,
    ///   because tokens are not queryable immediately after issue.
    /// - `"ZERO_RESULTS"` — terminal success with whatever has accumulated.
    /// - `"INVALID_REQUEST"` while holding a token — the token has not
    ///   propagated yet; sleep the same delay and retry the same token. On
    ///   the first page this status is a genuine request error and is fatal.
    /// - anything else — fatal [`PlacesError::Search`].
    ///
    /// Terminates when no further token is returned or after `max_pages`
    /// completed pages, whichever comes first.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Search`] on an unrecoverable provider status,
    ///   carrying the provider's `error_message` when present.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if a page body does not match the
    ///   expected shape.
    pub(crate) async fn fetch_paged(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<PlaceResult>, PlacesError> {
        let mut collected: Vec<PlaceResult> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count: u32 = 0;

        loop {
            let url = match page_token.as_deref() {
                Some(token) => self.build_url(path, &[("pagetoken", token)])?,
                None => self.build_url(path, params)?,
            };

            let body = self.request_json(&url).await?;
            let response: PlacesResponse =
                serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                    context: path.to_owned(),
                    source: e,
                })?;

            match response.status.as_str() {
                "OK" => {
                    collected.extend(response.results);
                    page_token = response.next_page_token;
                    page_count += 1;

                    if page_token.is_some() {
                        tokio::time::sleep(self.page_delay).await;
                    }
                }
                "ZERO_RESULTS" => break,
                "INVALID_REQUEST" if page_token.is_some() => {
                    // Token not yet valid on the provider side; the same
                    // token succeeds after a pause.
                    tracing::debug!(path, page_count, "page token not ready, retrying");
                    tokio::time::sleep(self.page_delay).await;
                }
                status => {
                    tracing::warn!(path, %status, "place search rejected");
                    return Err(PlacesError::Search(
                        response
                            .error_message
                            .unwrap_or_else(|| format!("Google Places error: {status}")),
                    ));
                }
            }

            if page_token.is_none() || page_count >= self.max_pages {
                break;
            }
        }

        Ok(collected)
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters. The API key is always appended first.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

/// Appends `" County"` to a county name unless the name already contains the
/// word (case-insensitively), so `"Fulton"` and `"Fulton County"` both
/// geocode as `"Fulton County"`.
fn format_county_name(county_name: &str) -> String {
    if county_name.to_lowercase().contains("county") {
        county_name.to_owned()
    } else {
        format!("{county_name} County")
    }
}

/// Formats a coordinate pair as the `"<lat>,<lng>"` string the search
/// endpoints expect for their `location` parameter.
fn format_location(location: LatLng) -> String {
    format!("{},{}", location.lat, location.lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> PlacesClient {
        PlacesClient::with_base_url("test-key", 30, 0, 3, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_constructs_correct_query_string() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client
            .build_url(GEOCODE_PATH, &[("address", "Fulton County, Georgia, USA")])
            .expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/geocode/json?key=test-key&address=Fulton+County%2C+Georgia%2C+USA"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://maps.googleapis.com/maps/api/");
        let url = client
            .build_url(TEXT_SEARCH_PATH, &[("query", "gyms")])
            .expect("url should build");
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/textsearch/json?key=test-key&query=gyms"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client
            .build_url(TEXT_SEARCH_PATH, &[("query", "coffee & tea")])
            .expect("url should build");
        assert!(
            url.as_str().contains("coffee+%26+tea") || url.as_str().contains("coffee%20%26%20tea"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn with_base_url_rejects_invalid_url() {
        let result = PlacesClient::with_base_url("test-key", 30, 0, 3, "not a url");
        assert!(
            matches!(result, Err(PlacesError::InvalidBaseUrl { .. })),
            "expected InvalidBaseUrl"
        );
    }

    #[test]
    fn format_county_name_appends_suffix() {
        assert_eq!(format_county_name("Fulton"), "Fulton County");
    }

    #[test]
    fn format_county_name_keeps_existing_suffix() {
        assert_eq!(format_county_name("Fulton County"), "Fulton County");
    }

    #[test]
    fn format_county_name_matches_suffix_case_insensitively() {
        assert_eq!(format_county_name("fulton county"), "fulton county");
        assert_eq!(format_county_name("FULTON COUNTY"), "FULTON COUNTY");
    }

    #[test]
    fn format_location_joins_with_comma() {
        let loc = LatLng {
            lat: 33.7896,
            lng: -84.3843,
        };
        assert_eq!(format_location(loc), "33.7896,-84.3843");
    }
}
