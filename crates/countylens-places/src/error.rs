use thiserror::Error;

/// Errors returned by the Google Maps Platform client and lookup pipeline.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The geocoder found no match for the county, or reported a non-OK status.
    #[error("geocoding failed: {0}")]
    Geocode(String),

    /// A place search page came back with an unrecoverable status.
    #[error("place search failed: {0}")]
    Search(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL cannot be combined with an endpoint path.
    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl PlacesError {
    /// Whether this failure is a transport-level problem (network, TLS,
    /// malformed body) rather than a provider-reported one. Serving layers
    /// use this to substitute a generic retry message instead of leaking
    /// transport detail to end users.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, PlacesError::Http(_) | PlacesError::Deserialize { .. })
    }
}
