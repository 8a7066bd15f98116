pub mod client;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use normalize::{normalize_place, Business};
pub use pipeline::{fetch_county_businesses, BusinessQuery};
pub use types::{GeocodeResult, LatLng, PlaceResult};
