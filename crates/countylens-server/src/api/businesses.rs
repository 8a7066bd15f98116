use axum::{extract::Query, extract::State, Extension, Json};
use serde::Deserialize;

use countylens_places::{fetch_county_businesses, Business, BusinessQuery, PlacesError};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Query string sent by the map frontend when a county is selected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BusinessesParams {
    county_name: Option<String>,
    state_id: Option<String>,
    business_type: Option<String>,
    radius_meters: Option<u32>,
}

pub(super) async fn list_businesses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<BusinessesParams>,
) -> Result<Json<ApiResponse<Vec<Business>>>, ApiError> {
    let query = validate_params(&req_id.0, &params, state.config.default_search_radius_meters)?;

    tracing::info!(
        county = %query.county_name,
        state = %query.state_name,
        business_type = %query.business_type,
        radius = query.radius_meters,
        "business lookup requested"
    );

    let businesses = fetch_county_businesses(&state.places, &query)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: businesses,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Checks the caller-supplied parameters and resolves the state FIPS id,
/// producing a validated [`BusinessQuery`]. All failures here are
/// precondition failures reported as `bad_request` before any network call.
fn validate_params(
    request_id: &str,
    params: &BusinessesParams,
    default_radius_meters: u32,
) -> Result<BusinessQuery, ApiError> {
    let county_name = require_non_empty(request_id, params.county_name.as_deref(), "countyName")?;
    let business_type =
        require_non_empty(request_id, params.business_type.as_deref(), "businessType")?;
    let state_id = require_non_empty(request_id, params.state_id.as_deref(), "stateId")?;

    let state_name = countylens_core::state_name_from_fips(&state_id).ok_or_else(|| {
        ApiError::new(
            request_id,
            "bad_request",
            "Unable to determine state name for the selected county.",
        )
    })?;

    let radius_meters = match params.radius_meters {
        Some(0) => {
            return Err(ApiError::new(
                request_id,
                "bad_request",
                "radiusMeters must be a positive integer",
            ))
        }
        Some(radius) => radius,
        None => default_radius_meters,
    };

    Ok(BusinessQuery {
        county_name,
        state_name: state_name.to_owned(),
        business_type,
        radius_meters,
    })
}

fn require_non_empty(
    request_id: &str,
    value: Option<&str>,
    param: &str,
) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ApiError::new(
            request_id,
            "bad_request",
            format!("{param} is required"),
        )),
    }
}

/// Maps pipeline failures onto the API error envelope. Provider-reported
/// failures keep their message; transport failures get a generic retry
/// message so raw network detail never reaches the browser.
fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    if error.is_transport() {
        tracing::error!(error = %error, "places transport failure");
        return ApiError::new(
            request_id,
            "upstream_error",
            "Unable to reach the mapping provider. Please try again.",
        );
    }

    match error {
        PlacesError::Geocode(message) | PlacesError::Search(message) => {
            ApiError::new(request_id, "upstream_error", message.clone())
        }
        _ => {
            tracing::error!(error = %error, "business lookup failed");
            ApiError::new(request_id, "internal_error", "business lookup failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use countylens_core::AppConfig;
    use countylens_places::PlacesClient;

    use super::super::build_app;
    use super::*;

    fn params(
        county_name: Option<&str>,
        state_id: Option<&str>,
        business_type: Option<&str>,
        radius_meters: Option<u32>,
    ) -> BusinessesParams {
        BusinessesParams {
            county_name: county_name.map(ToOwned::to_owned),
            state_id: state_id.map(ToOwned::to_owned),
            business_type: business_type.map(ToOwned::to_owned),
            radius_meters,
        }
    }

    #[test]
    fn validate_params_builds_query_with_defaults() {
        let query = validate_params(
            "r",
            &params(Some("Fulton"), Some("13"), Some("gyms"), None),
            30_000,
        )
        .expect("params should validate");

        assert_eq!(query.county_name, "Fulton");
        assert_eq!(query.state_name, "Georgia");
        assert_eq!(query.business_type, "gyms");
        assert_eq!(query.radius_meters, 30_000);
    }

    #[test]
    fn validate_params_rejects_missing_county() {
        let err = validate_params("r", &params(None, Some("13"), Some("gyms"), None), 30_000)
            .expect_err("missing county must fail");
        assert_eq!(err.error.code, "bad_request");
        assert_eq!(err.error.message, "countyName is required");
    }

    #[test]
    fn validate_params_rejects_blank_business_type() {
        let err = validate_params(
            "r",
            &params(Some("Fulton"), Some("13"), Some("   "), None),
            30_000,
        )
        .expect_err("blank business type must fail");
        assert_eq!(err.error.code, "bad_request");
    }

    #[test]
    fn validate_params_rejects_unknown_state_id() {
        let err = validate_params(
            "r",
            &params(Some("Fulton"), Some("99"), Some("gyms"), None),
            30_000,
        )
        .expect_err("unknown FIPS must fail");
        assert_eq!(err.error.code, "bad_request");
        assert_eq!(
            err.error.message,
            "Unable to determine state name for the selected county."
        );
    }

    #[test]
    fn validate_params_rejects_zero_radius() {
        let err = validate_params(
            "r",
            &params(Some("Fulton"), Some("13"), Some("gyms"), Some(0)),
            30_000,
        )
        .expect_err("zero radius must fail");
        assert_eq!(err.error.code, "bad_request");
    }

    #[test]
    fn map_places_error_keeps_provider_messages() {
        let err = map_places_error(
            "r".to_owned(),
            &PlacesError::Geocode("Unable to find Nowhere County, Georgia".to_owned()),
        );
        assert_eq!(err.error.code, "upstream_error");
        assert_eq!(err.error.message, "Unable to find Nowhere County, Georgia");
    }

    #[test]
    fn map_places_error_hides_transport_detail() {
        let source = serde_json::from_str::<()>("not json").expect_err("invalid json");
        let err = map_places_error(
            "r".to_owned(),
            &PlacesError::Deserialize {
                context: "geocode".to_owned(),
                source,
            },
        );
        assert_eq!(err.error.code, "upstream_error");
        assert_eq!(
            err.error.message,
            "Unable to reach the mapping provider. Please try again."
        );
    }

    fn state_for(base_url: &str) -> AppState {
        let config = AppConfig {
            env: countylens_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("valid addr"),
            log_level: "info".to_owned(),
            google_maps_api_key: "test-key".to_owned(),
            places_request_timeout_secs: 5,
            places_page_delay_ms: 0,
            places_max_pages: 3,
            default_search_radius_meters: 30_000,
        };
        let places = PlacesClient::with_base_url("test-key", 5, 0, 3, base_url)
            .expect("client should build");
        AppState {
            config: Arc::new(config),
            places: Arc::new(places),
        }
    }

    #[tokio::test]
    async fn endpoint_returns_ranked_businesses() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "Fulton County, GA, USA",
                    "geometry": { "location": { "lat": 33.79, "lng": -84.38 } }
                }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/place/textsearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "status": "OK",
                "results": [
                    { "place_id": "a", "name": "A", "rating": 4.0, "user_ratings_total": 10,
                      "formatted_address": "1 Main St" },
                    { "place_id": "b", "name": "B", "rating": 4.8, "user_ratings_total": 25,
                      "formatted_address": "2 Main St" },
                    { "place_id": "c", "name": "C", "rating": 4.4, "user_ratings_total": 5,
                      "formatted_address": "3 Main St" },
                    { "place_id": "d", "name": "D", "rating": 4.2, "user_ratings_total": 5,
                      "formatted_address": "4 Main St" },
                    { "place_id": "e", "name": "E", "rating": 4.6, "user_ratings_total": 5,
                      "formatted_address": "5 Main St" }
                ]
            })))
            .mount(&server)
            .await;

        let app = build_app(state_for(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/businesses?countyName=Fulton&stateId=13&businessType=gyms")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body should parse");

        let ids: Vec<&str> = body["data"]
            .as_array()
            .expect("data should be an array")
            .iter()
            .map(|b| b["placeId"].as_str().expect("placeId present"))
            .collect();
        assert_eq!(ids, vec!["b", "e", "c", "d", "a"]);
        assert!(body["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn endpoint_maps_provider_rejection_to_bad_gateway() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
                "status": "REQUEST_DENIED",
                "results": [],
                "error_message": "The provided API key is invalid."
            })))
            .mount(&server)
            .await;

        let app = build_app(state_for(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/businesses?countyName=Fulton&stateId=13&businessType=gyms")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body should parse");
        assert_eq!(body["error"]["code"], "upstream_error");
        assert_eq!(body["error"]["message"], "The provided API key is invalid.");
    }

    #[tokio::test]
    async fn endpoint_rejects_unknown_state_without_calling_provider() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&json!({ "status": "OK" })))
            .expect(0)
            .mount(&server)
            .await;

        let app = build_app(state_for(&server.uri()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/businesses?countyName=Fulton&stateId=99&businessType=gyms")
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
