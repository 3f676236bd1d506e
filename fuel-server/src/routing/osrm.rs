//! OSRM driving-route client.

use serde::Deserialize;

use crate::domain::Coordinate;

use super::error::RoutingError;
use super::{RouteGeometry, RouteProvider};

/// Default base URL for the public OSRM demo server.
const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

const MILES_PER_METRE: f64 = 0.000621371;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `/route/v1` response body. Only the fields we use.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres.
    distance: f64,
    geometry: GeoJsonLine,
}

/// GeoJSON `LineString`; positions are `[lon, lat]`.
#[derive(Debug, Deserialize)]
struct GeoJsonLine {
    coordinates: Vec<[f64; 2]>,
}

/// Turn a response body into route geometry.
fn parse_route(body: &str) -> Result<RouteGeometry, RoutingError> {
    let response: RouteResponse = serde_json::from_str(body).map_err(|e| RoutingError::Json {
        message: e.to_string(),
    })?;

    if response.code != "Ok" {
        return Err(RoutingError::NoRoute {
            code: response.code,
        });
    }

    let Some(route) = response.routes.into_iter().next() else {
        return Err(RoutingError::NoRoute {
            code: "empty routes".to_string(),
        });
    };

    let coordinates = route
        .geometry
        .coordinates
        .iter()
        .map(|[lon, lat]| Coordinate::new(*lat, *lon))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RouteGeometry {
        coordinates,
        distance_miles: route.distance * MILES_PER_METRE,
    })
}

/// Client for the OSRM `route` service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    /// Create a new OSRM client.
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude()
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteGeometry, RoutingError> {
        let response = self
            .http
            .get(self.route_url(from, to))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OSRM answers 400 with a JSON `code` when no route exists.
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            return Err(RoutingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_route(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = OsrmConfig::default();
        assert_eq!(config.base_url, "http://router.project-osrm.org");
        assert_eq!(config.timeout_secs, 10);

        let config = config.with_base_url("http://localhost:5000").with_timeout(2);
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn url_is_lon_lat() {
        let client = OsrmClient::new(OsrmConfig::new().with_base_url("http://osrm")).unwrap();
        let from = Coordinate::new(40.7, -74.0).unwrap();
        let to = Coordinate::new(41.9, -87.6).unwrap();
        assert_eq!(
            client.route_url(from, to),
            "http://osrm/route/v1/driving/-74,40.7;-87.6,41.9"
        );
    }

    #[test]
    fn parses_geojson_route() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 160934.4,
                "duration": 5400.0,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-97.5, 35.4], [-97.0, 35.5], [-96.5, 35.6]]
                }
            }],
            "waypoints": []
        }"#;

        let route = parse_route(body).unwrap();
        assert_eq!(route.coordinates.len(), 3);
        assert_eq!(route.coordinates[0].latitude(), 35.4);
        assert_eq!(route.coordinates[0].longitude(), -97.5);
        assert!((route.distance_miles - 100.0).abs() < 0.01);
    }

    #[test]
    fn non_ok_code_is_no_route() {
        let body = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        assert!(matches!(
            parse_route(body),
            Err(RoutingError::NoRoute { code }) if code == "NoRoute"
        ));
    }

    #[test]
    fn ok_without_routes_is_no_route() {
        assert!(matches!(
            parse_route(r#"{"code": "Ok", "routes": []}"#),
            Err(RoutingError::NoRoute { .. })
        ));
    }

    #[test]
    fn garbled_body_is_json_error() {
        assert!(matches!(
            parse_route("<html>"),
            Err(RoutingError::Json { .. })
        ));
    }

    #[test]
    fn invalid_point_rejected() {
        let body = r#"{"code": "Ok", "routes": [{"distance": 1.0,
            "geometry": {"coordinates": [[-97.5, 135.4]]}}]}"#;
        assert!(matches!(
            parse_route(body),
            Err(RoutingError::InvalidCoordinate(_))
        ));
    }
}
