//! Search response shared by Nominatim-compatible services.
//!
//! Nominatim and LocationIQ both answer `/search` with a JSON array of
//! places whose `lat`/`lon` are decimal strings.

use serde::Deserialize;

use crate::domain::Coordinate;

use super::error::GeocodeError;

/// A single place from a `/search` response. Other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl SearchHit {
    /// Parse the decimal-string coordinates.
    fn coordinate(&self) -> Result<Coordinate, GeocodeError> {
        let parse = |field: &str, value: &str| {
            value.trim().parse::<f64>().map_err(|e| GeocodeError::Json {
                message: format!("invalid {field} {value:?}: {e}"),
            })
        };
        let lat = parse("lat", &self.lat)?;
        let lon = parse("lon", &self.lon)?;
        Ok(Coordinate::new(lat, lon)?)
    }
}

/// Parse a `/search` body and take the best (first) hit.
pub fn first_hit(body: &str) -> Result<Coordinate, GeocodeError> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|e| GeocodeError::Json {
        message: e.to_string(),
    })?;

    hits.first()
        .ok_or(GeocodeError::NotFound)
        .and_then(SearchHit::coordinate)
}

/// Map a `/search` HTTP response to its body or a typed error.
///
/// `not_found_status` names a status the service uses to mean "no match"
/// (LocationIQ answers 404 instead of an empty array).
pub async fn read_search_response(
    response: reqwest::Response,
    not_found_status: Option<reqwest::StatusCode>,
) -> Result<String, GeocodeError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(GeocodeError::Unauthorized);
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(GeocodeError::RateLimited);
    }

    if Some(status) == not_found_status {
        return Err(GeocodeError::NotFound);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GeocodeError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    Ok(response.text().await?)
}
