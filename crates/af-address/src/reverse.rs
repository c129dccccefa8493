use serde::{Deserialize, Serialize};

use crate::{
    api_interfaces::nominatim,
    constants::{DEFAULT_REVERSE_SERVICE_URL, NOT_AVAILABLE},
    error::LookupError,
    geolocation::Coordinates,
};

/// Address returned for a coordinate pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLookupResult {
    pub display_name: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

impl LocationLookupResult {
    /// Text written back into the input field.
    pub fn full_address(&self) -> &str {
        &self.display_name
    }

    pub fn info_rows(&self) -> Vec<(&'static str, String)> {
        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        vec![
            ("Endereço", self.display_name.clone()),
            ("Cidade", or_na(&self.city)),
            ("Estado", or_na(&self.region)),
            ("País", or_na(&self.country)),
        ]
    }
}

impl TryFrom<nominatim::Response> for LocationLookupResult {
    type Error = LookupError;

    fn try_from(response: nominatim::Response) -> Result<Self, LookupError> {
        let display_name = response
            .display_name
            .filter(|name| !name.is_empty())
            .ok_or(LookupError::NotFound)?;
        let address = response.address;
        Ok(Self {
            display_name,
            city: address.city.or(address.town).or(address.village),
            region: address.state,
            country: address.country,
        })
    }
}

/// Reverse geocode a coordinate pair.
pub async fn get(
    coords: Coordinates,
    client: &reqwest::Client,
    endpoint: Option<&str>,
) -> Result<LocationLookupResult, LookupError> {
    let url = endpoint.unwrap_or(DEFAULT_REVERSE_SERVICE_URL);
    tracing::debug!(%url, lat = coords.latitude, lon = coords.longitude, "reverse geocoding");
    let response = client
        .get(url)
        .query(&[
            ("format", "json".to_string()),
            ("lat", coords.latitude.to_string()),
            ("lon", coords.longitude.to_string()),
            ("addressdetails", "1".to_string()),
        ])
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(LookupError::ResponseError(response.status()));
    }
    let body = response.text().await.map_err(LookupError::ResponseBodyError)?;
    let parsed_body: nominatim::Response = serde_json::from_str(&body)?;
    LocationLookupResult::try_from(parsed_body)
}
