use thiserror::Error;

use crate::{
    cep::Cep,
    error::LookupError,
    geolocation::Coordinates,
    postal::{self, PostalEndpoint, PostalLookupResult},
    reverse::{self, LocationLookupResult},
    util::default_http_client,
};

#[derive(Clone, Debug)]
pub struct Client {
    http_client: reqwest::Client,
    postal: Option<PostalEndpoint>,
    reverse_url: Option<String>,
}

/// Overrides for the service endpoints. Anything left `None` uses the
/// public ViaCEP and Nominatim services.
#[derive(Clone, Debug, Default)]
pub struct EndpointConfig {
    pub postal: Option<Endpoint>,
    pub reverse: Option<Endpoint>,
}

#[derive(Debug, Error, PartialEq)]
pub enum EndpointConfigError {
    #[error("the postal endpoint format is missing")]
    MissingEndpoint,
    #[error("missing replace token for the postal endpoint (url: {0})")]
    MissingReplaceToken(String),
    #[error("replace token `{1}` does not occur in the postal endpoint (url: {0})")]
    ReplaceTokenNotInEndpoint(String, String),
    #[error("unnecessary replace token `{0}` provided in the reverse endpoint")]
    UnnecessaryReplaceToken(String),
}

impl EndpointConfig {
    pub fn validate(&self) -> Result<(), EndpointConfigError> {
        self.postal_endpoint()?;
        self.reverse_url()?;
        Ok(())
    }

    fn postal_endpoint(&self) -> Result<Option<PostalEndpoint>, EndpointConfigError> {
        self.postal
            .as_ref()
            .map(|endpoint| {
                PostalEndpoint::try_new(
                    endpoint.url.clone(),
                    endpoint.replace_token.clone().unwrap_or_default(),
                )
            })
            .transpose()
    }

    fn reverse_url(&self) -> Result<Option<String>, EndpointConfigError> {
        match &self.reverse {
            Some(Endpoint {
                replace_token: Some(token),
                ..
            }) => Err(EndpointConfigError::UnnecessaryReplaceToken(token.clone())),
            Some(endpoint) => Ok(Some(endpoint.url.clone())),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Endpoint {
    pub url: String,
    pub replace_token: Option<String>,
}

#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid endpoint configuration: {0}")]
    InvalidEndpointConfig(#[from] EndpointConfigError),
    #[error("unable to build the HTTP client: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl Client {
    pub fn new(
        http_client: reqwest::Client,
        endpoints: Option<EndpointConfig>,
    ) -> Result<Self, ClientInitError> {
        let endpoints = endpoints.unwrap_or_default();
        Ok(Self {
            http_client,
            postal: endpoints.postal_endpoint()?,
            reverse_url: endpoints.reverse_url()?,
        })
    }

    /// A client for the public ViaCEP and Nominatim services.
    pub fn with_defaults() -> Result<Self, ClientInitError> {
        Self::new(default_http_client()?, None)
    }

    pub async fn lookup_postal_code(&self, cep: &Cep) -> Result<PostalLookupResult, LookupError> {
        postal::get(cep, &self.http_client, self.postal.as_ref()).await
    }

    pub async fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> Result<LocationLookupResult, LookupError> {
        reverse::get(coords, &self.http_client, self.reverse_url.as_deref()).await
    }
}
