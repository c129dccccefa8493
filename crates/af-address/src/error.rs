use thiserror::Error;

use crate::geolocation::{PositionError, PositionErrorCode};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("the request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("the request failed with status code: {0}")]
    ResponseError(reqwest::StatusCode),
    #[error("the response body could not be read: {0}")]
    ResponseBodyError(#[source] reqwest::Error),
    #[error("unable to parse the response body: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("the service has no address for this query")]
    NotFound,
}

/// A failed search, as shown to the user in an error banner.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Digite um CEP válido (ex: 01234-567)")]
    InvalidCep,
    #[error("CEP não encontrado")]
    CepNotFound,
    #[error("Erro ao buscar CEP. Tente novamente.")]
    CepTransport(#[source] LookupError),
    #[error("Geolocalização não suportada neste dispositivo")]
    GeolocationUnsupported,
    #[error("Permissão de localização negada")]
    PermissionDenied,
    #[error("Localização indisponível")]
    PositionUnavailable,
    #[error("Timeout ao obter localização")]
    Timeout,
    #[error("Erro desconhecido ao obter localização")]
    UnknownGeolocation,
    #[error("Não foi possível obter o endereço da localização")]
    LocationNotFound,
    #[error("Erro ao obter endereço da localização")]
    LocationTransport(#[source] LookupError),
    /// The trigger controls are disabled while another search is running.
    #[error("uma busca já está em andamento")]
    Busy,
}

impl SearchError {
    pub(crate) fn from_postal(error: LookupError) -> Self {
        match error {
            LookupError::NotFound => Self::CepNotFound,
            other => Self::CepTransport(other),
        }
    }

    pub(crate) fn from_reverse(error: LookupError) -> Self {
        match error {
            LookupError::NotFound => Self::LocationNotFound,
            other => Self::LocationTransport(other),
        }
    }
}

impl From<PositionError> for SearchError {
    fn from(error: PositionError) -> Self {
        match error.code {
            PositionErrorCode::PermissionDenied => Self::PermissionDenied,
            PositionErrorCode::PositionUnavailable => Self::PositionUnavailable,
            PositionErrorCode::Timeout => Self::Timeout,
            PositionErrorCode::Unknown => Self::UnknownGeolocation,
        }
    }
}
