use std::{fmt, time::Duration};

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point on the globe in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
}

/// Failure codes, numbered as in the W3C Geolocation API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionErrorCode {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl PositionErrorCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PositionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::PositionUnavailable => write!(f, "POSITION_UNAVAILABLE"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("unable to get the current position ({code})")]
pub struct PositionError {
    pub code: PositionErrorCode,
}

impl PositionError {
    pub fn new(code: PositionErrorCode) -> Self {
        Self { code }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionOptions {
    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Source of the device position. Single-shot: every call resolves once.
pub trait Geolocator: Send + Sync + 'static {
    fn current_position(&self) -> BoxFuture<'_, Result<Position, PositionError>>;
}

/// Request the current position, honoring the timeout in `options`.
pub async fn locate(
    geolocator: &dyn Geolocator,
    options: PositionOptions,
) -> Result<Position, PositionError> {
    let request = geolocator.current_position();
    match options.timeout {
        Some(timeout) => tokio::time::timeout(timeout, request)
            .await
            .unwrap_or(Err(PositionError::new(PositionErrorCode::Timeout))),
        None => request.await,
    }
}

/// Always reports the same coordinates.
#[derive(Clone, Debug)]
pub struct FixedGeolocator {
    coords: Coordinates,
}

impl FixedGeolocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coords: Coordinates {
                latitude,
                longitude,
            },
        }
    }
}

impl Geolocator for FixedGeolocator {
    fn current_position(&self) -> BoxFuture<'_, Result<Position, PositionError>> {
        let position = Position {
            coords: self.coords,
        };
        Box::pin(async move { Ok(position) })
    }
}

/// Always fails with the same code.
#[derive(Clone, Debug)]
pub struct FailingGeolocator {
    code: PositionErrorCode,
}

impl FailingGeolocator {
    pub fn new(code: PositionErrorCode) -> Self {
        Self { code }
    }
}

impl Geolocator for FailingGeolocator {
    fn current_position(&self) -> BoxFuture<'_, Result<Position, PositionError>> {
        let error = PositionError::new(self.code);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverGeolocator;

    impl Geolocator for NeverGeolocator {
        fn current_position(&self) -> BoxFuture<'_, Result<Position, PositionError>> {
            Box::pin(futures::future::pending())
        }
    }

    #[test]
    fn codes_follow_w3c_numbering() {
        assert_eq!(PositionErrorCode::from_code(1), PositionErrorCode::PermissionDenied);
        assert_eq!(PositionErrorCode::from_code(2), PositionErrorCode::PositionUnavailable);
        assert_eq!(PositionErrorCode::from_code(3), PositionErrorCode::Timeout);
        assert_eq!(PositionErrorCode::from_code(0), PositionErrorCode::Unknown);
        assert_eq!(PositionErrorCode::from_code(7), PositionErrorCode::Unknown);
    }

    #[tokio::test]
    async fn fixed_geolocator_reports_its_coordinates() {
        let geolocator = FixedGeolocator::new(-23.55, -46.63);

        let position = locate(&geolocator, PositionOptions::default()).await;

        assert_eq!(
            position.unwrap().coords,
            Coordinates {
                latitude: -23.55,
                longitude: -46.63
            }
        );
    }

    #[tokio::test]
    async fn failing_geolocator_reports_its_code() {
        let geolocator = FailingGeolocator::new(PositionErrorCode::PositionUnavailable);

        let position = locate(&geolocator, PositionOptions::default()).await;

        assert_eq!(
            position.unwrap_err().code,
            PositionErrorCode::PositionUnavailable
        );
    }

    #[tokio::test(start_paused = true)]
    async fn locate_times_out() {
        let options = PositionOptions {
            timeout: Some(Duration::from_secs(10)),
        };

        let position = locate(&NeverGeolocator, options).await;

        assert_eq!(position.unwrap_err().code, PositionErrorCode::Timeout);
    }
}
