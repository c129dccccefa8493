use std::time::Duration;

/// The default endpoint format for the ViaCEP postal code service
pub const DEFAULT_POSTAL_SERVICE_URL_FORMAT: &str = "https://viacep.com.br/ws/$cep/json/";
pub const DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN: &str = "$cep";

/// The default endpoint for the Nominatim reverse geocoding service
pub const DEFAULT_REVERSE_SERVICE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Nominatim rejects requests without an identifying user agent.
pub const USER_AGENT: &str = concat!("address-finder/", env!("CARGO_PKG_VERSION"));

/// How long an error banner stays on the surface.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

pub const SEARCH_LABEL: &str = "Buscar CEP";
pub const LOCATION_LABEL: &str = "Usar minha localização";
pub const SEARCHING_MESSAGE: &str = "Buscando...";
pub const LOCATING_MESSAGE: &str = "Obtendo localização...";
pub const NOT_AVAILABLE: &str = "N/A";
