use serde::Deserialize;

/// Raw Nominatim reverse geocoding payload.
#[derive(Deserialize)]
pub struct Response {
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Address,
}

/// Raw address breakdown. Settlements are reported under whichever of
/// `city`, `town` or `village` matches their size.
#[derive(Deserialize, Default)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}
