mod api_interfaces;
pub mod cep;
pub mod client;
pub mod constants;
pub mod error;
pub mod events;
pub mod geolocation;
pub mod icons;
pub mod postal;
pub mod reverse;
pub mod search;
pub mod surface;
pub mod util;

pub use cep::Cep;
pub use client::Client;
pub use search::AddressSearch;
pub use surface::Surface;
