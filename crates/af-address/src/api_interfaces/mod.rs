pub mod nominatim;
pub mod viacep;
