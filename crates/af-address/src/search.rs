//! The address search controller.
//!
//! Two flows share one surface: looking up the typed CEP, and reverse
//! geocoding the device position. Either flow disables both trigger buttons
//! while it runs, so at most one is in flight at a time.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use derive_builder::Builder;

use crate::{
    cep::{autoformat, Cep},
    client::Client,
    constants::{BANNER_TIMEOUT, LOCATING_MESSAGE, SEARCHING_MESSAGE, SEARCH_LABEL},
    error::SearchError,
    geolocation::{locate, Geolocator, PositionOptions},
    icons::IconRenderer,
    postal::PostalLookupResult,
    reverse::LocationLookupResult,
    surface::{Surface, LOADER_ICON, SEARCH_ICON},
};

#[derive(Builder, Clone, Debug, PartialEq)]
#[builder(default)]
pub struct SearchOptions {
    /// How long an error banner stays up.
    pub banner_timeout: Duration,
    /// Passed on to the geolocator. `None` waits indefinitely.
    #[builder(setter(strip_option))]
    pub position_timeout: Option<Duration>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            banner_timeout: BANNER_TIMEOUT,
            position_timeout: None,
        }
    }
}

#[derive(Clone)]
pub struct AddressSearch {
    surface: Arc<Mutex<Surface>>,
    client: Client,
    geolocator: Option<Arc<dyn Geolocator>>,
    icons: Option<Arc<dyn IconRenderer>>,
    options: SearchOptions,
}

fn lock<T>(surface: &Mutex<T>) -> MutexGuard<'_, T> {
    surface.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AddressSearch {
    /// A controller without geolocation support or icon rendering.
    pub fn new(surface: Surface, client: Client) -> Self {
        Self {
            surface: Arc::new(Mutex::new(surface)),
            client,
            geolocator: None,
            icons: None,
            options: SearchOptions::default(),
        }
    }

    pub fn with_geolocator(mut self, geolocator: impl Geolocator) -> Self {
        self.geolocator = Some(Arc::new(geolocator));
        self
    }

    pub fn with_icons(mut self, icons: impl IconRenderer) -> Self {
        self.icons = Some(Arc::new(icons));
        self.update(|surface| self.refresh_icons(surface));
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Current state of the surface. Do not hold the guard across an await.
    pub fn surface(&self) -> MutexGuard<'_, Surface> {
        lock(&self.surface)
    }

    fn update<R>(&self, f: impl FnOnce(&mut Surface) -> R) -> R {
        f(&mut lock(&self.surface))
    }

    fn refresh_icons(&self, surface: &mut Surface) {
        if let Some(icons) = &self.icons {
            icons.replace(surface);
        }
    }

    /// Look up the CEP typed into the input field. On success the details
    /// panel shows the address and the input is replaced by its one-line
    /// form.
    pub async fn search_by_cep(&self) -> Result<PostalLookupResult, SearchError> {
        let input = self.update(|surface| surface.input_value().unwrap_or_default().to_string());
        let Ok(cep) = Cep::parse(&input) else {
            return self.fail(SearchError::InvalidCep);
        };
        if !self.begin_loading(SEARCHING_MESSAGE) {
            return Err(SearchError::Busy);
        }

        match self.client.lookup_postal_code(&cep).await {
            Ok(address) => {
                tracing::info!(%cep, city = %address.city, "postal code found");
                self.update(|surface| {
                    surface.show_details(address.info_rows());
                    surface.set_input_value(address.full_address());
                    self.end_loading(surface);
                });
                Ok(address)
            }
            Err(e) => {
                self.update(|surface| self.end_loading(surface));
                self.fail(SearchError::from_postal(e))
            }
        }
    }

    /// Resolve the device position to an address.
    pub async fn use_geolocation(&self) -> Result<LocationLookupResult, SearchError> {
        let Some(geolocator) = self.geolocator.clone() else {
            return self.fail(SearchError::GeolocationUnsupported);
        };
        if !self.begin_loading(LOCATING_MESSAGE) {
            return Err(SearchError::Busy);
        }

        let options = PositionOptions {
            timeout: self.options.position_timeout,
        };
        let result = match locate(geolocator.as_ref(), options).await {
            Ok(position) => self
                .client
                .reverse_geocode(position.coords)
                .await
                .map_err(SearchError::from_reverse),
            Err(e) => Err(SearchError::from(e)),
        };

        match result {
            Ok(location) => {
                tracing::info!(display_name = %location.display_name, "location resolved");
                self.update(|surface| {
                    surface.show_details(location.info_rows());
                    surface.set_input_value(location.full_address());
                    self.end_loading(surface);
                });
                Ok(location)
            }
            Err(e) => {
                self.update(|surface| self.end_loading(surface));
                self.fail(e)
            }
        }
    }

    /// The user edited the input field.
    pub fn handle_input(&self, value: &str) {
        self.update(|surface| {
            surface.set_input_value(autoformat(value).unwrap_or_else(|| value.to_string()));
            surface.hide_details();
        });
    }

    /// A click somewhere on the page.
    pub fn handle_click(&self, inside_container: bool) {
        if !inside_container {
            self.update(Surface::hide_suggestions);
        }
    }

    /// Disable both triggers and show the loading label. Returns `false`
    /// when they are already disabled. Without both buttons there is no
    /// loading state to show and the call always succeeds.
    fn begin_loading(&self, message: &str) -> bool {
        self.update(|surface| {
            let Some((search, location)) = surface.trigger_buttons_mut() else {
                return true;
            };
            if search.disabled || location.disabled {
                return false;
            }
            search.disabled = true;
            location.disabled = true;
            search.set_content(message, LOADER_ICON);
            self.refresh_icons(surface);
            true
        })
    }

    /// Re-enable both triggers. Call it inside the same update as the final
    /// render.
    fn end_loading(&self, surface: &mut Surface) {
        let Some((search, location)) = surface.trigger_buttons_mut() else {
            return;
        };
        search.disabled = false;
        location.disabled = false;
        search.set_content(SEARCH_LABEL, SEARCH_ICON);
        self.refresh_icons(surface);
    }

    fn fail<T>(&self, error: SearchError) -> Result<T, SearchError> {
        self.show_error(&error);
        Err(error)
    }

    /// Put up a banner that takes itself down after the banner timeout.
    fn show_error(&self, error: &SearchError) {
        tracing::warn!(error = ?error, "address search failed");
        let Some(id) = self.update(|surface| surface.push_banner(error.to_string())) else {
            return;
        };
        let surface = Arc::clone(&self.surface);
        let timeout = self.options.banner_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            lock(&surface).remove_banner(id);
        });
    }
}
