//! Delivering user actions to an [`AddressSearch`].

use tokio::{
    sync::mpsc::UnboundedReceiver,
    task::{JoinHandle, JoinSet},
};

use crate::search::AddressSearch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    SearchCepClicked,
    UseLocationClicked,
    /// The input field now holds this text.
    Input(String),
    /// A click anywhere on the page.
    Click { inside_container: bool },
}

/// Live subscription of a controller to an event source. Dropping it stops
/// event delivery and cancels searches still in flight.
#[must_use = "dropping the binding unsubscribes immediately"]
pub struct Binding {
    task: Option<JoinHandle<()>>,
}

impl Binding {
    /// Unsubscribe now, cancelling any search in flight.
    pub fn destroy(self) {}

    /// Wait for the listener to finish. It finishes once every sender of the
    /// event channel is gone and the searches it started have completed.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "event listener stopped abnormally");
            }
        }
    }

    /// Whether events are still being consumed.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

impl AddressSearch {
    /// Start consuming `events`. Returns `None`, and listens to nothing,
    /// when the surface has no input field.
    pub fn bind(&self, events: UnboundedReceiver<UiEvent>) -> Option<Binding> {
        self.surface().input.as_ref()?;
        let task = tokio::spawn(self.clone().listen(events));
        Some(Binding { task: Some(task) })
    }

    async fn listen(self, mut events: UnboundedReceiver<UiEvent>) {
        let mut operations = JoinSet::new();
        loop {
            tokio::select! {
                Some(_) = operations.join_next(), if !operations.is_empty() => {}
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event, &mut operations),
                    None => break,
                },
            }
        }
        while operations.join_next().await.is_some() {}
    }

    fn dispatch(&self, event: UiEvent, operations: &mut JoinSet<()>) {
        tracing::debug!(?event, "ui event");
        match event {
            UiEvent::SearchCepClicked => {
                if self.surface().search_button.is_some() {
                    let search = self.clone();
                    operations.spawn(async move {
                        let _ = search.search_by_cep().await;
                    });
                }
            }
            UiEvent::UseLocationClicked => {
                if self.surface().location_button.is_some() {
                    let search = self.clone();
                    operations.spawn(async move {
                        let _ = search.use_geolocation().await;
                    });
                }
            }
            UiEvent::Input(value) => self.handle_input(&value),
            UiEvent::Click { inside_container } => self.handle_click(inside_container),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        client::{Client, Endpoint, EndpointConfig},
        surface::{Panel, Surface, SurfaceBuilder},
    };
    use httpmock::prelude::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    async fn wait_for(search: &AddressSearch, condition: impl Fn(&Surface) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !condition(&*search.surface()) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("surface never reached the expected state");
    }

    #[tokio::test]
    async fn bind_requires_input_field() {
        let surface = SurfaceBuilder::default()
            .suggestions(Panel { visible: true })
            .build()
            .unwrap();
        let search = AddressSearch::new(surface, Client::with_defaults().unwrap());
        let (_events, receiver) = mpsc::unbounded_channel();

        assert!(search.bind(receiver).is_none());
    }

    #[tokio::test]
    async fn events_reach_the_controller() {
        // Arrange
        let mut surface = Surface::standard();
        surface.suggestions = Some(Panel { visible: true });
        let search = AddressSearch::new(surface, Client::with_defaults().unwrap());
        let (events, receiver) = mpsc::unbounded_channel();
        let binding = search.bind(receiver).unwrap();

        // Act
        events.send(UiEvent::Input("01234".to_string())).unwrap();
        events.send(UiEvent::Click { inside_container: false }).unwrap();

        // Assert
        wait_for(&search, |surface| {
            surface.input_value() == Some("01234-")
                && !surface.suggestions.as_ref().unwrap().visible
        })
        .await;
        assert!(binding.is_active());
    }

    #[tokio::test]
    async fn search_click_runs_lookup() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01234567/json/");
                then.status(200).json_body(json!({
                    "cep": "01234-567",
                    "logradouro": "Rua X",
                    "bairro": "Bairro Y",
                    "localidade": "Cidade Z",
                    "uf": "UF"
                }));
            })
            .await;
        let endpoints = EndpointConfig {
            postal: Some(Endpoint {
                url: server.url("/ws/$cep/json/"),
                replace_token: Some("$cep".to_string()),
            }),
            reverse: None,
        };
        let client = Client::new(reqwest::Client::new(), Some(endpoints)).unwrap();
        let search = AddressSearch::new(Surface::standard(), client);
        let (events, receiver) = mpsc::unbounded_channel();
        let _binding = search.bind(receiver).unwrap();

        // Act
        events.send(UiEvent::Input("01234-567".to_string())).unwrap();
        events.send(UiEvent::SearchCepClicked).unwrap();

        // Assert
        wait_for(&search, |surface| {
            surface.input_value() == Some("Rua X, Bairro Y, Cidade Z - UF - CEP: 01234-567")
        })
        .await;
        lookup_mock.assert();
    }

    #[tokio::test]
    async fn closing_events_lets_running_search_finish() {
        // Arrange
        let server = MockServer::start_async().await;
        let lookup_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01234567/json/");
                then.status(200)
                    .delay(Duration::from_millis(200))
                    .json_body(json!({
                        "cep": "01234-567",
                        "logradouro": "Rua X",
                        "bairro": "Bairro Y",
                        "localidade": "Cidade Z",
                        "uf": "UF"
                    }));
            })
            .await;
        let endpoints = EndpointConfig {
            postal: Some(Endpoint {
                url: server.url("/ws/$cep/json/"),
                replace_token: Some("$cep".to_string()),
            }),
            reverse: None,
        };
        let client = Client::new(reqwest::Client::new(), Some(endpoints)).unwrap();
        let search = AddressSearch::new(Surface::standard(), client);
        let (events, receiver) = mpsc::unbounded_channel();
        let binding = search.bind(receiver).unwrap();
        events.send(UiEvent::Input("01234-567".to_string())).unwrap();
        events.send(UiEvent::SearchCepClicked).unwrap();
        wait_for(&search, |surface| {
            surface.search_button.as_ref().is_some_and(|button| button.disabled)
        })
        .await;

        // Act
        drop(events);
        tokio::time::timeout(Duration::from_secs(5), binding.join())
            .await
            .expect("listener did not finish");

        // Assert
        let surface = search.surface();
        assert_eq!(
            surface.input_value(),
            Some("Rua X, Bairro Y, Cidade Z - UF - CEP: 01234-567")
        );
        assert!(!surface.search_button.as_ref().unwrap().disabled);
        lookup_mock.assert();
    }

    #[tokio::test]
    async fn click_without_button_is_ignored() {
        // Arrange
        let surface = SurfaceBuilder::default()
            .input(Default::default())
            .container(Default::default())
            .build()
            .unwrap();
        let search = AddressSearch::new(surface, Client::with_defaults().unwrap());
        let (events, receiver) = mpsc::unbounded_channel();
        let _binding = search.bind(receiver).unwrap();

        // Act
        events.send(UiEvent::SearchCepClicked).unwrap();
        events.send(UiEvent::Input("1".to_string())).unwrap();
        wait_for(&search, |surface| surface.input_value() == Some("1")).await;

        // Assert
        assert!(search.surface().banners().is_empty());
    }

    #[tokio::test]
    async fn dropping_binding_unsubscribes() {
        // Arrange
        let search = AddressSearch::new(Surface::standard(), Client::with_defaults().unwrap());
        let (events, receiver) = mpsc::unbounded_channel();
        let binding = search.bind(receiver).unwrap();

        // Act
        binding.destroy();

        // Assert
        tokio::time::timeout(Duration::from_secs(5), events.closed())
            .await
            .expect("event source still subscribed");
        assert!(events.send(UiEvent::Input("01234".to_string())).is_err());
        assert_eq!(search.surface().input_value(), Some(""));
    }
}
