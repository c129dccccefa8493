use crate::constants::USER_AGENT;

/// HTTP client with compression and the user agent Nominatim requires.
pub fn default_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .gzip(true)
        .brotli(true)
        .user_agent(USER_AGENT)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn default_client_identifies_itself() {
        // Arrange
        let server = MockServer::start_async().await;
        let agent_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/").header("user-agent", USER_AGENT);
                then.status(200);
            })
            .await;
        let client = default_http_client().unwrap();

        // Act
        let response = client.get(server.url("/")).send().await;

        // Assert
        assert!(response.unwrap().status().is_success());
        agent_mock.assert();
    }
}
