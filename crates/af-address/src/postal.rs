use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{
    api_interfaces::viacep, cep::Cep, client::EndpointConfigError, constants::*,
    error::LookupError,
};

static DEFAULT_ENDPOINT: LazyLock<PostalEndpoint> = LazyLock::new(|| {
    PostalEndpoint::try_new(
        DEFAULT_POSTAL_SERVICE_URL_FORMAT.to_string(),
        DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN.to_string(),
    )
    .expect("Invalid default endpoint config")
});

/// Address returned for a postal code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalLookupResult {
    pub postal_code: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
}

impl PostalLookupResult {
    /// Single-line address written back into the input field, e.g.
    /// `Rua X, Bairro Y, Cidade Z - UF - CEP: 01234-567`. Empty parts are
    /// left out along with their separator.
    pub fn full_address(&self) -> String {
        let mut address = String::new();
        for (separator, part) in [
            ("", &self.street),
            (", ", &self.neighborhood),
            (", ", &self.city),
            (" - ", &self.region),
        ] {
            if part.is_empty() {
                continue;
            }
            if !address.is_empty() {
                address.push_str(separator);
            }
            address.push_str(part);
        }
        if !self.postal_code.is_empty() {
            address.push_str(if address.is_empty() { "CEP: " } else { " - CEP: " });
            address.push_str(&self.postal_code);
        }
        address
    }

    /// Label/value pairs for the details panel.
    pub fn info_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("CEP", self.postal_code.clone()),
            ("Logradouro", self.street.clone()),
            ("Bairro", self.neighborhood.clone()),
            ("Cidade", self.city.clone()),
            ("Estado", self.region.clone()),
        ]
    }
}

impl From<viacep::Response> for PostalLookupResult {
    fn from(response: viacep::Response) -> Self {
        Self {
            postal_code: response.cep,
            street: response.logradouro,
            neighborhood: response.bairro,
            city: response.localidade,
            region: response.uf,
        }
    }
}

/// A postal service URL in which `replace_token` stands for the CEP digits.
#[derive(Clone, Debug, PartialEq)]
pub struct PostalEndpoint {
    pub url: String,
    pub replace_token: String,
}

impl PostalEndpoint {
    pub fn try_new(url: String, replace_token: String) -> Result<Self, EndpointConfigError> {
        if url.is_empty() {
            return Err(EndpointConfigError::MissingEndpoint);
        }
        if replace_token.is_empty() {
            return Err(EndpointConfigError::MissingReplaceToken(url));
        }
        if !url.contains(&replace_token) {
            return Err(EndpointConfigError::ReplaceTokenNotInEndpoint(
                url,
                replace_token,
            ));
        }
        Ok(Self { url, replace_token })
    }

    pub fn for_cep(&self, cep: &Cep) -> String {
        self.url.replace(&self.replace_token, cep.digits())
    }
}

/// Look up the address for a postal code.
pub async fn get(
    cep: &Cep,
    client: &reqwest::Client,
    endpoint: Option<&PostalEndpoint>,
) -> Result<PostalLookupResult, LookupError> {
    let url = endpoint.unwrap_or(&*DEFAULT_ENDPOINT).for_cep(cep);
    tracing::debug!(%url, "looking up postal code");
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(LookupError::ResponseError(response.status()));
    }
    let body = response.text().await.map_err(LookupError::ResponseBodyError)?;
    let parsed_body: viacep::Response = serde_json::from_str(&body)?;
    if parsed_body.is_not_found() {
        return Err(LookupError::NotFound);
    }
    Ok(PostalLookupResult::from(parsed_body))
}
