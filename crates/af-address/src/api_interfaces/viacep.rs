use serde::Deserialize;
use serde_json::Value;

/// Raw ViaCEP lookup payload.
///
/// Unknown codes come back as `{"erro": true}` (older deployments send the
/// string `"true"`), so every address field is optional.
#[derive(Deserialize)]
pub struct Response {
    #[serde(default)]
    pub erro: Option<Value>,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub localidade: String,
    #[serde(default)]
    pub uf: String,
}

impl Response {
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}
