use af_address::{
    client::{Client, Endpoint, EndpointConfig},
    constants::DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN,
    util::default_http_client,
    Cep,
};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(
        short = 'e',
        long,
        env = "AF_POSTAL_ENDPOINT",
        help = "Postal code endpoint format. Defaults to ViaCEP."
    )]
    postal_endpoint: Option<String>,
    #[arg(
        short = 't',
        long,
        default_value = DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN,
        help = "Token in the endpoint format replaced by the CEP digits."
    )]
    replace_token: String,
    #[arg(help = "CEP to look up, e.g. 01234-567.")]
    cep: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "af_address=info,af_cep=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    tracing::info!(endpoint = ?args.postal_endpoint, cep = %args.cep, "starting lookup");
    let http = default_http_client()?;
    let endpoints = EndpointConfig {
        postal: args.postal_endpoint.map(|url| Endpoint {
            url,
            replace_token: Some(args.replace_token),
        }),
        reverse: None,
    };
    let client = Client::new(http, Some(endpoints))?;

    let cep = match Cep::parse(&args.cep) {
        Ok(cep) => cep,
        Err(e) => {
            tracing::warn!(input = %args.cep, error = %e, "rejected CEP");
            println!("{}", json!({ "error": format!("Invalid CEP: {e}") }));
            std::process::exit(2);
        }
    };
    match client.lookup_postal_code(&cep).await {
        Ok(address) => {
            println!(
                "{}",
                json!({ "address": address, "fullAddress": address.full_address() })
            );
            Ok(())
        }
        Err(e) => {
            tracing::warn!(%cep, error = ?e, "lookup failed");
            println!("{}", json!({ "error": format!("Failed to look up CEP: {e}") }));
            std::process::exit(1);
        }
    }
}
