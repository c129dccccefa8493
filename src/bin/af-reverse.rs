use af_address::{
    client::{Client, Endpoint, EndpointConfig},
    geolocation::Coordinates,
    util::default_http_client,
};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(
        short = 'e',
        long,
        env = "AF_REVERSE_ENDPOINT",
        help = "Reverse geocoding endpoint. Defaults to Nominatim."
    )]
    reverse_endpoint: Option<String>,
    #[arg(long, allow_hyphen_values = true, help = "Latitude in decimal degrees.")]
    lat: f64,
    #[arg(long, allow_hyphen_values = true, help = "Longitude in decimal degrees.")]
    lon: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "af_address=info,af_reverse=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    tracing::info!(
        endpoint = ?args.reverse_endpoint,
        lat = args.lat,
        lon = args.lon,
        "starting reverse lookup"
    );
    let http = default_http_client()?;
    let endpoints = EndpointConfig {
        postal: None,
        reverse: args.reverse_endpoint.map(|url| Endpoint {
            url,
            replace_token: None,
        }),
    };
    let client = Client::new(http, Some(endpoints))?;

    let coords = Coordinates {
        latitude: args.lat,
        longitude: args.lon,
    };
    match client.reverse_geocode(coords).await {
        Ok(location) => {
            println!("{}", json!({ "coordinates": coords, "location": location }));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = ?e, "reverse lookup failed");
            println!(
                "{}",
                json!({ "error": format!("Failed to reverse geocode: {e}") })
            );
            std::process::exit(1);
        }
    }
}
