use std::{future::Future, time::Duration};

use af_address::{
    client::{Client, Endpoint, EndpointConfig},
    constants::{DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN, LOCATING_MESSAGE, SEARCHING_MESSAGE},
    events::UiEvent,
    geolocation::FixedGeolocator,
    icons::GlyphIcons,
    search::SearchOptions,
    util::default_http_client,
    AddressSearch, Surface,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tokio_stream::{wrappers::LinesStream, StreamExt};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct CliArgs {
    #[command(subcommand)]
    pub subcommand: Command,

    #[command(flatten)]
    pub global_opts: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    #[arg(
        long,
        env = "AF_POSTAL_ENDPOINT",
        global = true,
        help = "Postal code endpoint format ($cep is replaced)"
    )]
    pub postal_endpoint: Option<String>,

    #[arg(
        long,
        env = "AF_REVERSE_ENDPOINT",
        global = true,
        help = "Reverse geocoding endpoint"
    )]
    pub reverse_endpoint: Option<String>,

    #[arg(
        long,
        allow_hyphen_values = true,
        requires = "lon",
        global = true,
        help = "Device latitude"
    )]
    pub lat: Option<f64>,

    #[arg(
        long,
        allow_hyphen_values = true,
        requires = "lat",
        global = true,
        help = "Device longitude"
    )]
    pub lon: Option<f64>,

    #[arg(
        long,
        global = true,
        help = "Give up on the device position after this many milliseconds"
    )]
    pub position_timeout_ms: Option<u64>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    #[clap(name = "cep", about = "Look up the address of a CEP")]
    Cep { cep: String },

    #[clap(name = "locate", about = "Look up the address at --lat/--lon")]
    Locate,

    #[clap(
        name = "interactive",
        about = "Type into the address field; :buscar, :local, :fora and :sair act on the page"
    )]
    Interactive,
}

fn build_search(opts: &GlobalOpts) -> Result<AddressSearch> {
    let http = default_http_client()?;
    let endpoints = EndpointConfig {
        postal: opts.postal_endpoint.clone().map(|url| Endpoint {
            url,
            replace_token: Some(DEFAULT_POSTAL_SERVICE_URL_REPLACE_TOKEN.to_string()),
        }),
        reverse: opts.reverse_endpoint.clone().map(|url| Endpoint {
            url,
            replace_token: None,
        }),
    };
    let client = Client::new(http, Some(endpoints))?;
    let options = SearchOptions {
        position_timeout: opts.position_timeout_ms.map(Duration::from_millis),
        ..SearchOptions::default()
    };
    let search = AddressSearch::new(Surface::standard(), client)
        .with_icons(GlyphIcons)
        .with_options(options);
    Ok(match (opts.lat, opts.lon) {
        (Some(lat), Some(lon)) => search.with_geolocator(FixedGeolocator::new(lat, lon)),
        _ => search,
    })
}

async fn with_spinner<T>(message: &str, operation: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let output = operation.await;
    spinner.finish_and_clear();
    output
}

/// `None` ends the session.
fn parse_line(line: &str) -> Option<UiEvent> {
    match line.trim() {
        ":sair" => None,
        ":buscar" => Some(UiEvent::SearchCepClicked),
        ":local" => Some(UiEvent::UseLocationClicked),
        ":fora" => Some(UiEvent::Click {
            inside_container: false,
        }),
        _ => Some(UiEvent::Input(line.to_string())),
    }
}

/// Prints the surface when it differs from what was printed last.
struct Renderer {
    last: String,
}

impl Renderer {
    fn print_changes(&mut self, search: &AddressSearch) {
        let render = search.surface().render();
        if render != self.last {
            println!("{render}");
            self.last = render;
        }
    }
}

/// Feed stdin lines to the page until `:sair` or end of input. At end of
/// input, searches already started run to completion and their result is
/// printed.
async fn interactive(search: AddressSearch) -> Result<()> {
    let (events, receiver) = mpsc::unbounded_channel();
    let Some(binding) = search.bind(receiver) else {
        anyhow::bail!("the address field is missing");
    };
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    let mut renderer = Renderer {
        last: String::new(),
    };
    let quit = loop {
        tokio::select! {
            line = lines.next() => match line {
                Some(line) => match parse_line(&line?) {
                    Some(event) => events.send(event)?,
                    None => break true,
                },
                None => break false,
            },
            _ = ticker.tick() => renderer.print_changes(&search),
        }
    };
    if quit {
        tracing::info!("session ended by user");
        binding.destroy();
    } else {
        tracing::debug!("end of input, waiting for running searches");
        drop(events);
        binding.join().await;
    }
    renderer.print_changes(&search);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "af_address=info,addresscli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = CliArgs::parse();
    tracing::info!(command = ?args.subcommand, "starting");
    let search = build_search(&args.global_opts)?;

    match args.subcommand {
        Command::Cep { cep } => {
            search.handle_input(&cep);
            let result = with_spinner(SEARCHING_MESSAGE, search.search_by_cep()).await;
            print!("{}", search.surface().render());
            if result.is_err() {
                std::process::exit(1);
            }
        }
        Command::Locate => {
            let result = with_spinner(LOCATING_MESSAGE, search.use_geolocation()).await;
            print!("{}", search.surface().render());
            if result.is_err() {
                std::process::exit(1);
            }
        }
        Command::Interactive => interactive(search).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_maps_commands() {
        assert_eq!(parse_line(":sair"), None);
        assert_eq!(parse_line(":buscar"), Some(UiEvent::SearchCepClicked));
        assert_eq!(parse_line(" :local "), Some(UiEvent::UseLocationClicked));
        assert_eq!(
            parse_line(":fora"),
            Some(UiEvent::Click {
                inside_container: false
            })
        );
        assert_eq!(
            parse_line("01234"),
            Some(UiEvent::Input("01234".to_string()))
        );
    }

    #[test]
    fn location_flags_go_together() {
        assert!(CliArgs::try_parse_from(["addresscli", "locate", "--lat", "-23.5"]).is_err());
        let args =
            CliArgs::try_parse_from(["addresscli", "locate", "--lat", "-23.5", "--lon", "-46.6"])
                .unwrap();
        assert_eq!(args.subcommand, Command::Locate);
        assert_eq!(args.global_opts.lat, Some(-23.5));
    }
}
