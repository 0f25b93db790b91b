use eyre::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use kalinga_core::models::session::Role;
use kalinga_field::commands::{self, Command};
use kalinga_field::config::{self, FieldConfig};
use kalinga_field::state::FieldState;
use kalinga_gateway::http::HttpGateway;

const USAGE: &str = "usage: kalinga-field [init <base-url> <worker-id> <admin|worker>]";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let dir = config::config_dir()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("init") => {
            let [_, base_url, worker_id, role] = args.as_slice() else {
                return Err(eyre::eyre!(USAGE));
            };
            let config = FieldConfig::new(base_url.clone(), worker_id.parse()?, role.parse::<Role>()?);
            config::save_config(&dir, &config)?;
            println!("saved {}", dir.display());
            return Ok(());
        }
        Some("reset") => return config::delete_config(&dir),
        Some(_) => return Err(eyre::eyre!(USAGE)),
        None => {}
    }

    if !config::has_config(&dir) {
        return Err(eyre::eyre!("not configured yet. {USAGE}"));
    }
    let config = config::load_config(&dir)?;
    let gateway = HttpGateway::new(&config.gateway())?;
    let mut state = FieldState::new(config.session(), config.lookup_policy());
    tracing::info!(base_url = gateway.base_url(), worker_id = config.worker_id, "field client started");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"kalinga> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match commands::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => commands::execute(&mut state, &gateway, command).await,
            Err(e) => Err(e),
        };
        let text = match output {
            Ok(text) => text,
            Err(e) => format!("error: {e}"),
        };
        if !text.is_empty() {
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }
    Ok(())
}
