use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hetzner_dns::{ClientConfig, HetznerDnsClient, Reconciliation, ZoneCreate};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Hetzner DNS API token
    #[arg(long, value_name = "TOKEN", env = "HETZNER_DNS_API_TOKEN", hide_env_values = true)]
    api_token: String,
    /// Override for the API base URL
    #[arg(long, value_name = "URL", env = "HETZNER_DNS_API_URL")]
    base_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    timeout: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// List all zones
    Zones,
    /// Print the id of the zone with the given name
    ZoneId { name: String },
    /// Create a zone
    CreateZone {
        name: String,
        #[arg(long)]
        ttl: Option<u32>,
    },
    /// Delete a zone by id
    DeleteZone { zone_id: String },
    /// List the records of a zone (by zone name)
    Records { zone: String },
    /// Create the record, or update the first record with that name
    SetRecord {
        /// Zone name, e.g. example.com
        zone: String,
        /// Record name, e.g. _acme-challenge
        name: String,
        value: String,
        #[arg(long = "type", value_name = "TYPE", default_value = "TXT")]
        rrtype: String,
    },
    /// Delete every record with the given name
    DeleteRecords { zone: String, name: String },
    /// Write the zone file to stdout or a file
    Export {
        zone: String,
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import a zone file into an existing zone
    Import { zone: String, file: PathBuf },
    /// Check a zone file without importing it
    Validate { file: PathBuf },
    /// List primary servers
    PrimaryServers,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let client = build_client(&cli)?;
    run(&client, cli.command).await
}

fn build_client(cli: &Cli) -> Result<HetznerDnsClient> {
    if cli.api_token.trim().is_empty() {
        bail!("API token must not be empty");
    }

    let mut config =
        ClientConfig::new(cli.api_token.trim()).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url);
    }

    HetznerDnsClient::from_config(config).context("failed to build API client")
}

async fn run(client: &HetznerDnsClient, command: Command) -> Result<()> {
    match command {
        Command::Zones => {
            for zone in client.list_zones().await? {
                println!("{}\t{}", zone.id, zone.name);
            }
        }
        Command::ZoneId { name } => {
            println!("{}", client.find_zone_id_by_name(&name).await?);
        }
        Command::CreateZone { name, ttl } => {
            let zone = client.create_zone(&ZoneCreate { name, ttl }).await?;
            info!(zone_id = %zone.id, "zone created");
            println!("{}", zone.id);
        }
        Command::DeleteZone { zone_id } => {
            client.delete_zone(&zone_id).await?;
            info!(%zone_id, "zone deleted");
        }
        Command::Records { zone } => {
            let zone_id = client.find_zone_id_by_name(&zone).await?;
            for record in client.list_records_for_zone(&zone_id).await? {
                println!("{record}");
            }
        }
        Command::SetRecord {
            zone,
            name,
            value,
            rrtype,
        } => {
            let zone_id = client.find_zone_id_by_name(&zone).await?;
            match client
                .create_or_update_record(&zone_id, &rrtype, &name, &value)
                .await?
            {
                Reconciliation::Created => info!(%name, "record created"),
                Reconciliation::Updated { id } => info!(%name, record_id = %id, "record updated"),
            }
        }
        Command::DeleteRecords { zone, name } => {
            let zone_id = client.find_zone_id_by_name(&zone).await?;
            for record in client.find_records_by_name(&zone_id, &name).await? {
                client.delete_record(&record.id).await?;
                info!(record_id = %record.id, %name, "record deleted");
            }
        }
        Command::Export { zone, output } => {
            let zone_id = client.find_zone_id_by_name(&zone).await?;
            let zone_file = client.export_zone_file(&zone_id).await?;
            match output {
                Some(path) => tokio::fs::write(&path, &zone_file)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", String::from_utf8_lossy(&zone_file)),
            }
        }
        Command::Import { zone, file } => {
            let zone_id = client.find_zone_id_by_name(&zone).await?;
            client.import_zone_file_from_path(&zone_id, &file).await?;
            info!(%zone, "zone file imported");
        }
        Command::Validate { file } => {
            client.validate_zone_file_from_path(&file).await?;
            info!(file = %file.display(), "zone file is valid");
        }
        Command::PrimaryServers => {
            for server in client.list_primary_servers().await? {
                println!(
                    "{}\t{}\t{}:{}",
                    server.id, server.zone_id, server.address, server.port
                );
            }
        }
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
