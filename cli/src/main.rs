//! TapPay command line: drives the payment client.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;

use tappay_client::{ClientConfig, GatewayMode, PaymentClient, Settings, WalletMode};
use tappay_crypto::short_address;
use tappay_gateway::HistorySummary;
use tappay_protocol::{codec, DecodeOutcome};
use tappay_types::NetworkId;
use tappay_utils::{format_age, init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "tappay", about = "Tap-to-pay NFC payment tool")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "TAPPAY_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the persisted user settings. Defaults to
    /// `~/.tappay/settings.toml`.
    #[arg(long, env = "TAPPAY_SETTINGS")]
    settings: Option<PathBuf>,

    /// Gateway: "live" or "mock".
    #[arg(long, env = "TAPPAY_GATEWAY")]
    gateway: Option<String>,

    /// Network: "alfajores", "mainnet" or "dev".
    #[arg(long, env = "TAPPAY_NETWORK")]
    network: Option<String>,

    /// Signing key for the live gateway.
    #[arg(long, env = "TAPPAY_DEMO_KEY", hide_env_values = true)]
    demo_key: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TAPPAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TAPPAY_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Check that an address is well formed.
    Validate { address: String },

    /// Wallet operations.
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },

    /// Print the tag bytes for a payment request as hex.
    Encode { recipient: String, amount: String },

    /// Decode tag bytes given as hex.
    Decode { hex: String },

    /// Submit a payment directly, without a tag.
    Send { recipient: String, amount: String },

    /// Query the token balance of an address.
    Balance { address: String },

    /// Show recent transactions.
    History,

    /// Write a payment to a simulated tag, read it back and submit it.
    Tap { recipient: String, amount: String },

    /// Show or change persisted settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(clap::Subcommand)]
enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Update one or more settings.
    Set {
        /// Network used when neither --network nor the config file names one.
        #[arg(long)]
        default_network: Option<String>,
        #[arg(long)]
        profile_name: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        biometrics: Option<bool>,
    },
}

#[derive(clap::Subcommand)]
enum WalletAction {
    /// Generate a new wallet.
    New {
        /// Produce a placeholder that cannot sign.
        #[arg(long)]
        placeholder: bool,
    },
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.settings.clone().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(".tappay")
            .join("settings.toml")
    })
}

/// Settings first, then the config file, then flags and env vars.
fn load_config(cli: &Cli, settings: &Settings) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file_over(path, settings)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::from_settings(settings),
    };

    if let Some(network) = &cli.network {
        config.network = NetworkId::parse(network)
            .with_context(|| format!("unknown network {network:?}"))?;
    }
    if let Some(gateway) = &cli.gateway {
        config.gateway = match gateway.to_ascii_lowercase().as_str() {
            "live" => GatewayMode::Live,
            "mock" => GatewayMode::Mock,
            other => bail!("unknown gateway {other:?}"),
        };
    }
    if let Some(key) = &cli.demo_key {
        config.demo_private_key = Some(key.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings_path = settings_path(&cli);
    let mut settings = Settings::load_or_default(&settings_path)
        .with_context(|| format!("loading {}", settings_path.display()))?;
    let mut config = load_config(&cli, &settings)?;
    init_logging(config.log_format(), &config.log_level);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Validate { address } => {
            let valid = tappay_crypto::validate_address(&address);
            println!("{address}: {}", if valid { "valid" } else { "invalid" });
            if !valid {
                std::process::exit(1);
            }
        }
        Command::Wallet {
            action: WalletAction::New { placeholder },
        } => {
            if placeholder {
                config.wallet_factory = WalletMode::Placeholder;
            }
            let wallet = config.wallet_factory.factory().generate();
            println!("address:     {}", wallet.address);
            println!("private key: {}", wallet.export_private_key());
            if !wallet.can_sign() {
                println!("note:        placeholder wallet, cannot sign transactions");
            }
        }
        Command::Encode { recipient, amount } => {
            let bytes = codec::encode(&recipient, &amount)?;
            println!("{}", hex::encode(bytes));
        }
        Command::Decode { hex: input } => {
            let bytes = hex::decode(input.trim().trim_start_matches("0x"))
                .context("tag bytes must be hex")?;
            match codec::decode(&bytes) {
                DecodeOutcome::Unrecognized => println!("not a payment request"),
                outcome => {
                    if let (Some(generation), Some(request)) = (outcome.generation(), outcome.request()) {
                        println!("format:    {generation:?}");
                        println!("recipient: {}", request.recipient);
                        println!("amount:    {}", request.amount);
                        if let Some(ts) = request.timestamp {
                            println!("written:   {}", format_age(ts, tappay_types::Timestamp::now()));
                        }
                    }
                }
            }
        }
        Command::Send { recipient, amount } => {
            let client = PaymentClient::from_config(&config)?;
            let hash = client.send_payment(&recipient, &amount).await?;
            println!("{hash}");
        }
        Command::Balance { address } => {
            let client = PaymentClient::from_config(&config)?;
            let balance = client.get_balance(&address).await?;
            println!("{balance}");
        }
        Command::History => {
            let client = PaymentClient::from_config(&config)?;
            let records = client.get_transaction_history().await?;
            let now = client.clock().now();
            for record in &records {
                println!(
                    "{:<8} {:>10} {:<13} {:<10} {}",
                    record.kind,
                    record.amount,
                    short_address(record.address.as_str()),
                    record.status,
                    format_age(record.timestamp, now),
                );
            }
            let summary = HistorySummary::from_records(&records)?;
            println!(
                "net confirmed: {} ({} confirmed, {} pending, {} failed)",
                summary.net_display(),
                summary.confirmed,
                summary.pending,
                summary.failed
            );
        }
        Command::Tap { recipient, amount } => {
            let client = PaymentClient::from_config(&config)?;
            if !client.initialize_nfc().await? {
                bail!("NFC is not available");
            }
            let result = async {
                let request = client.compose_and_write(&recipient, &amount).await?;
                println!("wrote {} to {} on tag", request.amount, short_address(&request.recipient));
                let receipt = client.read_and_submit().await?;
                println!("read {:?} payload, submitted {}", receipt.generation, receipt.hash);
                Ok::<_, tappay_client::ClientError>(())
            }
            .await;
            client.cleanup_nfc().await;
            if let Err(e) = result {
                if e.is_retryable() {
                    tracing::warn!(error = %e, "tap failed; try again");
                }
                return Err(e.into());
            }
        }
        Command::Settings { action } => {
            if let Some(SettingsAction::Set {
                default_network,
                profile_name,
                notifications,
                biometrics,
            }) = action
            {
                if let Some(network) = default_network {
                    settings.network = NetworkId::parse(&network)
                        .with_context(|| format!("unknown network {network:?}"))?;
                }
                if let Some(name) = profile_name {
                    settings.profile_name = name;
                }
                if let Some(on) = notifications {
                    settings.notifications = on;
                }
                if let Some(on) = biometrics {
                    settings.biometrics = on;
                }
                settings.save(&settings_path)?;
                tracing::info!(path = %settings_path.display(), "settings updated");
            }
            println!("settings:      {}", settings_path.display());
            println!("network:       {:?}", settings.network);
            println!("profile name:  {}", settings.profile_name);
            println!("notifications: {}", settings.notifications);
            println!("biometrics:    {}", settings.biometrics);
        }
    }

    Ok(())
}
