use clap::{ArgAction, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use seedgate_common::paths;
use seedgate_crypto::totp::MAX_WINDOW;

/// Default HTTP API port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

#[derive(Parser, Debug)]
#[command(
    name = "seedgate",
    version,
    about = "Seed provisioning, TOTP codes and commit attestations"
)]
pub struct Cli {
    /// HTTP API port
    #[arg(long, env = "SEEDGATE_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Address the HTTP API binds to
    #[arg(long, env = "SEEDGATE_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Where the decrypted seed is stored (default: /data/seed.txt or data/seed.txt)
    #[arg(long, env = "SEEDGATE_SEED_PATH", value_name = "PATH", global = true)]
    pub seed_path: Option<PathBuf>,

    /// Private key (PEM) for seed decryption and commit signing
    #[arg(long, env = "SEEDGATE_PRIVATE_KEY", value_name = "PATH", global = true)]
    pub private_key: Option<PathBuf>,

    /// Recipient public key (PEM) that attestations are encrypted to
    #[arg(long, env = "SEEDGATE_RECIPIENT_KEY", value_name = "PATH", global = true)]
    pub recipient_key: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "SEEDGATE_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to file (in addition to stderr)
    #[arg(long, env = "SEEDGATE_LOG_FILE", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (default when no command is given)
    Serve,
    /// Decrypt a Base64 encrypted seed and store it
    DecryptSeed {
        /// File holding the Base64 ciphertext (default: stdin)
        #[arg(long, value_name = "PATH")]
        input: Option<PathBuf>,
    },
    /// Show the current TOTP code
    Code,
    /// Check a TOTP code against the stored seed
    Verify {
        /// Six-digit code
        code: String,
        /// Accepted clock skew in 30-second steps (0-10)
        #[arg(
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u64).range(0..=MAX_WINDOW)
        )]
        window: u64,
    },
    /// Print a timestamped code line (for cron)
    LogCode,
    /// Sign and encrypt a commit hash
    Proof {
        /// Commit hash (default: `git rev-parse HEAD`)
        #[arg(long)]
        commit: Option<String>,
    },
    /// Open an attestation as its recipient and verify the signature
    VerifyProof {
        /// Attestation JSON file
        file: PathBuf,
        /// Recipient private key (PEM)
        #[arg(long, value_name = "PATH")]
        recipient_private_key: PathBuf,
        /// Signer public key (PEM)
        #[arg(long, value_name = "PATH")]
        signer_key: PathBuf,
    },
    /// Show version information
    Version,
}

/// Resolved configuration used at runtime.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: IpAddr,
    pub http_port: u16,
    pub seed_path: PathBuf,
    pub private_key_path: PathBuf,
    pub recipient_key_path: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            bind: cli.bind,
            http_port: cli.port,
            seed_path: cli.seed_path.clone().unwrap_or_else(paths::default_seed_path),
            private_key_path: cli
                .private_key
                .clone()
                .unwrap_or_else(paths::default_private_key_path),
            recipient_key_path: cli
                .recipient_key
                .clone()
                .unwrap_or_else(paths::default_recipient_key_path),
        }
    }
}
