use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use tokio::io::AsyncReadExt;

use crate::cli::KeyManager;
use crate::config::Settings;
use crate::core::error::{OperationError, OperationResult};
use crate::core::key_source::SelectedFile;
use crate::core::orchestrator::Orchestrator;
use crate::crypto::pgp::RpgpEngine;
use crate::model::KeyRole;
use crate::ui::{ConsolePresenter, ResultPresenter, Status};

#[derive(Parser)]
#[command(name = "pgp-workbench")]
#[command(about = "Encrypt, decrypt, sign and verify with ASCII-armored OpenPGP keys")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a message to a public key
    Encrypt(MessageArgs),
    /// Decrypt a PGP message with a private key
    Decrypt(MessageArgs),
    /// Clear-sign a message with a private key
    Sign(MessageArgs),
    /// Verify a clear-signed message against a public key
    Verify(MessageArgs),
    /// Generate a new RSA key pair
    Generate {
        /// Name for the key's user id
        #[arg(short, long)]
        name: String,
        /// Email for the key's user id
        #[arg(short, long)]
        email: String,
        /// Write the public key here instead of stdout
        #[arg(long)]
        public_out: Option<PathBuf>,
        /// Write the private key here instead of stdout
        #[arg(long)]
        private_out: Option<PathBuf>,
    },
    /// Show the fingerprint of a key file
    Inspect {
        /// Armored public or private key file
        #[arg(short, long)]
        key: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct MessageArgs {
    /// Armored key file
    #[arg(short, long)]
    pub key: Option<PathBuf>,

    /// Message text (defaults to stdin)
    #[arg(short, long, conflicts_with = "input")]
    pub message: Option<String>,

    /// Read the message from this file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl MessageArgs {
    /// Message text from `--message`, `--input` or stdin, in that order.
    pub async fn read_message(&self) -> Result<String> {
        if let Some(message) = &self.message {
            return Ok(message.clone());
        }
        if let Some(path) = &self.input {
            return Ok(tokio::fs::read_to_string(path).await?);
        }
        let mut message = String::new();
        tokio::io::stdin().read_to_string(&mut message).await?;
        Ok(message)
    }
}

/// Runs one command. Returns `Ok(false)` when the operation failed and the
/// failure has already been shown to the user.
pub struct CliApp<P> {
    settings: Settings,
    presenter: P,
}

impl<P: ResultPresenter> CliApp<P> {
    pub fn new(settings: Settings, presenter: P) -> Self {
        Self {
            settings,
            presenter,
        }
    }

    fn orchestrator(&self, key: Option<PathBuf>) -> Orchestrator<RpgpEngine, SelectedFile> {
        let keys = KeyManager::new(&self.settings).key_file(key);
        Orchestrator::new(RpgpEngine::new(), keys).with_key_strength(self.settings.key_strength)
    }

    pub async fn encrypt(&mut self, args: MessageArgs) -> Result<bool> {
        let message = args.read_message().await?;
        let result = self.orchestrator(args.key).encrypt(&message).await;
        self.finish(result, "Message encrypted")
    }

    pub async fn decrypt(&mut self, args: MessageArgs) -> Result<bool> {
        let message = args.read_message().await?;
        if message.trim().is_empty() {
            return self.finish(Err(OperationError::EmptyMessage), "Message decrypted");
        }
        let orchestrator = self.orchestrator(args.key);
        let passphrase = KeyManager::new(&self.settings).passphrase("Passphrase for private key")?;
        let result = orchestrator.decrypt(&message, passphrase).await;
        self.finish(result, "Message decrypted")
    }

    pub async fn sign(&mut self, args: MessageArgs) -> Result<bool> {
        let message = args.read_message().await?;
        if message.trim().is_empty() {
            return self.finish(Err(OperationError::EmptyMessage), "Message signed");
        }
        let orchestrator = self.orchestrator(args.key);
        let passphrase = KeyManager::new(&self.settings).passphrase("Passphrase for private key")?;
        let result = orchestrator.sign(&message, passphrase).await;
        self.finish(result, "Message signed")
    }

    /// An invalid signature is reported and counts as a failed run.
    pub async fn verify(&mut self, args: MessageArgs) -> Result<bool> {
        let message = args.read_message().await?;
        match self.orchestrator(args.key).verify(&message).await {
            Ok(verification) => {
                self.presenter
                    .show_status(&Status::verification(&verification))?;
                Ok(verification.is_valid())
            }
            Err(e) => {
                self.presenter.show_status(&Status::from(&e))?;
                Ok(false)
            }
        }
    }

    pub async fn generate(&mut self, name: &str, email: &str) -> Result<bool> {
        let orchestrator = self.orchestrator(None);
        let passphrase = KeyManager::new(&self.settings).passphrase("Passphrase for the new key")?;
        info!("Generating key pair, this can take a while");
        match orchestrator.generate(name, email, passphrase).await {
            Ok(keys) => {
                self.presenter.show_key_pair(&keys)?;
                self.presenter.show_status(&Status::success("Key pair generated"))?;
                Ok(true)
            }
            Err(e) => {
                self.presenter.show_status(&Status::from(&e))?;
                Ok(false)
            }
        }
    }

    pub async fn inspect(&mut self, key: PathBuf) -> Result<bool> {
        match self.orchestrator(Some(key)).inspect_key(KeyRole::Public).await {
            Ok(info) => {
                self.presenter.show_status(&Status::key_info(&info))?;
                for user_id in &info.user_ids {
                    self.presenter.show_status(&Status::info(format!("User id: {}", user_id)))?;
                }
                Ok(true)
            }
            Err(e) => {
                self.presenter.show_status(&Status::from(&e))?;
                Ok(false)
            }
        }
    }

    fn finish(&mut self, result: OperationResult<String>, done: &str) -> Result<bool> {
        match result {
            Ok(payload) => {
                self.presenter.show_payload(&payload)?;
                self.presenter.show_status(&Status::success(done))?;
                Ok(true)
            }
            Err(e) => {
                self.presenter.show_status(&Status::from(&e))?;
                Ok(false)
            }
        }
    }
}

fn stdio_app(
    settings: Settings,
    output: Option<PathBuf>,
) -> CliApp<ConsolePresenter<std::io::Stdout, std::io::Stderr>> {
    CliApp::new(settings, ConsolePresenter::stdio().with_output(output))
}

pub async fn run_cli(cli: Cli, settings: Settings) -> Result<bool> {
    match cli.command {
        Commands::Encrypt(args) => stdio_app(settings, args.output.clone()).encrypt(args).await,
        Commands::Decrypt(args) => stdio_app(settings, args.output.clone()).decrypt(args).await,
        Commands::Sign(args) => stdio_app(settings, args.output.clone()).sign(args).await,
        Commands::Verify(args) => stdio_app(settings, args.output.clone()).verify(args).await,
        Commands::Generate {
            name,
            email,
            public_out,
            private_out,
        } => {
            let presenter = ConsolePresenter::stdio().with_key_outputs(public_out, private_out);
            CliApp::new(settings, presenter).generate(&name, &email).await
        }
        Commands::Inspect { key } => stdio_app(settings, None).inspect(key).await,
    }
}
