mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ecp_flow::{Credentials, EcpClient, ReqwestClient};
use url::Url;

use config::*;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    #[clap(short, long, env = "ECP_CONFIG")]
    /// Path to an optional TOML configuration file
    config_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the ECP handshake and print the protected resource
    Login {
        /// Resource protected by a SAML service provider
        #[clap(long)]
        url: Option<Url>,

        #[clap(short, long)]
        username: Option<String>,

        #[clap(env = "ECP_PASSWORD")]
        maybe_password: Option<String>,

        /// Remove the SP's signature before relaying its request to the IdP
        #[clap(long)]
        strip_signature: bool,
    },
    /// Print the configuration in use, with defaults filled in
    ShowConfig,
}

fn tracer() {
    tracing_subscriber::fmt::init();
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "ecp_login=info,ecp_flow=info")
    }

    // Abort on panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("{}", panic_info);
        eprintln!("{:?}", backtrace::Backtrace::new());
        std::process::abort();
    }));

    tracer();

    let args = Args::parse();
    let config = match args.config_file {
        Some(path) => read_config(path.clone())
            .with_context(|| format!("unable to read configuration from {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::ShowConfig => {
            println!("{}", toml::to_string(&config)?);
        }
        Command::Login {
            url,
            username,
            maybe_password,
            strip_signature,
        } => {
            let url = url
                .or(config.url)
                .context("no protected URL given, use --url or set `url` in the configuration")?;
            let username = username
                .or(config.username)
                .context("no username given, use --username or set `username` in the configuration")?;
            let password = match maybe_password {
                Some(pwd) => pwd,
                None => rpassword::prompt_password("Enter password: ")?,
            };

            let mut ecp_config = config.ecp;
            ecp_config.strip_signature |= strip_signature;

            let http = ReqwestClient::new().context("unable to build the HTTP client")?;
            let client = EcpClient::new(Arc::new(http), ecp_config);
            let res = client
                .login(&url, &Credentials::new(username, password))
                .await;

            // Let a pending SOAP fault reach the SP before exiting
            client.flush_notifications().await;

            match res {
                Ok(body) => println!("{}", body),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    bail!("ECP login failed (code {}): {}", e.code(), e.description());
                }
            }
        }
    }

    Ok(())
}
