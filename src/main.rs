use clap::Parser;
use pacbot::client::Client;
use pacbot::client::Config;

/// autonomous Pacbot client
#[derive(Parser)]
struct Args {
    /// path to the shared configuration file
    #[arg(long, default_value = "../config.json")]
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pacbot::init();
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    Client::new(config).run().await
}
