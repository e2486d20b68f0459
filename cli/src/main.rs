use clap::Parser;
use rusty_gnap_cli::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_observability(LogFormat::from_env());
    let cli: RustyCli = RustyCli::parse();
    let session = cli.session;
    match cli.cmd {
        Commands::Keygen { delegate } => delegate.execute(&session)?,
        Commands::Tx { delegate } => delegate.execute(&session).await?,
        Commands::Continue { delegate } => delegate.execute(&session).await?,
        Commands::Verify { delegate } => delegate.execute(&session).await?,
        Commands::Logout { delegate } => delegate.execute(&session)?,
        Commands::Status { delegate } => delegate.execute(&session)?,
    };
    Ok(())
}
