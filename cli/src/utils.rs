use std::path::Path;

use anyhow::Context;
use rusty_gnap::prelude::*;

use crate::SessionArgs;

pub type CliClient = GnapClient<FileStore, ReqwestTransport>;

/// Reads the configuration file when one is given, defaults otherwise
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GnapConfig> {
    let Some(path) = path else {
        return Ok(GnapConfig::default());
    };
    let raw = std::fs::read_to_string(path).with_context(|| format!("cannot read config {}", path.display()))?;
    let config = serde_json::from_str::<GnapConfig>(&raw).with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn client(session: &SessionArgs) -> anyhow::Result<CliClient> {
    let config = load_config(session.config.as_deref())?;
    let transport = ReqwestTransport::new(&config)?;
    Ok(GnapClient::new(FileStore::new(&session.state), transport, config)?)
}

pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
