use clap::Parser;
use console::style;
use rusty_gnap::prelude::*;

use crate::{SessionArgs, utils::*};

#[derive(Debug, Parser)]
pub struct GenerateKeyPair {
    /// signature algorithm of the new key pair
    #[arg(short = 'a', long, default_value = "RS256")]
    alg: KeyAlgorithm,
}

impl GenerateKeyPair {
    pub fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        let client = client(session)?;
        let keys = client.create_key_pair(self.alg)?;
        println!("- kid: {}", style(&keys.kid).cyan());
        println!("- public JWK: \n{}", style(serde_json::to_string_pretty(&keys.public_key)?).cyan());
        Ok(())
    }
}
