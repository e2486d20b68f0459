use clap::Parser;
use console::style;
use rusty_gnap::prelude::*;

use crate::{SessionArgs, utils::*};

#[derive(Debug, Parser)]
pub struct PrintStatus {
    /// also print private key material
    #[arg(long)]
    reveal: bool,
}

impl PrintStatus {
    pub fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        let mut state = FileStore::new(&session.state).get()?;
        let label = match state.transaction_state() {
            TransactionState::Idle => style("idle").dim(),
            TransactionState::AwaitingInteraction => style("awaiting interaction").yellow(),
            TransactionState::Authorized => style("authorized").green(),
        };
        eprintln!("- session: {label}");
        if let (false, Some(keys)) = (self.reveal, state.keys.as_mut()) {
            keys.private_key = keys.private_key.to_public();
        }
        print_json(&state)?;
        Ok(())
    }
}
