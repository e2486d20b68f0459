use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use console::style;
use rusty_gnap::prelude::*;

use crate::{SessionArgs, utils::*};

#[derive(Debug, Parser)]
pub struct RequestGrant {
    /// path to a JSON array of access descriptors
    access: PathBuf,
    /// where the authorization server sends the user back after interaction
    #[arg(short = 'u', long, env = "GNAP_CLIENT_URI")]
    client_uri: String,
    /// root of the resource server, used when it does not advertise its authorization server
    #[arg(short = 'r', long, env = "GNAP_SERVER_ROOT")]
    server_root: String,
    /// name displayed to the user by the authorization server
    #[arg(short = 'n', long, env = "GNAP_CLIENT_NAME", default_value = "rusty-gnap")]
    client_name: String,
}

impl RequestGrant {
    pub async fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(&self.access)
            .with_context(|| format!("cannot read access descriptors {}", self.access.display()))?;
        let access = serde_json::from_str::<Vec<AccessDescriptor>>(&raw)?;

        let client = client(session)?;
        let outcome = client
            .tx(access, &self.client_uri, &self.server_root, &self.client_name)
            .await;
        let redirect = match &outcome {
            GnapOutcome::Success(doc) => doc.redirect(),
            GnapOutcome::Error(_) => None,
        };
        if let Some(redirect) = redirect {
            eprintln!("- send the user to: {}", style(redirect).green());
        }
        print_json(&outcome)?;
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct ContinueGrant {
    /// interaction reference the user came back with. Defaults to the one parsed from the redirect
    interact_ref: Option<String>,
    /// client URI, as given to `tx`
    #[arg(short = 'u', long, env = "GNAP_CLIENT_URI")]
    client_uri: String,
}

impl ContinueGrant {
    pub async fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        let client = client(session)?;
        let interact_ref = match self.interact_ref {
            Some(interact_ref) => interact_ref,
            None => client.state()?.interact.interact_ref,
        };
        let outcome = client.continue_tx(&interact_ref, &self.client_uri).await;
        match &outcome {
            GnapOutcome::Success(_) => eprintln!("- {}", style("access token verified").green()),
            GnapOutcome::Error(cause) => eprintln!("- {}", style(cause).red()),
        }
        print_json(&outcome)?;
        Ok(())
    }
}
