use clap::Parser;
use console::style;

use crate::{SessionArgs, utils::*};

#[derive(Debug, Parser)]
pub struct VerifyJwt {
    /// JWT to verify. Defaults to the session's access token
    jwt: Option<String>,
    /// authorization server publishing the verification keys. Defaults to the session's one
    #[arg(short = 'S', long)]
    server: Option<String>,
}

impl VerifyJwt {
    pub async fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        let client = client(session)?;
        let state = client.state()?;
        let jwt = self.jwt.unwrap_or(state.jwt);
        anyhow::ensure!(!jwt.is_empty(), "no JWT given and none in the session");
        let server = self.server.unwrap_or(state.gnap_server);
        anyhow::ensure!(!server.is_empty(), "no server given and none discovered yet");

        let report = client.verify_jwt(&jwt, &server).await;
        if report.is_valid() {
            eprintln!("- {}", style("valid").green());
        } else {
            eprintln!("- {}", style("invalid").red());
        }
        print_json(&report)?;
        Ok(())
    }
}
