use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use keygen::*;
pub use logout::*;
pub use observability::*;
pub use status::*;
pub use tx::*;
pub use verify::*;

mod keygen;
mod logout;
mod observability;
mod status;
mod tx;
mod utils;
mod verify;

#[derive(Debug, Parser)]
#[command(name = "rusty-gnap", version, about = "Drives a GNAP client session kept in a JSON file")]
pub struct RustyCli {
    #[command(flatten)]
    pub session: SessionArgs,
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Options shared by every command
#[derive(Debug, clap::Args)]
pub struct SessionArgs {
    /// path to the JSON file holding the session
    #[arg(short = 's', long, env = "GNAP_STATE", default_value = "gnap.json", global = true)]
    pub state: PathBuf,
    /// path to a JSON client configuration
    #[arg(short = 'c', long, env = "GNAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generates a new client key pair, replacing the current one
    Keygen {
        #[command(flatten)]
        delegate: GenerateKeyPair,
    },
    /// Requests a grant and prints where to send the user
    Tx {
        #[command(flatten)]
        delegate: RequestGrant,
    },
    /// Continues the pending grant with the reference the user came back with
    Continue {
        #[command(flatten)]
        delegate: ContinueGrant,
    },
    /// Verifies a JWT against the keys of an authorization server
    Verify {
        #[command(flatten)]
        delegate: VerifyJwt,
    },
    /// Forgets the access token and the pending grant
    Logout {
        #[command(flatten)]
        delegate: ForgetSession,
    },
    /// Prints the session
    Status {
        #[command(flatten)]
        delegate: PrintStatus,
    },
}
