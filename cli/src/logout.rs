use clap::Parser;

use crate::{SessionArgs, utils::*};

#[derive(Debug, Parser)]
pub struct ForgetSession {}

impl ForgetSession {
    pub fn execute(self, session: &SessionArgs) -> anyhow::Result<()> {
        client(session)?.logout()?;
        println!("true");
        Ok(())
    }
}
