//! `buildprobe vars` command

use anyhow::{Context, Result};

use crate::cli::VarsArgs;
use buildprobe::BuildVariables;

pub fn execute(args: VarsArgs) -> Result<()> {
    if args.help_vars {
        print!("{}", BuildVariables::help_text());
    }

    let vars = BuildVariables::from_args(&args.vars)?;
    vars.check_unknown(args.help_vars)?;

    if !args.help_vars {
        let text = toml::to_string_pretty(&vars).context("failed to format build variables")?;
        print!("{}", text);
    }
    Ok(())
}
