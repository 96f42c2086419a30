//! `buildprobe flags` command

use anyhow::Result;

use crate::cli::FlagsArgs;
use buildprobe::configure::{parse_flags, parse_wrapper_output, FlagCategory};

pub fn execute(args: FlagsArgs) -> Result<()> {
    let text = args.text.join(" ");
    let flags = if args.wrapper {
        parse_wrapper_output(&text)
    } else {
        parse_flags(&text)
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&flags)?);
        return Ok(());
    }

    for category in FlagCategory::ALL {
        let values = flags.get(category);
        if !values.is_empty() {
            println!("{}: {}", category, values.join(" "));
        }
    }
    Ok(())
}
