//! `buildprobe cmake` command

use anyhow::Result;

use crate::cli::CmakeArgs;
use buildprobe::builder::CMakeBuilder;

pub fn execute(args: CmakeArgs) -> Result<()> {
    let builder = CMakeBuilder::new(args.project, args.build_dir)
        .cmake(args.cmake)
        .make(args.make)
        .options(args.options)
        .jobs(args.jobs);

    let mut stdout = std::io::stdout().lock();
    builder.build(&mut stdout)
}
