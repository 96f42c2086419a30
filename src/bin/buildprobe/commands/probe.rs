//! `buildprobe probe` command

use anyhow::Result;

use crate::cli::{Capability, ProbeArgs};
use buildprobe::configure::{BuildEnvironment, Checker, PrefixOptions, ProbeResult, ToolchainChecker};
use buildprobe::libs::{apf, asagi, hdf5, metis, openmp, simmodsuite};
use buildprobe::BuildVariables;

pub fn execute(args: ProbeArgs) -> Result<()> {
    let vars = BuildVariables::from_args(&args.vars)?;
    vars.check_unknown(false)?;

    let mut env = BuildEnvironment::from_process();
    vars.apply(&mut env, PrefixOptions::default());

    let mut checker = ToolchainChecker::new();
    let found = find(&args, &mut env, &mut checker)?;

    if !found {
        println!("{} not found", args.capability.as_str());
        return Ok(());
    }

    print!("{}", render_flags(&env));
    Ok(())
}

/// Compile lines for C and C++, then the link line.
fn render_flags(env: &BuildEnvironment) -> String {
    let common = env.compile_flags();
    let mut c = common.clone();
    c.extend(env.cflags.iter().cloned());
    let mut cxx = common;
    cxx.extend(env.cxxflags.iter().cloned());

    format!(
        "compile: {}\ncompile-cxx: {}\nlink: {}\n",
        c.join(" "),
        cxx.join(" "),
        env.link_flags().join(" ")
    )
}

fn find(args: &ProbeArgs, env: &mut BuildEnvironment, checker: &mut dyn Checker) -> ProbeResult {
    let required = !args.optional;

    match args.capability {
        Capability::Hdf5 => {
            let options = hdf5::Options {
                parallel: args.parallel,
            };
            hdf5::find(env, checker, &options, required)
        }
        Capability::Metis => {
            let options = metis::Options {
                parallel: args.parallel,
            };
            metis::find(env, checker, &options, required)
        }
        Capability::Openmp => {
            let options = openmp::Options {
                version: args.openmp_version.clone(),
            };
            openmp::find(env, checker, &options, required)
        }
        Capability::Apf => {
            let options = apf::Options {
                simmetrix: args.simmetrix,
                zoltan: args.zoltan,
            };
            apf::find(env, checker, &options, required)
        }
        Capability::Asagi => {
            let options = asagi::Options {
                parallel: args.parallel,
            };
            asagi::find(env, checker, &options, required)
        }
        Capability::Simmodsuite => {
            let options = simmodsuite::Options {
                mpi_lib: args.mpi_lib.clone(),
                modify_rpath: !args.no_rpath,
            };
            simmodsuite::find(env, checker, &options, required)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_flags_includes_cxx_line() {
        let mut env = BuildEnvironment::new();
        env.append_cppdefines(["ASAGI_NOMPI".to_string()]);
        env.cflags.push("-std=c99".to_string());
        env.cxxflags.push("-fopenmp".to_string());

        let out = render_flags(&env);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("compile: "));
        assert!(lines[0].contains("-DASAGI_NOMPI") && lines[0].contains("-std=c99"));
        assert!(!lines[0].contains("-fopenmp"));
        assert!(lines[1].starts_with("compile-cxx: "));
        assert!(lines[1].contains("-DASAGI_NOMPI") && lines[1].contains("-fopenmp"));
        assert!(!lines[1].contains("-std=c99"));
        assert!(lines[2].starts_with("link: "));
    }
}
