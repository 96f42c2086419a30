//! User build variables.
//!
//! Variables come from two places, later ones winning:
//! - a TOML variable file named by the `config` variable (a flat table)
//! - `KEY=VALUE` command-line arguments
//!
//! Unknown command-line variables are collected so they can be reported
//! together. Unknown keys in the variable file are only warned about.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::configure::environment::BuildEnvironment;
use crate::configure::error::ConfigureError;
use crate::configure::merge::{apply_prefix_paths, PrefixOptions};

/// Compilation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuildType {
    Debug,
    RelWithDebInfo,
    #[default]
    Release,
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(BuildType::Debug),
            "relWithDebInfo" => Ok(BuildType::RelWithDebInfo),
            "release" => Ok(BuildType::Release),
            other => Err(format!(
                "'{}' is not one of debug, relWithDebInfo, release",
                other
            )),
        }
    }
}

/// Description of one build variable, for help output.
#[derive(Debug, Clone, Copy)]
pub struct VariableInfo {
    pub name: &'static str,
    pub help: &'static str,
    pub default: Option<&'static str>,
}

/// Every variable [`BuildVariables`] understands.
pub const VARIABLES: &[VariableInfo] = &[
    VariableInfo {
        name: "config",
        help: "location of the TOML file which contains the build variables",
        default: None,
    },
    VariableInfo {
        name: "buildType",
        help: "build type of the compilation (debug|relWithDebInfo|release)",
        default: Some("release"),
    },
    VariableInfo {
        name: "prefixPath",
        help: "used when searching for include files, binaries or libraries \
               ( /prefix/path1:/prefix/path2 )",
        default: None,
    },
    VariableInfo {
        name: "cc",
        help: "C compiler",
        default: None,
    },
    VariableInfo {
        name: "cxx",
        help: "C++ compiler",
        default: None,
    },
];

/// Resolved build variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    pub build_type: BuildType,
    pub prefix_path: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cxx: Option<PathBuf>,
    #[serde(skip)]
    unknown: Vec<String>,
}

impl BuildVariables {
    /// Resolve variables from `KEY=VALUE` arguments and the variable file
    /// they name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cli = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            let Some((key, value)) = arg.split_once('=') else {
                return Err(invalid(arg, "expected KEY=VALUE"));
            };
            cli.push((key.to_string(), value.to_string()));
        }

        let mut vars = BuildVariables::default();

        let config = cli
            .iter()
            .rev()
            .find(|(key, _)| key == "config")
            .map(|(_, value)| PathBuf::from(value));
        if let Some(path) = config {
            for (key, value) in read_variable_file(&path)? {
                if is_known(&key) {
                    vars.set(&key, &value)?;
                } else {
                    tracing::warn!("ignoring unknown variable `{}` in {}", key, path.display());
                }
            }
            vars.config = Some(path);
        }

        for (key, value) in &cli {
            if key == "config" {
                continue;
            }
            if is_known(key) {
                vars.set(key, value)?;
            } else if !vars.unknown.contains(key) {
                vars.unknown.push(key.clone());
            }
        }

        Ok(vars)
    }

    /// Names of unrecognized command-line variables, in input order.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    /// Fail if any command-line variable was not recognized.
    ///
    /// Passes when `serving_help` is set so variables can always be listed.
    pub fn check_unknown(&self, serving_help: bool) -> Result<(), ConfigureError> {
        if self.unknown.is_empty() {
            return Ok(());
        }
        let err = ConfigureError::UnknownVariables {
            names: self.unknown.clone(),
        };
        if serving_help {
            tracing::warn!("{}", err);
            Ok(())
        } else {
            Err(err)
        }
    }

    /// Apply compiler overrides and prefix paths to `env`.
    pub fn apply(&self, env: &mut BuildEnvironment, options: PrefixOptions) {
        if let Some(cc) = &self.cc {
            env.cc = Some(cc.clone());
        }
        if let Some(cxx) = &self.cxx {
            env.cxx = Some(cxx.clone());
        }
        apply_prefix_paths(env, &self.prefix_path, options);
    }

    /// Help text listing every variable.
    pub fn help_text() -> String {
        let mut text = String::new();
        for var in VARIABLES {
            let _ = writeln!(text, "{}: {}", var.name, var.help);
            if let Some(default) = var.default {
                let _ = writeln!(text, "    default: {}", default);
            }
            text.push('\n');
        }
        text
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigureError> {
        match key {
            "buildType" => self.build_type = value.parse().map_err(|e: String| invalid(key, &e))?,
            "prefixPath" => self.prefix_path = parse_prefix_path(value)?,
            "cc" => self.cc = Some(PathBuf::from(value)),
            "cxx" => self.cxx = Some(PathBuf::from(value)),
            _ => {}
        }
        Ok(())
    }
}

fn is_known(key: &str) -> bool {
    VARIABLES.iter().any(|var| var.name == key)
}

fn invalid(name: &str, reason: &str) -> ConfigureError {
    ConfigureError::InvalidVariable {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a path-separator list; `none` or empty means no prefixes.
fn parse_prefix_path(value: &str) -> Result<Vec<PathBuf>, ConfigureError> {
    if value.is_empty() || value == "none" {
        return Ok(Vec::new());
    }

    let paths: Vec<PathBuf> = std::env::split_paths(value).collect();
    for path in &paths {
        if !path.exists() {
            return Err(invalid(
                "prefixPath",
                &format!("path does not exist: {}", path.display()),
            ));
        }
    }
    Ok(paths)
}

/// Read a flat TOML table of variables.
fn read_variable_file(path: &Path) -> Result<Vec<(String, String)>, ConfigureError> {
    if !path.is_file() {
        return Err(invalid(
            "config",
            &format!("file does not exist: {}", path.display()),
        ));
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigureError::Io {
        context: format!("failed to read variable file {}", path.display()),
        source,
    })?;
    let table: toml::Table = contents
        .parse()
        .map_err(|e: toml::de::Error| invalid("config", &e.message().to_string()))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}
