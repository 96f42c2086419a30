//! Parsing of compiler-wrapper and pkg-config output into flag sets.
//!
//! Only tokens with a recognized prefix survive, plus absolute library file
//! paths (`/dir/libfoo.so`), which some wrappers print instead of `-l`.
//! Anything else (optimization flags, warnings, `-Wl,` options) is dropped
//! before grouping.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

/// A category of build-relevant flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlagCategory {
    /// `-I<dir>`
    CppPath,
    /// `-D<name>[=<value>]`
    CppDefines,
    /// `-L<dir>`
    LibPath,
    /// `-l<name>`
    Libs,
}

impl FlagCategory {
    /// All categories, in prefix-matching order.
    pub const ALL: [FlagCategory; 4] = [
        FlagCategory::CppPath,
        FlagCategory::CppDefines,
        FlagCategory::LibPath,
        FlagCategory::Libs,
    ];

    /// The command-line prefix of this category.
    pub fn prefix(self) -> &'static str {
        match self {
            FlagCategory::CppPath => "-I",
            FlagCategory::CppDefines => "-D",
            FlagCategory::LibPath => "-L",
            FlagCategory::Libs => "-l",
        }
    }

    /// Conventional variable name for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagCategory::CppPath => "CPPPATH",
            FlagCategory::CppDefines => "CPPDEFINES",
            FlagCategory::LibPath => "LIBPATH",
            FlagCategory::Libs => "LIBS",
        }
    }

    /// Category of a token, by prefix.
    pub fn of_token(token: &str) -> Option<FlagCategory> {
        Self::ALL
            .into_iter()
            .find(|category| token.starts_with(category.prefix()))
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured flags extracted from tool output.
///
/// Tokens keep their input order within each category. `LIBS` order is link
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagSet {
    flags: BTreeMap<FlagCategory, Vec<String>>,
}

impl FlagSet {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a category.
    pub fn push(&mut self, category: FlagCategory, value: impl Into<String>) {
        self.flags.entry(category).or_default().push(value.into());
    }

    /// Values of a category (empty if none).
    pub fn get(&self, category: FlagCategory) -> &[String] {
        self.flags.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Libraries, in link order.
    pub fn libs(&self) -> &[String] {
        self.get(FlagCategory::Libs)
    }

    /// Include paths.
    pub fn cpppath(&self) -> &[String] {
        self.get(FlagCategory::CppPath)
    }

    /// Library search paths.
    pub fn libpath(&self) -> &[String] {
        self.get(FlagCategory::LibPath)
    }

    /// Preprocessor defines.
    pub fn cppdefines(&self) -> &[String] {
        self.get(FlagCategory::CppDefines)
    }

    /// Whether no category holds any value.
    pub fn is_empty(&self) -> bool {
        self.flags.values().all(Vec::is_empty)
    }

    /// Render back to command-line tokens, grouped by category.
    pub fn to_args(&self) -> Vec<String> {
        self.flags
            .iter()
            .flat_map(|(category, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}{}", category.prefix(), value))
            })
            .collect()
    }
}

/// Split a library file path into its directory and link name.
///
/// `/opt/hdf5/lib/libhdf5.so` gives `("/opt/hdf5/lib", "hdf5")`.
fn library_file(token: &str) -> Option<(&str, &str)> {
    let path = Path::new(token);
    if !path.is_absolute() {
        return None;
    }
    let dir = path.parent()?.to_str()?;
    let file = path.file_name()?.to_str()?;
    let stem = file.strip_prefix("lib")?;

    let name = [".a", ".so", ".dylib"]
        .into_iter()
        .find_map(|ext| stem.strip_suffix(ext))
        // Versioned shared objects: libfoo.so.1.2
        .or_else(|| stem.find(".so.").map(|idx| &stem[..idx]))?;

    if name.is_empty() {
        None
    } else {
        Some((dir, name))
    }
}

/// Drop every token that is not a recognized option.
pub fn remove_unknown_options<'a>(args: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    args.into_iter()
        .filter(|arg| FlagCategory::of_token(arg).is_some() || library_file(arg).is_some())
        .collect()
}

/// Parse command-line text into a flag set.
///
/// A prefix without a value (a bare `-I`) is dropped; its separated
/// argument would be an unrecognized token anyway.
pub fn parse_flags(text: &str) -> FlagSet {
    let mut flags = FlagSet::new();

    for token in remove_unknown_options(text.split_whitespace()) {
        let Some(category) = FlagCategory::of_token(token) else {
            if let Some((dir, name)) = library_file(token) {
                if !flags.libpath().iter().any(|p| p == dir) {
                    flags.push(FlagCategory::LibPath, dir);
                }
                flags.push(FlagCategory::Libs, name);
            }
            continue;
        };
        let value = &token[category.prefix().len()..];
        if !value.is_empty() {
            flags.push(category, value);
        }
    }

    flags
}

/// Parse the output of a compiler wrapper such as `h5cc -show`.
///
/// The first token is the underlying compiler and is discarded.
pub fn parse_wrapper_output(text: &str) -> FlagSet {
    let line = text.trim_start();
    let rest = match line.find(char::is_whitespace) {
        Some(idx) => &line[idx..],
        None => "",
    };
    parse_flags(rest)
}
