//! Generation configuration: runtime selection and output naming.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which validator backend (if any) accompanies the generated types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeChoice {
    /// Types and client only.
    None,
    Zod,
    Valibot,
    IoTs,
    Typebox,
    Yup,
    Arktype,
}

impl RuntimeChoice {
    /// Every supported runtime, in the order they are listed to users.
    pub const ALL: [RuntimeChoice; 7] = [
        RuntimeChoice::None,
        RuntimeChoice::Zod,
        RuntimeChoice::Valibot,
        RuntimeChoice::IoTs,
        RuntimeChoice::Typebox,
        RuntimeChoice::Yup,
        RuntimeChoice::Arktype,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeChoice::None => "none",
            RuntimeChoice::Zod => "zod",
            RuntimeChoice::Valibot => "valibot",
            RuntimeChoice::IoTs => "io-ts",
            RuntimeChoice::Typebox => "typebox",
            RuntimeChoice::Yup => "yup",
            RuntimeChoice::Arktype => "arktype",
        }
    }

    /// Name used in the default output file name (`client` for `none`).
    pub fn file_tag(&self) -> &'static str {
        match self {
            RuntimeChoice::None => "client",
            other => other.as_str(),
        }
    }

    /// Comma separated list of accepted values, for error messages and help.
    pub fn expected_values() -> String {
        Self::ALL
            .iter()
            .map(RuntimeChoice::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RuntimeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeChoice {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|choice| choice.as_str() == value)
            .ok_or_else(|| Error::UnknownRuntime {
                value: value.to_string(),
                expected: Self::expected_values(),
            })
    }
}

/// Validated settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub runtime: RuntimeChoice,
}

impl GenerateConfig {
    /// Validate raw user settings. Fails before any document is read.
    pub fn new(input: &Path, output: Option<&Path>, runtime: &str) -> Result<Self> {
        let runtime = runtime.parse::<RuntimeChoice>()?;
        let output = match output {
            Some(path) => validate_output_path(path)?,
            None => default_output_path(input, runtime),
        };
        Ok(Self {
            input: input.to_path_buf(),
            output,
            runtime,
        })
    }
}

/// `<input>.<runtime>.ts`, using `client` when no validator runtime is selected.
pub fn default_output_path(input: &Path, runtime: RuntimeChoice) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(format!(".{}.ts", runtime.file_tag()));
    PathBuf::from(name)
}

fn validate_output_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    if raw.trim().is_empty() {
        return Err(Error::InvalidOutputPath("path is empty".into()));
    }
    if raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(Error::InvalidOutputPath(format!(
            "'{raw}' names a directory, expected a file"
        )));
    }
    Ok(path.to_path_buf())
}
