use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{error_codes, KeyError, KeyResult};
use crate::secure_memory::Passphrase;

/// Default RSA modulus length in bits
pub const DEFAULT_RSA_SIZE: u32 = 2048;

/// Default named curve for EC keys
pub const DEFAULT_EC_CURVE: &str = "secp384r1";

/// Option names recognized in a key option bundle
pub const RECOGNIZED_OPTIONS: [&str; 5] = ["path", "authentication", "size", "curve", "password"];

/// Key algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authentication {
    #[default]
    Rsa,
    Ec,
}

impl Authentication {
    pub fn as_str(&self) -> &'static str {
        match self {
            Authentication::Rsa => "rsa",
            Authentication::Ec => "ec",
        }
    }
}

impl fmt::Display for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Authentication {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa" => Ok(Authentication::Rsa),
            "ec" => Ok(Authentication::Ec),
            other => Err(KeyError::invalid_parameter("authentication", "rsa or ec", other)),
        }
    }
}

/// Algorithm parameters consulted by key generation.
///
/// Only one of size/curve is meaningful for a given key, so the two live in
/// separate variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyParams {
    Rsa { size: u32 },
    Ec { curve: String },
}

impl KeyParams {
    pub fn authentication(&self) -> Authentication {
        match self {
            KeyParams::Rsa { .. } => Authentication::Rsa,
            KeyParams::Ec { .. } => Authentication::Ec,
        }
    }
}

impl Default for KeyParams {
    fn default() -> Self {
        KeyParams::Rsa {
            size: DEFAULT_RSA_SIZE,
        }
    }
}

impl fmt::Display for KeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyParams::Rsa { size } => write!(f, "rsa-{}", size),
            KeyParams::Ec { curve } => write!(f, "ec-{}", curve),
        }
    }
}

/// Desired state of one private key file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    path: PathBuf,
    params: KeyParams,
    password: Option<Passphrase>,
}

impl KeySpec {
    /// An unencrypted RSA-2048 key at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            params: KeyParams::default(),
            password: None,
        }
    }

    pub fn builder() -> KeySpecBuilder {
        KeySpecBuilder::default()
    }

    /// Replace the algorithm parameters
    pub fn with_params(mut self, params: KeyParams) -> Self {
        self.params = params;
        self
    }

    /// Encrypt the key with `password`; an empty passphrase disables encryption
    pub fn with_password(mut self, password: impl Into<Passphrase>) -> Self {
        self.password = password.into().non_empty();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn params(&self) -> &KeyParams {
        &self.params
    }

    pub fn authentication(&self) -> Authentication {
        self.params.authentication()
    }

    pub fn password(&self) -> Option<&Passphrase> {
        self.password.as_ref()
    }
}

/// Raw caller input for a [`KeySpec`], mirroring the option bundle
/// `path`, `authentication`, `size`, `curve`, `password`.
///
/// `size` is consulted only for RSA and `curve` only for EC.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeySpecBuilder {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    authentication: Option<Authentication>,
    #[serde(default)]
    size: Option<u32>,
    #[serde(default)]
    curve: Option<String>,
    #[serde(default)]
    password: Option<Passphrase>,
}

impl KeySpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn curve(mut self, curve: impl Into<String>) -> Self {
        self.curve = Some(curve.into());
        self
    }

    pub fn password(mut self, password: impl Into<Passphrase>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Parse a JSON option bundle such as
    /// `{"path": "/etc/ssl/foo.key", "authentication": "ec", "curve": "prime239v1"}`
    pub fn from_json(json: &str) -> KeyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a string key/value option bundle.
    ///
    /// Unknown option names and unparsable values are rejected. Later entries
    /// override earlier ones.
    pub fn from_options<I, K, V>(options: I) -> KeyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = Self::default();
        for (key, value) in options {
            let value: String = value.into();
            match key.as_ref() {
                "path" => builder.path = Some(PathBuf::from(value)),
                "authentication" => builder.authentication = Some(value.parse()?),
                "size" => builder.size = Some(parse_size(&value)?),
                "curve" => builder.curve = Some(value),
                "password" => builder.password = Some(Passphrase::new(value)),
                other => {
                    return Err(KeyError::InvalidParameter {
                        parameter: other.to_string(),
                        expected: RECOGNIZED_OPTIONS.join(", "),
                        actual: "unknown option".to_string(),
                        error_code: error_codes::UNKNOWN_OPTION,
                    })
                }
            }
        }
        Ok(builder)
    }

    /// Resolve the bundle into a [`KeySpec`]
    pub fn build(self) -> KeyResult<KeySpec> {
        let path = match self.path {
            Some(path) if !path.as_os_str().is_empty() => path,
            Some(_) => {
                return Err(KeyError::invalid_parameter(
                    "path",
                    "a non-empty filesystem path",
                    "empty string",
                ))
            }
            None => {
                return Err(KeyError::InvalidParameter {
                    parameter: "path".to_string(),
                    expected: "a filesystem path".to_string(),
                    actual: "missing".to_string(),
                    error_code: error_codes::MISSING_OPTION,
                })
            }
        };

        let params = match self.authentication.unwrap_or_default() {
            Authentication::Rsa => KeyParams::Rsa {
                size: self.size.unwrap_or(DEFAULT_RSA_SIZE),
            },
            Authentication::Ec => KeyParams::Ec {
                curve: self
                    .curve
                    .unwrap_or_else(|| DEFAULT_EC_CURVE.to_string()),
            },
        };

        Ok(KeySpec {
            path,
            params,
            password: self.password.and_then(Passphrase::non_empty),
        })
    }
}

// Range checks happen at generation time, here only the integer syntax.
fn parse_size(value: &str) -> KeyResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| KeyError::invalid_parameter("size", "a positive integer", value))
}
