use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::storage::{self, WriteStrategy, DEFAULT_KEY_FILE_MODE};
use crate::error::{KeyError, KeyResult};
use crate::key_spec::KeySpec;
use crate::keygen::{self, KeyInfo};
use crate::secure_memory::Passphrase;

/// Options controlling how key files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvisionerOptions {
    pub write_strategy: WriteStrategy,
    /// Unix permission bits for the key file
    pub file_mode: u32,
}

impl Default for ProvisionerOptions {
    fn default() -> Self {
        Self {
            write_strategy: WriteStrategy::Atomic,
            file_mode: DEFAULT_KEY_FILE_MODE,
        }
    }
}

/// Desired presence of a key file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    #[default]
    Present,
    Absent,
}

impl FromStr for Ensure {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Ensure::Present),
            "absent" => Ok(Ensure::Absent),
            other => Err(KeyError::invalid_parameter("ensure", "present or absent", other)),
        }
    }
}

/// What [`KeyProvisioner::ensure`] did to the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Created,
    Removed,
    Unchanged,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Change::Created => "created",
            Change::Removed => "removed",
            Change::Unchanged => "unchanged",
        })
    }
}

/// Creates, checks and removes private key files.
///
/// Every call is a self-contained blocking operation. Nothing about a key is
/// retained between calls, and concurrent writers to one path are not
/// coordinated: the last writer wins.
///
/// # Example
///
/// ```no_run
/// use ssl_pkey::prelude::*;
///
/// fn main() -> KeyResult<()> {
///     let provisioner = KeyProvisioner::new();
///     let spec = KeySpec::builder()
///         .path("/etc/ssl/private/foo.key")
///         .authentication(Authentication::Ec)
///         .curve("prime239v1")
///         .build()?;
///
///     if !provisioner.exists(spec.path())? {
///         provisioner.create(&spec)?;
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyProvisioner {
    options: ProvisionerOptions,
}

impl KeyProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ProvisionerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProvisionerOptions {
        &self.options
    }

    /// Report whether a filesystem entry exists at `path`.
    ///
    /// The contents are not validated. A missing entry is `Ok(false)`; only
    /// access failures are errors.
    pub fn exists(&self, path: impl AsRef<Path>) -> KeyResult<bool> {
        storage::path_exists(path.as_ref())
    }

    /// Generate a key for `spec` and write it to `spec.path()`, replacing any
    /// existing file.
    ///
    /// # Errors
    ///
    /// * `KeyGenerationError` if the size or curve is rejected
    /// * `SerializationError` if PEM encoding or encryption fails
    /// * `IoError` if the file cannot be written
    pub fn create(&self, spec: &KeySpec) -> KeyResult<()> {
        log::info!(
            "Creating {} private key at {} ({})",
            spec.params(),
            spec.path().display(),
            if spec.password().is_some() {
                "encrypted"
            } else {
                "unencrypted"
            }
        );

        let pem = keygen::generate_pem(spec.params(), spec.password())?;
        storage::write_key_file(
            spec.path(),
            &pem,
            self.options.write_strategy,
            self.options.file_mode,
        )?;

        log::debug!("Wrote {} bytes to {}", pem.len(), spec.path().display());
        Ok(())
    }

    /// Delete the key file at `path`.
    ///
    /// Not idempotent: a missing file is an `IoError` with kind `NotFound`.
    pub fn destroy(&self, path: impl AsRef<Path>) -> KeyResult<()> {
        let path = path.as_ref();
        log::info!("Removing private key at {}", path.display());
        storage::remove_key_file(path)
    }

    /// Bring the file at `spec.path()` to the `ensure` state.
    ///
    /// An existing file satisfies `Present` regardless of its contents.
    pub fn ensure(&self, spec: &KeySpec, ensure: Ensure) -> KeyResult<Change> {
        let present = self.exists(spec.path())?;
        let change = match (ensure, present) {
            (Ensure::Present, true) | (Ensure::Absent, false) => Change::Unchanged,
            (Ensure::Present, false) => {
                self.create(spec)?;
                Change::Created
            }
            (Ensure::Absent, true) => {
                self.destroy(spec.path())?;
                Change::Removed
            }
        };

        log::debug!("ensure {:?} on {}: {}", ensure, spec.path().display(), change);
        Ok(change)
    }

    /// Read the key file at `path` and describe it
    pub fn inspect(
        &self,
        path: impl AsRef<Path>,
        password: Option<&Passphrase>,
    ) -> KeyResult<KeyInfo> {
        let pem = zeroize::Zeroizing::new(storage::read_key_file(path.as_ref())?);
        keygen::inspect_pem(&pem, password)
    }
}
