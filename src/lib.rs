/*!
 * ssl-pkey: private key file provisioning
 *
 * This crate makes sure a private key file exists with the requested
 * properties, or removes it when it is no longer wanted:
 *
 * - RSA keys with a chosen modulus length (default 2048 bits)
 * - EC keys on a named curve (default secp384r1)
 * - optional AES-256-CBC passphrase encryption of the PEM output
 *
 * The file itself is the provisioned state; there is no metadata store.
 * Callers check [`KeyProvisioner::exists`] and then call
 * [`KeyProvisioner::create`] or [`KeyProvisioner::destroy`], or let
 * [`KeyProvisioner::ensure`] do both steps for one file.
 */

/// Common error types for key provisioning
pub mod error;

/// Desired-state description of a key file
pub mod key_spec;

/// RSA/EC key generation and PEM serialization
pub mod keygen;

/// Existence checks, creation and removal of key files
pub mod provisioner;

/// Passphrase and key material handling
pub mod secure_memory;

pub use error::{KeyError, KeyResult};
pub use key_spec::{Authentication, KeyParams, KeySpec, KeySpecBuilder};
pub use keygen::KeyInfo;
pub use provisioner::{Change, Ensure, KeyProvisioner, ProvisionerOptions, WriteStrategy};
pub use secure_memory::Passphrase;

/// Initialize the underlying OpenSSL library.
///
/// Safe to call more than once. Every operation also works without it, but
/// calling it up front makes initialization failures surface early.
///
/// # Example
///
/// ```
/// fn main() -> Result<(), ssl_pkey::KeyError> {
///     ssl_pkey::init()?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<(), KeyError> {
    openssl::init();
    log::debug!("OpenSSL initialized: {}", openssl::version::version());
    Ok(())
}

/// The types most callers need.
pub mod prelude {
    pub use crate::error::{KeyError, KeyResult};
    pub use crate::init;
    pub use crate::key_spec::{Authentication, KeyParams, KeySpec, KeySpecBuilder};
    pub use crate::keygen::{inspect_pem, KeyInfo};
    pub use crate::provisioner::{
        Change, Ensure, KeyProvisioner, ProvisionerOptions, WriteStrategy,
    };
    pub use crate::secure_memory::Passphrase;
}
