/*!
 * Key file lifecycle
 *
 * [`KeyProvisioner`] checks, creates and removes a single key file per call.
 * A path is either absent or present; `create` moves it to present (or
 * overwrites it) and `destroy` moves it back to absent.
 */

mod provisioner;
pub mod storage;

pub use provisioner::*;
pub use storage::WriteStrategy;
