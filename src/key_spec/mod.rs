/*!
 * Desired-state description of a key file
 *
 * A [`KeySpec`] is built from caller input (typed builder calls, string
 * option bundles or JSON) and resolves the algorithm tag into a closed
 * [`KeyParams`] variant.
 */

mod key_spec;

pub use key_spec::*;
