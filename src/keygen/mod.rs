/*!
 * Private key generation and PEM serialization
 *
 * RSA keys are generated with the requested modulus length and EC keys on a
 * named curve. Keys are written as traditional PEM (`RSA PRIVATE KEY` /
 * `EC PRIVATE KEY`), optionally encrypted with AES-256-CBC.
 */

pub mod curves;
mod keygen;

pub use keygen::*;

#[cfg(test)]
mod tests;
