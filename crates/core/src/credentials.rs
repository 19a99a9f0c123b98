//! Temporary login credentials issued at activation and manager creation.

use rand::Rng;

/// Length of a generated temporary credential.
pub const TEMP_CREDENTIAL_LENGTH: usize = 12;

/// Printable characters a temporary credential is drawn from. Visually
/// ambiguous characters (`0`/`O`, `1`/`l`/`I`) are left out.
const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789!@#$%&*";

/// Generate a random temporary credential of [`TEMP_CREDENTIAL_LENGTH`]
/// printable characters.
///
/// The plaintext is only ever emailed to its owner; callers persist the
/// Argon2 hash.
pub fn generate_temp_credential() -> String {
    let mut rng = rand::rng();
    (0..TEMP_CREDENTIAL_LENGTH)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}
