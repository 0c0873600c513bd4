//! Salted PBKDF2 credential records.
//!
//! A stored credential has the shape
//! `pbkdf2-sha256$<iterations>$<salt-hex>$<hash-hex>`. The salt is random
//! per account, so two accounts with the same password never share a
//! record, and the iteration count rides along so it can be raised later
//! without invalidating existing rows.

use pbkdf2::pbkdf2_hmac_array;
use rand::RngCore;
use sha2::Sha256;

const ALGORITHM: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 600_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Derives a fresh credential record for a password.
pub(crate) fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, ITERATIONS);
    format!(
        "{ALGORITHM}${ITERATIONS}${}${}",
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Checks a password against a stored record. `None` means the record
/// itself cannot be parsed; the caller decides how loudly to fail.
pub(crate) fn verify_password(password: &str, record: &str) -> Option<bool> {
    let mut parts = record.split('$');
    if parts.next()? != ALGORITHM {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = hex::decode(parts.next()?).ok()?;
    let expected = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    let actual = derive(password, &salt, iterations);
    Some(actual[..] == expected[..])
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    pbkdf2_hmac_array::<Sha256, HASH_LEN>(password.as_bytes(), salt, iterations)
}
