// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Salted password hashing.
//!
//! Keys are derived with Argon2id from a random 16-byte salt. Hash and salt
//! are stored base64 encoded next to the parameters that produced them, so a
//! later change of defaults never invalidates an existing password.

use anyhow::{Result, anyhow};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

pub const SALT_LEN: usize = 16;
pub const HASH_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    pub lanes: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            lanes: 1,
        }
    }
}

impl KdfParams {
    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.lanes, Some(HASH_LEN))
            .map_err(|e| anyhow!("Invalid key derivation parameters: {}", e))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
    pub params: KdfParams,
}

pub fn create_hash(password: &str) -> Result<PasswordHash> {
    create_hash_with(password, KdfParams::default())
}

pub fn create_hash_with(password: &str, params: KdfParams) -> Result<PasswordHash> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut out = [0u8; HASH_LEN];
    params
        .hasher()?
        .hash_password_into(password.as_bytes(), &salt, &mut out)
        .map_err(|e| anyhow!("Key derivation failed: {}", e))?;

    Ok(PasswordHash {
        hash: STANDARD.encode(out),
        salt: STANDARD.encode(salt),
        params,
    })
}

/// Returns false on any mismatch, including undecodable hash/salt or
/// parameters the KDF refuses.
pub fn verify(password: &str, stored_hash: &str, stored_salt: &str, params: KdfParams) -> bool {
    let (Ok(expected), Ok(salt)) = (STANDARD.decode(stored_hash), STANDARD.decode(stored_salt))
    else {
        return false;
    };
    let Ok(hasher) = params.hasher() else {
        return false;
    };
    let mut derived = [0u8; HASH_LEN];
    if hasher
        .hash_password_into(password.as_bytes(), &salt, &mut derived)
        .is_err()
    {
        return false;
    }
    constant_time_eq(&derived, &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_kib: 64,
        iterations: 1,
        lanes: 1,
    };

    fn flip_byte(b64: &str, idx: usize) -> String {
        let mut raw = STANDARD.decode(b64).unwrap();
        raw[idx] ^= 0x01;
        STANDARD.encode(raw)
    }

    #[test]
    fn round_trip_verifies() {
        let h = create_hash_with("abc123", FAST).unwrap();
        assert!(verify("abc123", &h.hash, &h.salt, h.params));
        assert!(!verify("abc124", &h.hash, &h.salt, h.params));
    }

    #[test]
    fn salts_are_random() {
        let a = create_hash_with("abc123", FAST).unwrap();
        let b = create_hash_with("abc123", FAST).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
        assert_eq!(STANDARD.decode(&a.salt).unwrap().len(), SALT_LEN);
        assert_eq!(STANDARD.decode(&a.hash).unwrap().len(), HASH_LEN);
    }

    #[test]
    fn any_single_byte_mutation_fails() {
        let h = create_hash_with("abc123", FAST).unwrap();
        for i in 0..HASH_LEN {
            assert!(!verify("abc123", &flip_byte(&h.hash, i), &h.salt, h.params));
        }
        for i in 0..SALT_LEN {
            assert!(!verify("abc123", &h.hash, &flip_byte(&h.salt, i), h.params));
        }
    }

    #[test]
    fn malformed_inputs_are_rejected_not_panicking() {
        let h = create_hash_with("abc123", FAST).unwrap();
        assert!(!verify("abc123", "not base64!!", &h.salt, h.params));
        assert!(!verify("abc123", &h.hash, "%%%", h.params));
        // truncated hash: length mismatch
        let short = STANDARD.encode(&STANDARD.decode(&h.hash).unwrap()[..16]);
        assert!(!verify("abc123", &short, &h.salt, h.params));
        // salt below the KDF minimum
        assert!(!verify("abc123", &h.hash, &STANDARD.encode([1u8; 4]), h.params));
        let bogus = KdfParams {
            memory_kib: 0,
            ..FAST
        };
        assert!(!verify("abc123", &h.hash, &h.salt, bogus));
    }

    #[test]
    fn parameters_are_part_of_the_hash() {
        let h = create_hash_with("abc123", FAST).unwrap();
        let other = KdfParams {
            iterations: 2,
            ..FAST
        };
        assert!(!verify("abc123", &h.hash, &h.salt, other));
    }

    #[test]
    fn default_hash_records_default_params() {
        let p = KdfParams::default();
        assert!(p.memory_kib >= 19 * 1024);
        assert!(p.iterations >= 2);
        let h = create_hash("abc123").unwrap();
        assert_eq!(h.params, p);
        assert!(verify("abc123", &h.hash, &h.salt, h.params));
    }
}
