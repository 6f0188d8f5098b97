use libcrux_ml_dsa::ml_dsa_44::{self, MLDSA44Signature, MLDSA44SigningKey, MLDSA44VerificationKey};
use rand::RngCore;
use sha3::{Digest, Sha3_256};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

// ML-DSA-44 (Dilithium2) parameter sizes per FIPS 204
pub const MLDSA44_VERIFICATION_KEY_LEN: usize = 1312;
pub const MLDSA44_SIGNING_KEY_LEN: usize = 2560;
pub const MLDSA44_SIGNATURE_LEN: usize = 2420;

// Domain separation so ledger signatures cannot be replayed in another protocol
const SIGNING_CONTEXT: &[u8] = b"quantumshield:tx:v1";

pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Crypto(format!("System time error: {e}")))?
        .as_millis();

    // Ensure the timestamp fits in i64
    if duration > i64::MAX as u128 {
        return Err(BlockchainError::Crypto("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

/// SHA3-256 digest, the single hash family used for transaction hashes,
/// block hashes, Merkle nodes and address derivation.
pub fn sha3_256_digest(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Generate a fresh ML-DSA-44 keypair: (verification key, signing key).
pub fn new_key_pair() -> Result<(Vec<u8>, Vec<u8>)> {
    let mut randomness = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut randomness);
    let keypair = ml_dsa_44::generate_key_pair(randomness);
    Ok((
        keypair.verification_key.as_slice().to_vec(),
        keypair.signing_key.as_slice().to_vec(),
    ))
}

pub fn mldsa_sign(signing_key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let sk_bytes: [u8; MLDSA44_SIGNING_KEY_LEN] = signing_key.try_into().map_err(|_| {
        BlockchainError::Crypto(format!(
            "Signing key must be {MLDSA44_SIGNING_KEY_LEN} bytes, got {}",
            signing_key.len()
        ))
    })?;
    let sk = MLDSA44SigningKey::new(sk_bytes);

    let mut randomness = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut randomness);

    let signature = ml_dsa_44::sign(&sk, message, SIGNING_CONTEXT, randomness)
        .map_err(|e| BlockchainError::Crypto(format!("Failed to sign message: {e:?}")))?;
    Ok(signature.as_slice().to_vec())
}

pub fn mldsa_verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> bool {
    let pk_bytes: [u8; MLDSA44_VERIFICATION_KEY_LEN] = match public_key.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let sig_bytes: [u8; MLDSA44_SIGNATURE_LEN] = match signature.try_into() {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let verification_key = MLDSA44VerificationKey::new(pk_bytes);
    let mldsa_sig = MLDSA44Signature::new(sig_bytes);
    ml_dsa_44::verify(&verification_key, message, SIGNING_CONTEXT, &mldsa_sig).is_ok()
}
