//! Byte layout of the target account.
//!
//! The account size is learned once from the encoding of a zeroed payload and
//! cached; every length check goes through [`target_size`].

use std::sync::OnceLock;

use borsh::{BorshDeserialize, BorshSerialize};
pub use data_target::state::TargetAccount;

use crate::errors::WorkflowError;

static TARGET_SIZE: OnceLock<usize> = OnceLock::new();

pub fn encode(payload: &TargetAccount) -> Result<Vec<u8>, WorkflowError> {
    Ok(payload.try_to_vec()?)
}

pub fn encode_zero() -> Result<Vec<u8>, WorkflowError> {
    encode(&TargetAccount::default())
}

pub fn target_size() -> Result<usize, WorkflowError> {
    if let Some(size) = TARGET_SIZE.get() {
        return Ok(*size);
    }
    let size = encode_zero()?.len();
    Ok(*TARGET_SIZE.get_or_init(|| size))
}

/// Decodes raw account data. Any length other than [`target_size`] is
/// rejected; there is no partial decoding.
pub fn decode(bytes: &[u8]) -> Result<TargetAccount, WorkflowError> {
    let expected = target_size()?;
    let malformed = || WorkflowError::MalformedPayload {
        expected,
        actual: bytes.len(),
    };
    if bytes.len() != expected {
        return Err(malformed());
    }
    TargetAccount::try_from_slice(bytes).map_err(|_| malformed())
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn test_target_size_matches_zero_encoding() {
        let zero = encode_zero().unwrap();
        assert_eq!(zero, vec![0u8; 4 * std::mem::size_of::<u32>()]);
        assert_eq!(target_size().unwrap(), zero.len());
        // Cached value stays stable.
        assert_eq!(target_size().unwrap(), zero.len());
    }

    #[test]
    fn test_round_trip() {
        let mut rng = StdRng::seed_from_u64(0);
        let edges = [
            TargetAccount::default(),
            TargetAccount::new([u32::MAX; 4]),
            TargetAccount::new([u32::MAX, 0, u32::MAX, 0x0102_0304]),
        ];
        let random = (0..10_000).map(|_| TargetAccount::new(rng.gen::<[u32; 4]>()));
        for payload in edges.into_iter().chain(random) {
            let bytes = encode(&payload).unwrap();
            assert_eq!(bytes.len(), target_size().unwrap());
            assert_eq!(decode(&bytes).unwrap(), payload);
        }
    }

    #[test]
    fn test_little_endian_fields() {
        let bytes = encode(&TargetAccount::new([0x0102_0304, 0, 0, 1])).unwrap();
        assert_eq!(&bytes[..4], &[4, 3, 2, 1]);
        assert_eq!(&bytes[12..], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let size = target_size().unwrap();
        for len in (0..4 * size).filter(|len| *len != size) {
            let bytes = vec![0u8; len];
            match decode(&bytes) {
                Err(WorkflowError::MalformedPayload { expected, actual }) => {
                    assert_eq!(expected, size);
                    assert_eq!(actual, len);
                }
                other => panic!("expected MalformedPayload for {} bytes, got {:?}", len, other),
            }
        }
    }
}
