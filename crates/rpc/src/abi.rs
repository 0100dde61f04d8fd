//! Contract ABI encoding for the gateway's remote operations.
//!
//! Only the two parameter types the operations use are supported: `uint256` (a static
//! 32-byte word) and `string` (dynamic: an offset in the head, then length and padded UTF-8
//! bytes in the tail).

use medchain_core::{CallArg, RemoteOperation};
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("{operation} takes {expected} arguments, got {got}")]
    Arity {
        operation: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("argument {index} of {operation} must be {expected}, got {got}")]
    Type {
        operation: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },
}

/// First four bytes of the Keccak-256 hash of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode calldata for `operation` with positional `args`.
///
/// Argument types are checked against the operation's declared parameter types.
pub fn encode_call(operation: RemoteOperation, args: &[CallArg]) -> Result<Vec<u8>, AbiError> {
    let params = operation.param_types();
    if params.len() != args.len() {
        return Err(AbiError::Arity {
            operation: operation.name(),
            expected: params.len(),
            got: args.len(),
        });
    }

    let head_len = WORD * args.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (index, (arg, expected)) in args.iter().zip(params).enumerate() {
        if arg.abi_type() != *expected {
            return Err(AbiError::Type {
                operation: operation.name(),
                index,
                expected: *expected,
                got: arg.abi_type(),
            });
        }

        match arg {
            CallArg::Uint(value) => head.extend_from_slice(&uint_word(*value)),
            _ => {
                let text = arg.to_string();
                let bytes = text.as_bytes();
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
                tail.extend_from_slice(&uint_word(bytes.len() as u64));
                tail.extend_from_slice(bytes);
                let padding = (WORD - bytes.len() % WORD) % WORD;
                tail.resize(tail.len() + padding, 0);
            }
        }
    }

    let mut out = Vec::with_capacity(4 + head.len() + tail.len());
    out.extend_from_slice(&selector(&operation.signature()));
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(data: &[u8], index: usize) -> &[u8] {
        &data[4 + index * WORD..4 + (index + 1) * WORD]
    }

    #[test]
    fn selector_matches_known_vector() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
    }

    #[test]
    fn encodes_single_string() {
        let data = encode_call(
            RemoteOperation::CreateMedicalRecord,
            &[CallArg::Text("P1".into())],
        )
        .expect("encode");

        assert_eq!(data.len(), 4 + 3 * WORD);
        assert_eq!(&data[..4], &selector("createMedicalRecord(string)"));
        assert_eq!(word(&data, 0), &uint_word(0x20));
        assert_eq!(word(&data, 1), &uint_word(2));
        assert_eq!(&word(&data, 2)[..2], b"P1");
        assert!(word(&data, 2)[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn string_offsets_account_for_earlier_tails() {
        let args = ["H1", "General", "123 Main St", "Cardiology"]
            .map(|s| CallArg::Text(s.into()));
        let data = encode_call(RemoteOperation::StoreHospitalDetails, &args).expect("encode");

        // Four head words, then four (length, one data word) pairs.
        assert_eq!(data.len(), 4 + 4 * WORD + 4 * 2 * WORD);
        assert_eq!(word(&data, 0), &uint_word(0x80));
        assert_eq!(word(&data, 1), &uint_word(0xc0));
        assert_eq!(word(&data, 2), &uint_word(0x100));
        assert_eq!(word(&data, 3), &uint_word(0x140));
        assert_eq!(word(&data, 8), &uint_word(11));
        assert_eq!(&word(&data, 9)[..11], b"123 Main St");
        assert_eq!(word(&data, 10), &uint_word(10));
    }

    #[test]
    fn long_strings_span_multiple_words() {
        let long = "x".repeat(40);
        let data = encode_call(RemoteOperation::CreateMedicalRecord, &[CallArg::Text(long)])
            .expect("encode");
        assert_eq!(data.len(), 4 + WORD + WORD + 2 * WORD);
        assert_eq!(word(&data, 1), &uint_word(40));
    }

    #[test]
    fn uint_arguments_are_inline() {
        let mut args: Vec<CallArg> = (0..10).map(|i| CallArg::Text(format!("v{i}"))).collect();
        args[2] = CallArg::Uint(36);
        args[4] = CallArg::Decimal(165.5);
        let data = encode_call(RemoteOperation::StorePatientDetails, &args).expect("encode");

        assert_eq!(word(&data, 2), &uint_word(36));
        // Nine dynamic arguments, each a length word plus one data word.
        assert_eq!(data.len(), 4 + 10 * WORD + 9 * 2 * WORD);
        assert_eq!(word(&data, 0), &uint_word(10 * WORD as u64));
    }

    #[test]
    fn rejects_mismatched_arguments() {
        let err = encode_call(RemoteOperation::CreateMedicalRecord, &[]).expect_err("arity");
        assert!(matches!(err, AbiError::Arity { expected: 1, got: 0, .. }));

        let args = [
            CallArg::Text("H1".into()),
            CallArg::Uint(1),
            CallArg::Text("a".into()),
            CallArg::Text("b".into()),
        ];
        let err = encode_call(RemoteOperation::StoreHospitalDetails, &args).expect_err("type");
        assert_eq!(
            err,
            AbiError::Type {
                operation: "storeHospitalDetails",
                index: 1,
                expected: "string",
                got: "uint256",
            }
        );
    }
}
