//! Validation and canonicalization of raw transaction requests.
//!
//! [`normalize`] is the only way to obtain an [`UnsignedTransaction`]. It
//! borrows the caller's request, never mutates it, and fails fast, before
//! any hashing or signing, on the first rule a request breaks:
//!
//! 1. `chainId` must be present and at least 1.
//! 2. A gas limit must be present (`gasLimit`, or its `gas` alias).
//! 3. Numeric fields must not be negative.
//! 4. Addresses must be 20 bytes of hex; data must be hex.
//!
//! Defaults: absent `nonce`, `gasPrice`, `value` and `shardingFlag` are zero;
//! absent or empty `to`/`via` mean "no address"; absent `data` is empty.
//! `systemContract` is reserved and always zero, whatever the caller sent.

use alloy_primitives::{Address, Bytes, U256};

use super::types::{ParsedQuantity, Quantity, TransactionRequest, UnsignedTransaction};
use crate::crypto::keys::{decode_hex_padded, parse_address};
use crate::error::KeyringError;

/// Validates `request` and produces its canonical form.
pub fn normalize(request: &TransactionRequest) -> Result<UnsignedTransaction, KeyringError> {
    let chain_id = chain_id(request.chain_id.as_ref())?;
    let (gas_field, gas_limit) = gas_limit(request)?;

    let nonce = non_negative("nonce", request.nonce.as_ref())?;
    if gas_limit.negative {
        return Err(KeyringError::NegativeNumericField { field: gas_field });
    }
    let gas_price = non_negative("gasPrice", request.gas_price.as_ref())?;
    let value = non_negative("value", request.value.as_ref())?;
    let sharding_flag = non_negative("shardingFlag", request.sharding_flag.as_ref())?;

    let to = optional_address(request.to.as_deref())?;
    let via = optional_address(request.via.as_deref())?;
    let data = payload(request.data.as_deref())?;

    Ok(UnsignedTransaction {
        nonce,
        system_contract: U256::ZERO,
        gas_price,
        gas_limit: gas_limit.magnitude,
        to,
        value,
        data,
        sharding_flag,
        via,
        chain_id,
    })
}

fn chain_id(quantity: Option<&Quantity>) -> Result<u64, KeyringError> {
    let quantity =
        quantity.ok_or_else(|| KeyringError::InvalidChainId("chain id is missing".to_string()))?;
    let parsed = quantity.parse("chainId")?;
    if parsed.negative || parsed.is_zero() {
        return Err(KeyringError::InvalidChainId(format!(
            "{} is below 1",
            parsed
        )));
    }
    u64::try_from(parsed.magnitude)
        .map_err(|_| KeyringError::InvalidChainId(format!("{} does not fit in 64 bits", parsed)))
}

/// Picks `gasLimit` when present, else its `gas` alias.
///
/// Only absence is an error. A present zero is encoded like any other zero.
fn gas_limit(
    request: &TransactionRequest,
) -> Result<(&'static str, ParsedQuantity), KeyringError> {
    match (request.gas_limit.as_ref(), request.gas.as_ref()) {
        (Some(quantity), _) => Ok(("gasLimit", quantity.parse("gasLimit")?)),
        (None, Some(quantity)) => Ok(("gas", quantity.parse("gas")?)),
        (None, None) => Err(KeyringError::MissingGasLimit),
    }
}

fn non_negative(field: &'static str, quantity: Option<&Quantity>) -> Result<U256, KeyringError> {
    let Some(quantity) = quantity else {
        return Ok(U256::ZERO);
    };
    let parsed = quantity.parse(field)?;
    if parsed.negative {
        return Err(KeyringError::NegativeNumericField { field });
    }
    Ok(parsed.magnitude)
}

fn optional_address(input: Option<&str>) -> Result<Option<Address>, KeyringError> {
    match input.map(str::trim) {
        None | Some("") | Some("0x") | Some("0X") => Ok(None),
        Some(text) => parse_address(text).map(Some),
    }
}

fn payload(input: Option<&str>) -> Result<Bytes, KeyringError> {
    match input {
        None => Ok(Bytes::new()),
        Some(text) => decode_hex_padded(text)
            .map(Bytes::from)
            .map_err(|e| KeyringError::InvalidData(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TransactionRequest {
        TransactionRequest::new()
            .nonce("0x6c")
            .gas_price("0xbebc200")
            .gas_limit("0x4c4b40")
            .to("0xD814F2ac2c4cA49b33066582E4e97EBae02F2aB9")
            .value("0x115dd030eb169800")
            .data("0x0")
            .chain_id(101)
    }

    #[test]
    fn normalizes_reference_request() {
        let tx = normalize(&base()).unwrap();
        assert_eq!(tx.nonce, U256::from(0x6c));
        assert_eq!(tx.gas_price, U256::from(0xbebc200u64));
        assert_eq!(tx.gas_limit, U256::from(0x4c4b40u64));
        assert_eq!(tx.value, U256::from(0x115dd030eb169800u64));
        assert_eq!(tx.data, Bytes::from(vec![0x00]));
        assert_eq!(tx.chain_id, 101);
        assert_eq!(tx.sharding_flag, U256::ZERO);
        assert!(tx.via.is_none());
    }

    #[test]
    fn does_not_mutate_request() {
        let request = base().system_contract(5);
        let before = request.clone();
        normalize(&request).unwrap();
        assert_eq!(request, before);
    }

    #[test]
    fn rejects_zero_chain_id() {
        assert!(matches!(
            normalize(&base().chain_id(0)),
            Err(KeyringError::InvalidChainId(_))
        ));
    }

    #[test]
    fn rejects_negative_and_missing_chain_id() {
        assert!(matches!(
            normalize(&base().chain_id(-3)),
            Err(KeyringError::InvalidChainId(_))
        ));
        let mut request = base();
        request.chain_id = None;
        assert!(matches!(
            normalize(&request),
            Err(KeyringError::InvalidChainId(_))
        ));
    }

    #[test]
    fn rejects_chain_id_wider_than_u64() {
        assert!(matches!(
            normalize(&base().chain_id("0x10000000000000000")),
            Err(KeyringError::InvalidChainId(_))
        ));
    }

    #[test]
    fn chain_id_is_checked_before_gas() {
        let mut request = base().chain_id(0);
        request.gas_limit = None;
        assert!(matches!(
            normalize(&request),
            Err(KeyringError::InvalidChainId(_))
        ));
    }

    #[test]
    fn missing_gas_limit() {
        let mut request = base();
        request.gas_limit = None;
        assert_eq!(normalize(&request), Err(KeyringError::MissingGasLimit));
    }

    #[test]
    fn present_zero_gas_limit_is_accepted() {
        for zero in ["0x0", "0x", "0"] {
            let tx = normalize(&base().gas_limit(zero)).unwrap();
            assert_eq!(tx.gas_limit, U256::ZERO);
            assert!(tx.payload_fields()[3].is_empty());
        }
    }

    #[test]
    fn present_zero_gas_limit_still_wins_over_alias() {
        let tx = normalize(&base().gas_limit("0x0").gas(21_000)).unwrap();
        assert_eq!(tx.gas_limit, U256::ZERO);
    }

    #[test]
    fn negative_gas_alias_is_named() {
        let mut request = base().gas(-1);
        request.gas_limit = None;
        assert_eq!(
            normalize(&request),
            Err(KeyringError::NegativeNumericField { field: "gas" })
        );
    }

    #[test]
    fn gas_alias_is_accepted() {
        let mut request = base().gas(21_000);
        request.gas_limit = None;
        assert_eq!(normalize(&request).unwrap().gas_limit, U256::from(21_000));
    }

    #[test]
    fn gas_limit_wins_over_alias() {
        let tx = normalize(&base().gas(1)).unwrap();
        assert_eq!(tx.gas_limit, U256::from(0x4c4b40u64));
    }

    #[test]
    fn rejects_negative_fields() {
        for (request, expected) in [
            (base().nonce(-1), "nonce"),
            (base().gas_limit(-1), "gasLimit"),
            (base().gas_price("-0x1"), "gasPrice"),
            (base().value(-5), "value"),
            (base().sharding_flag(-1), "shardingFlag"),
        ] {
            assert_eq!(
                normalize(&request),
                Err(KeyringError::NegativeNumericField { field: expected })
            );
        }
    }

    #[test]
    fn sharding_flag_absent_equals_explicit_zero() {
        let absent = normalize(&base()).unwrap();
        let explicit = normalize(&base().sharding_flag("0x00")).unwrap();
        assert_eq!(absent.sharding_flag, U256::ZERO);
        assert_eq!(absent, explicit);
    }

    #[test]
    fn explicit_sharding_flag_is_kept() {
        let tx = normalize(&base().sharding_flag(1)).unwrap();
        assert_eq!(tx.sharding_flag, U256::from(1));
    }

    #[test]
    fn system_contract_is_forced_to_zero() {
        let tx = normalize(&base().system_contract("0x01")).unwrap();
        assert_eq!(tx.system_contract, U256::ZERO);
    }

    #[test]
    fn empty_addresses_mean_none() {
        for empty in ["", "0x", "  "] {
            let tx = normalize(&base().to(empty).via(empty)).unwrap();
            assert!(tx.to.is_none());
            assert!(tx.via.is_none());
        }
    }

    #[test]
    fn via_is_parsed_case_insensitively() {
        let tx = normalize(&base().via("0xABCDEFabcdefABCDEFabcdefABCDEFabcdefABCD")).unwrap();
        assert_eq!(
            crate::crypto::keys::format_address(&tx.via.unwrap()),
            "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"
        );
    }

    #[test]
    fn rejects_bad_address_and_data() {
        assert!(matches!(
            normalize(&base().to("0x1234")),
            Err(KeyringError::InvalidAddress(_))
        ));
        assert!(matches!(
            normalize(&base().data("0xnothex")),
            Err(KeyringError::InvalidData(_))
        ));
    }

    #[test]
    fn data_is_kept_verbatim() {
        assert!(normalize(&base().data("0x")).unwrap().data.is_empty());
        assert_eq!(
            normalize(&base().data("0x000102")).unwrap().data,
            Bytes::from(vec![0x00, 0x01, 0x02])
        );
    }

    #[test]
    fn absent_optionals_default_to_zero_and_empty() {
        let request = TransactionRequest::new().gas_limit(21_000).chain_id(99);
        let tx = normalize(&request).unwrap();
        assert_eq!(tx.nonce, U256::ZERO);
        assert_eq!(tx.gas_price, U256::ZERO);
        assert_eq!(tx.value, U256::ZERO);
        assert!(tx.to.is_none());
        assert!(tx.data.is_empty());
    }
}
