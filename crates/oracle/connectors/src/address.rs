//! Source-ledger account id → destination EVM address

use crate::MirrorNodeClient;
use alloy_primitives::Address;
use oracle_codec::parse_address;
use oracle_consensus::HttpClient;
use oracle_types::OracleError;
use std::collections::BTreeMap;

/// Long-zero alias of a `shard.realm.num` account id: 4-byte shard,
/// 8-byte realm, 8-byte num, all big-endian.
pub fn long_zero_alias(account: &str) -> Result<Address, OracleError> {
    let invalid = || OracleError::Validation(format!("invalid account id '{account}'"));

    let mut parts = account.trim().split('.');
    let (Some(shard), Some(realm), Some(num), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let shard: u32 = shard.parse().map_err(|_| invalid())?;
    let realm: u64 = realm.parse().map_err(|_| invalid())?;
    let num: u64 = num.parse().map_err(|_| invalid())?;

    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&shard.to_be_bytes());
    bytes[4..12].copy_from_slice(&realm.to_be_bytes());
    bytes[12..].copy_from_slice(&num.to_be_bytes());
    Ok(Address::from(bytes))
}

/// Resolves accounts via the static address book, then the mirror node,
/// then the long-zero alias.
#[derive(Debug, Clone)]
pub struct AddressResolver {
    book: BTreeMap<String, Address>,
    mirror: MirrorNodeClient,
}

impl AddressResolver {
    pub fn new(
        book: &BTreeMap<String, String>,
        mirror: MirrorNodeClient,
    ) -> Result<Self, OracleError> {
        let book = book
            .iter()
            .map(|(account, address)| {
                parse_address(address)
                    .map(|a| (account.clone(), a))
                    .map_err(|e| OracleError::Config(format!("address_book.{account}: {e}")))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { book, mirror })
    }

    pub async fn resolve(
        &self,
        http: &dyn HttpClient,
        account: &str,
    ) -> Result<Address, OracleError> {
        if let Some(address) = self.book.get(account) {
            return Ok(*address);
        }
        match self.mirror.account_evm_address(http, account).await? {
            Some(address) => Ok(address),
            None => long_zero_alias(account),
        }
    }
}
