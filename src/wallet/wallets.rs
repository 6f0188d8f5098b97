use crate::error::{BlockchainError, Result};
use crate::wallet::Wallet;
use std::collections::HashMap;

/// In-memory wallet collection keyed by address.
///
/// Keys live only for the process lifetime; there is no key persistence or
/// encryption here, the ledger core only needs a signer per address.
#[derive(Default)]
pub struct Wallets {
    wallets: HashMap<String, Wallet>,
}

impl Wallets {
    pub fn new() -> Wallets {
        Wallets {
            wallets: HashMap::new(),
        }
    }

    pub fn create_wallet(&mut self) -> Result<String> {
        let wallet = Wallet::new()?;
        let address = wallet.get_address();
        self.wallets.insert(address.clone(), wallet);
        Ok(address)
    }

    pub fn get_wallet(&self, address: &str) -> Result<&Wallet> {
        self.wallets
            .get(address)
            .ok_or_else(|| BlockchainError::InvalidAddress(format!("No wallet for {address}")))
    }

    pub fn get_addresses(&self) -> Vec<String> {
        self.wallets.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut wallets = Wallets::new();
        let address = wallets.create_wallet().unwrap();

        let wallet = wallets.get_wallet(&address).unwrap();
        assert_eq!(wallet.get_address(), address);
        assert_eq!(wallets.get_addresses(), vec![address]);
    }

    #[test]
    fn test_unknown_address_is_an_error() {
        let wallets = Wallets::new();
        assert!(wallets.get_wallet("deadbeef").is_err());
    }
}
