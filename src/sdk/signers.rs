//! Signer set resolution
//!
//! Maps the coins a transaction spends back to the accounts that own them.
//! The result is deduplicated by program hash and sorted ascending, so
//! every party building the same transaction assigns the same verification
//! slot to the same signer.

use crate::core::transaction::UtxoInput;
use crate::core::uint::Uint160;
use crate::sdk::error::BuildError;
use crate::wallet::{Account, Coin, WalletClient};
use std::collections::{HashMap, HashSet};

/// Distinct owners of `inputs`, in input order of first appearance
pub fn owner_hashes(
    inputs: &[UtxoInput],
    coins: &HashMap<UtxoInput, Coin>,
) -> Result<Vec<Uint160>, BuildError> {
    let mut seen = HashSet::new();
    let mut owners = Vec::new();

    for input in inputs {
        let coin = coins.get(input).ok_or(BuildError::UnknownInput(*input))?;
        let owner = coin.owner();
        if seen.insert(owner) {
            owners.push(owner);
        }
    }

    Ok(owners)
}

/// Accounts that must sign a transaction spending `inputs`, sorted by
/// program hash
pub fn resolve_signers<'w, W: WalletClient + ?Sized>(
    inputs: &[UtxoInput],
    wallet: &'w W,
) -> Result<Vec<&'w Account>, BuildError> {
    let owners = owner_hashes(inputs, wallet.coins())?;

    let mut signers = owners
        .iter()
        .map(|hash| {
            wallet
                .account_by_program_hash(hash)
                .ok_or(BuildError::UnknownSigner(*hash))
        })
        .collect::<Result<Vec<_>, _>>()?;

    signers.sort_by_key(|account| account.program_hash());
    Ok(signers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::Fixed64;
    use crate::core::transaction::TxOutput;
    use crate::core::uint::Uint256;
    use crate::wallet::Wallet;

    fn asset() -> Uint256 {
        Uint256::new([5; 32])
    }

    fn input(tag: u8) -> UtxoInput {
        UtxoInput::new(Uint256::new([tag; 32]), 0)
    }

    fn fund(wallet: &mut Wallet, tag: u8, owner: Uint160) {
        wallet
            .add_coin(
                input(tag),
                TxOutput::new(asset(), Fixed64::from_raw(100), owner),
            )
            .unwrap();
    }

    #[test]
    fn test_single_owner_deduplicated() {
        let mut wallet = Wallet::new();
        let owner = wallet.default_account().unwrap().program_hash();
        fund(&mut wallet, 1, owner);
        fund(&mut wallet, 2, owner);

        let signers = resolve_signers(&[input(1), input(2)], &wallet).unwrap();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].program_hash(), owner);
    }

    #[test]
    fn test_signers_sorted_regardless_of_input_order() {
        let mut wallet = Wallet::new();
        let hashes: Vec<Uint160> = (0..4).map(|_| wallet.create_account()).collect();
        for (i, hash) in hashes.iter().enumerate() {
            fund(&mut wallet, i as u8 + 1, *hash);
        }

        let forward = [input(1), input(2), input(3), input(4)];
        let backward = [input(4), input(3), input(2), input(1)];

        let a: Vec<Uint160> = resolve_signers(&forward, &wallet)
            .unwrap()
            .iter()
            .map(|s| s.program_hash())
            .collect();
        let b: Vec<Uint160> = resolve_signers(&backward, &wallet)
            .unwrap()
            .iter()
            .map(|s| s.program_hash())
            .collect();

        let mut expected = hashes.clone();
        expected.sort();
        assert_eq!(a, expected);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_owner_hashes_keep_first_appearance() {
        let mut wallet = Wallet::new();
        let x = wallet.create_account();
        let y = wallet.create_account();
        fund(&mut wallet, 1, y);
        fund(&mut wallet, 2, x);
        fund(&mut wallet, 3, y);

        let owners = owner_hashes(&[input(1), input(2), input(3)], wallet.coins()).unwrap();
        assert_eq!(owners, vec![y, x]);
    }

    #[test]
    fn test_input_outside_wallet_rejected() {
        let wallet = Wallet::new();
        let result = resolve_signers(&[input(1)], &wallet);
        assert!(matches!(result, Err(BuildError::UnknownInput(_))));
    }

    #[test]
    fn test_unknown_owner_rejected() {
        let mut wallet = Wallet::new();
        let stranger = Uint160::new([0x99; 20]);
        fund(&mut wallet, 1, stranger);

        let result = resolve_signers(&[input(1)], &wallet);
        assert!(matches!(result, Err(BuildError::UnknownSigner(h)) if h == stranger));
    }
}
