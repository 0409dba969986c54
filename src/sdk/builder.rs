//! Transaction builder
//!
//! Builds and signs the three transaction kinds a wallet produces:
//!
//! - **Register** a new asset, signed by the default account
//! - **Issue** units of an asset, signed by the default account
//! - **Transfer** units of an asset, funded by coin selection and signed by
//!   every owner of a spent coin
//!
//! Each build is a straight pipeline. The first failing step returns its
//! error and nothing else is produced.

use crate::core::address::to_script_hash;
use crate::core::asset::Asset;
use crate::core::fee::FeeCalculator;
use crate::core::fixed::Fixed64;
use crate::core::transaction::{Transaction, TransactionType, TxAttribute, TxOutput};
use crate::core::uint::Uint256;
use crate::sdk::context::{build_context, sign_as, ContractContext};
use crate::sdk::error::BuildError;
use crate::sdk::nonce::{NonceSource, RandomNonce};
use crate::sdk::selection::{select_coins, Payment};
use crate::sdk::signers::resolve_signers;
use crate::sdk::signing::{ContractService, KeySigner, SignatureContracts, SigningService};
use crate::wallet::{Account, WalletClient};

/// A requested payment: destination address and decimal amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOut {
    pub address: String,
    pub value: String,
}

impl BatchOut {
    pub fn new(address: &str, value: &str) -> Self {
        Self {
            address: address.to_string(),
            value: value.to_string(),
        }
    }

    /// Decode into a payment that must cover `per_output_fee`. Checks run
    /// in order: amount, fee, address.
    pub fn decode(&self, per_output_fee: Fixed64) -> Result<Payment, BuildError> {
        let value = parse_amount(&self.value)?;
        if value <= per_output_fee {
            return Err(BuildError::FeeExceedsAmount {
                value,
                fee: per_output_fee,
            });
        }
        let program_hash =
            to_script_hash(&self.address).map_err(|source| BuildError::InvalidAddress {
                address: self.address.clone(),
                source,
            })?;
        Ok(Payment::new(program_hash, value))
    }
}

/// Parse a strictly positive decimal amount
pub fn parse_amount(value: &str) -> Result<Fixed64, BuildError> {
    let amount: Fixed64 = value
        .trim()
        .parse()
        .map_err(|e| BuildError::invalid_amount(value, e))?;
    if !amount.is_positive() {
        return Err(BuildError::InvalidAmount {
            value: value.to_string(),
            reason: "amount must be positive".to_string(),
        });
    }
    Ok(amount)
}

fn default_account<W: WalletClient + ?Sized>(wallet: &W) -> Result<&Account, BuildError> {
    wallet
        .default_account()
        .map_err(|_| BuildError::NoDefaultAccount)
}

/// Builds signed transactions against a wallet
pub struct TransactionBuilder {
    fees: FeeCalculator,
    signer: Box<dyn SigningService>,
    contracts: Box<dyn ContractService>,
    nonces: Box<dyn NonceSource>,
}

impl TransactionBuilder {
    /// Builder with the given fees, key signing, standard contracts and
    /// random nonces
    pub fn new(fees: FeeCalculator) -> Self {
        Self {
            fees,
            signer: Box::new(KeySigner),
            contracts: Box::new(SignatureContracts),
            nonces: Box::new(RandomNonce::new()),
        }
    }

    pub fn with_signer(mut self, signer: impl SigningService + 'static) -> Self {
        self.signer = Box::new(signer);
        self
    }

    pub fn with_contracts(mut self, contracts: impl ContractService + 'static) -> Self {
        self.contracts = Box::new(contracts);
        self
    }

    pub fn with_nonce_source(mut self, nonces: impl NonceSource + 'static) -> Self {
        self.nonces = Box::new(nonces);
        self
    }

    pub fn fees(&self) -> &FeeCalculator {
        &self.fees
    }

    // =========================================================================
    // Register
    // =========================================================================

    /// Register a new token asset with `supply` total units. The default
    /// account becomes both issuer and controller.
    pub fn make_register_transaction<W: WalletClient + ?Sized>(
        &mut self,
        wallet: &W,
        name: &str,
        supply: &str,
    ) -> Result<Transaction, BuildError> {
        let issuer = default_account(wallet)?;
        let contract = self
            .contracts
            .create_signature_contract(&issuer.public_key_bytes())?;
        let amount = parse_amount(supply)?;

        let mut tx = Transaction::register_asset(
            Asset::token(name),
            amount,
            issuer.key_pair().public_key_hex(),
            contract.program_hash,
        );
        self.attach_nonce(&mut tx);
        self.sign_single(&mut tx, issuer)?;

        log::info!("Built register transaction {} for asset '{}'", tx.hash(), name);
        Ok(tx)
    }

    // =========================================================================
    // Issue
    // =========================================================================

    /// Issue `asset_id` into the given outputs, signed by the default account
    pub fn make_issue_transaction<W: WalletClient + ?Sized>(
        &mut self,
        wallet: &W,
        asset_id: &Uint256,
        outputs: Vec<TxOutput>,
    ) -> Result<Transaction, BuildError> {
        let issuer = default_account(wallet)?;
        if outputs.is_empty() {
            return Err(BuildError::NoOutputsSpecified);
        }
        for output in &outputs {
            if &output.asset_id != asset_id {
                return Err(BuildError::AssetMismatch {
                    expected: *asset_id,
                    found: output.asset_id,
                });
            }
            if !output.value.is_positive() {
                return Err(BuildError::InvalidAmount {
                    value: output.value.to_string(),
                    reason: "amount must be positive".to_string(),
                });
            }
        }

        let mut tx = Transaction::issue_asset(outputs);
        self.attach_nonce(&mut tx);
        self.sign_single(&mut tx, issuer)?;

        log::info!(
            "Built issue transaction {} with {} output(s)",
            tx.hash(),
            tx.outputs.len()
        );
        Ok(tx)
    }

    /// Issue `value` units of `asset_id` to one address
    pub fn make_issue_to<W: WalletClient + ?Sized>(
        &mut self,
        wallet: &W,
        asset_id: &Uint256,
        address: &str,
        value: &str,
    ) -> Result<Transaction, BuildError> {
        let payment = BatchOut::new(address, value).decode(Fixed64::ZERO)?;
        let output = TxOutput::new(*asset_id, payment.value, payment.program_hash);
        self.make_issue_transaction(wallet, asset_id, vec![output])
    }

    // =========================================================================
    // Transfer
    // =========================================================================

    /// Transfer `asset_id` to each requested payment. The per-output fee is
    /// deducted from every payment and change returns to the default account.
    pub fn make_transfer_transaction<W: WalletClient + ?Sized>(
        &mut self,
        wallet: &W,
        asset_id: &Uint256,
        batch: &[BatchOut],
    ) -> Result<Transaction, BuildError> {
        if batch.is_empty() {
            return Err(BuildError::NoOutputsSpecified);
        }
        let change_to = default_account(wallet)?.program_hash();
        let fee = self
            .fees
            .per_output_fee(TransactionType::TransferAsset, batch.len())?;
        let payments = batch
            .iter()
            .map(|out| out.decode(fee))
            .collect::<Result<Vec<_>, _>>()?;

        let selection = select_coins(wallet.coins(), asset_id, &payments, fee, change_to)?;
        let total_input = selection.total_input;
        let mut tx = Transaction::transfer_asset(selection.inputs, selection.outputs);
        self.attach_nonce(&mut tx);

        let signers = resolve_signers(&tx.inputs, wallet)?;
        let context = build_context(
            tx.signable_data(),
            &signers,
            self.signer.as_ref(),
            self.contracts.as_ref(),
        )?;
        tx.programs = context.programs()?;

        log::info!(
            "Built transfer transaction {}: {} input(s) worth {}, {} output(s), {} signer(s)",
            tx.hash(),
            tx.inputs.len(),
            total_input,
            tx.outputs.len(),
            tx.programs.len()
        );
        Ok(tx)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn attach_nonce(&mut self, tx: &mut Transaction) {
        let nonce = self.nonces.next_nonce();
        tx.attributes.push(TxAttribute::nonce(nonce));
    }

    /// One-slot context filled by `account`
    fn sign_single(&self, tx: &mut Transaction, account: &Account) -> Result<(), BuildError> {
        let contract = self
            .contracts
            .create_signature_contract(&account.public_key_bytes())?;
        let mut context = ContractContext::with_length(tx.signable_data(), 1);
        let signature = sign_as(self.signer.as_ref(), context.data(), account)?;
        context.add_contract(&contract, &signature)?;
        tx.programs = context.programs()?;
        Ok(())
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new(FeeCalculator::free())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::transaction::{Payload, UtxoInput};
    use crate::core::uint::Uint160;
    use crate::sdk::nonce::FixedNonce;
    use crate::sdk::signing::SigningError;
    use crate::wallet::Wallet;

    struct FailingSigner;

    impl SigningService for FailingSigner {
        fn sign(&self, _data: &[u8], _account: &Account) -> Result<Vec<u8>, SigningError> {
            Err(SigningError::Unavailable("offline".to_string()))
        }
    }

    fn asset() -> Uint256 {
        Uint256::new([0x42; 32])
    }

    fn fx(s: &str) -> Fixed64 {
        s.parse().unwrap()
    }

    fn input(tag: u8) -> UtxoInput {
        UtxoInput::new(Uint256::new([tag; 32]), 0)
    }

    fn dest(tag: u8) -> (Uint160, String) {
        let hash = Uint160::new([tag; 20]);
        (hash, hash.to_address())
    }

    fn transfer_fee(value: f64) -> TransactionBuilder {
        let mut config = Config::default();
        config
            .transaction_fee
            .insert("TransferAsset".to_string(), value);
        TransactionBuilder::new(FeeCalculator::new(config)).with_nonce_source(FixedNonce(7))
    }

    /// Wallet holding coins B = 5 and A = 100 under the default account
    fn funded_wallet() -> Wallet {
        let mut wallet = Wallet::new();
        let owner = wallet.default_account().unwrap().program_hash();
        wallet
            .add_coin(input(0xb), TxOutput::new(asset(), fx("5"), owner))
            .unwrap();
        wallet
            .add_coin(input(0xa), TxOutput::new(asset(), fx("100"), owner))
            .unwrap();
        wallet
    }

    #[test]
    fn test_transfer_single_payment_with_change() {
        let wallet = funded_wallet();
        let owner = wallet.default_account().unwrap().program_hash();
        let (dest_hash, dest_addr) = dest(1);
        let mut builder = transfer_fee(1.0);

        let tx = builder
            .make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&dest_addr, "50")])
            .unwrap();

        assert_eq!(tx.tx_type, TransactionType::TransferAsset);
        assert_eq!(tx.inputs, vec![input(0xb), input(0xa)]);
        assert_eq!(
            tx.outputs,
            vec![
                TxOutput::new(asset(), fx("49"), dest_hash),
                TxOutput::new(asset(), fx("56"), owner),
            ]
        );
        assert_eq!(tx.programs.len(), 1);
        assert_eq!(tx.program_hashes(), vec![owner]);
        assert_eq!(tx.attributes, vec![TxAttribute::nonce(7)]);
        assert!(tx.verify_signatures().unwrap());
    }

    #[test]
    fn test_transfer_two_payments() {
        let wallet = funded_wallet();
        let owner = wallet.default_account().unwrap().program_hash();
        let (d1, a1) = dest(1);
        let (d2, a2) = dest(2);
        let mut builder = transfer_fee(2.0);

        let tx = builder
            .make_transfer_transaction(
                &wallet,
                &asset(),
                &[BatchOut::new(&a1, "30"), BatchOut::new(&a2, "20")],
            )
            .unwrap();

        assert_eq!(
            tx.outputs,
            vec![
                TxOutput::new(asset(), fx("29"), d1),
                TxOutput::new(asset(), fx("19"), d2),
                TxOutput::new(asset(), fx("57"), owner),
            ]
        );
        // 29 + 19 + 57 + 2 fees == 105
        let total = tx.total_output(&asset()).unwrap();
        assert_eq!(total.checked_add(fx("2")).unwrap(), fx("105"));
    }

    #[test]
    fn test_multi_owner_transfer_slots_sorted() {
        let mut wallet = Wallet::new();
        let owners: Vec<Uint160> = (0..3).map(|_| wallet.create_account()).collect();
        for (i, owner) in owners.iter().enumerate() {
            wallet
                .add_coin(input(i as u8 + 1), TxOutput::new(asset(), fx("10"), *owner))
                .unwrap();
        }
        let (_, addr) = dest(9);
        let mut builder = TransactionBuilder::default();

        let tx = builder
            .make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "25")])
            .unwrap();

        assert_eq!(tx.inputs.len(), 3);
        let mut expected = owners.clone();
        expected.sort();
        assert_eq!(tx.program_hashes(), expected);
        assert!(tx.verify_signatures().unwrap());
        // Change of 5 goes to the default account, last.
        let change = tx.outputs.last().unwrap();
        assert_eq!(change.value, fx("5"));
        assert_eq!(
            change.program_hash,
            wallet.default_account().unwrap().program_hash()
        );
    }

    #[test]
    fn test_transfer_failures_produce_nothing() {
        let wallet = funded_wallet();
        let (_, addr) = dest(1);
        let mut builder = transfer_fee(1.0);

        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[]),
            Err(BuildError::NoOutputsSpecified)
        ));
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "1")]),
            Err(BuildError::FeeExceedsAmount { .. })
        ));
        match builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "200")]) {
            Err(BuildError::InsufficientFunds { missing }) => assert_eq!(missing, fx("95")),
            other => panic!("expected InsufficientFunds, got {:?}", other),
        }
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new("nope", "10")]),
            Err(BuildError::InvalidAddress { .. })
        ));
        for bad in ["abc", "0", "-3", "1.123456789"] {
            assert!(matches!(
                builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, bad)]),
                Err(BuildError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_payments_validated_in_order() {
        let wallet = funded_wallet();
        let (_, addr) = dest(1);
        let mut builder = transfer_fee(2.0);

        // The first payment fails the fee check before the second payment's
        // address is looked at.
        let batch = [BatchOut::new(&addr, "1"), BatchOut::new("nope", "10")];
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &batch),
            Err(BuildError::FeeExceedsAmount { .. })
        ));

        // Within one payment the fee check comes before the address.
        let mut builder = transfer_fee(1.0);
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new("nope", "0.5")]),
            Err(BuildError::FeeExceedsAmount { .. })
        ));
    }

    #[test]
    fn test_amount_checked_before_address() {
        let wallet = funded_wallet();
        let mut builder = TransactionBuilder::default();
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new("nope", "x")]),
            Err(BuildError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_no_default_account() {
        let wallet = Wallet::empty();
        let (_, addr) = dest(1);
        let mut builder = TransactionBuilder::default();

        assert!(matches!(
            builder.make_register_transaction(&wallet, "Gold", "1000"),
            Err(BuildError::NoDefaultAccount)
        ));
        assert!(matches!(
            builder.make_issue_to(&wallet, &asset(), &addr, "1"),
            Err(BuildError::NoDefaultAccount)
        ));
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "1")]),
            Err(BuildError::NoDefaultAccount)
        ));
    }

    #[test]
    fn test_size_sentinel_without_rate_rejected() {
        let wallet = funded_wallet();
        let (_, addr) = dest(1);
        let mut builder = transfer_fee(-1.0);
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "10")]),
            Err(BuildError::InvalidFeeConfig(_))
        ));
    }

    #[test]
    fn test_size_derived_fee() {
        let wallet = funded_wallet();
        let owner = wallet.default_account().unwrap().program_hash();
        let (dest_hash, addr) = dest(1);
        let mut config = Config::default();
        config.transaction_fee.insert("Transfer".to_string(), -1.0);
        config.fee_rate_per_byte = Some("0.001".to_string());
        let mut builder = TransactionBuilder::new(FeeCalculator::new(config));

        let tx = builder
            .make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "10")])
            .unwrap();

        // 64 + 60 + 34 + 104 = 262 bytes at 0.001
        assert_eq!(tx.outputs[0], TxOutput::new(asset(), fx("9.738"), dest_hash));
        assert_eq!(tx.outputs[1], TxOutput::new(asset(), fx("95"), owner));
    }

    #[test]
    fn test_register_transaction() {
        let wallet = Wallet::new();
        let account = wallet.default_account().unwrap();
        let mut builder = TransactionBuilder::default().with_nonce_source(FixedNonce(99));

        let tx = builder
            .make_register_transaction(&wallet, "Gold", "21000000")
            .unwrap();

        match &tx.payload {
            Payload::RegisterAsset {
                asset,
                amount,
                issuer,
                controller,
            } => {
                assert_eq!(asset, &Asset::token("Gold"));
                assert_eq!(*amount, fx("21000000"));
                assert_eq!(issuer, &account.key_pair().public_key_hex());
                assert_eq!(*controller, account.program_hash());
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(tx.inputs.is_empty());
        assert!(tx.outputs.is_empty());
        assert_eq!(tx.attributes, vec![TxAttribute::nonce(99)]);
        assert_eq!(tx.program_hashes(), vec![account.program_hash()]);
        assert!(tx.verify_signatures().unwrap());
    }

    #[test]
    fn test_register_rejects_bad_supply() {
        let wallet = Wallet::new();
        let mut builder = TransactionBuilder::default();
        for bad in ["", "zero", "0", "-1"] {
            assert!(matches!(
                builder.make_register_transaction(&wallet, "Gold", bad),
                Err(BuildError::InvalidAmount { .. })
            ));
        }
    }

    #[test]
    fn test_fixed_nonce_gives_stable_hash() {
        let wallet = Wallet::new();
        let mut builder = TransactionBuilder::default().with_nonce_source(FixedNonce(5));
        let a = builder.make_register_transaction(&wallet, "Gold", "10").unwrap();
        let b = builder.make_register_transaction(&wallet, "Gold", "10").unwrap();
        assert_eq!(a.hash(), b.hash());

        let mut random = TransactionBuilder::default();
        let c = random.make_register_transaction(&wallet, "Gold", "10").unwrap();
        let d = random.make_register_transaction(&wallet, "Gold", "10").unwrap();
        assert_ne!(c.hash(), d.hash());
    }

    #[test]
    fn test_issue_transaction() {
        let wallet = Wallet::new();
        let admin = wallet.default_account().unwrap().program_hash();
        let (dest_hash, addr) = dest(3);
        let mut builder = TransactionBuilder::default();

        let tx = builder.make_issue_to(&wallet, &asset(), &addr, "12.5").unwrap();

        assert_eq!(tx.tx_type, TransactionType::IssueAsset);
        assert_eq!(tx.outputs, vec![TxOutput::new(asset(), fx("12.5"), dest_hash)]);
        assert_eq!(tx.program_hashes(), vec![admin]);
        assert!(tx.verify_signatures().unwrap());
    }

    #[test]
    fn test_issue_validates_outputs() {
        let wallet = Wallet::new();
        let mut builder = TransactionBuilder::default();
        let other = Uint256::new([1; 32]);

        assert!(matches!(
            builder.make_issue_transaction(&wallet, &asset(), Vec::new()),
            Err(BuildError::NoOutputsSpecified)
        ));
        assert!(matches!(
            builder.make_issue_transaction(
                &wallet,
                &asset(),
                vec![TxOutput::new(other, fx("1"), Uint160::zero())]
            ),
            Err(BuildError::AssetMismatch { .. })
        ));
        assert!(matches!(
            builder.make_issue_transaction(
                &wallet,
                &asset(),
                vec![TxOutput::new(asset(), Fixed64::ZERO, Uint160::zero())]
            ),
            Err(BuildError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_signing_failure_aborts_build() {
        let wallet = funded_wallet();
        let (_, addr) = dest(1);
        let mut builder = TransactionBuilder::default().with_signer(FailingSigner);

        assert!(matches!(
            builder.make_register_transaction(&wallet, "Gold", "1"),
            Err(BuildError::SigningFailure { .. })
        ));
        assert!(matches!(
            builder.make_transfer_transaction(&wallet, &asset(), &[BatchOut::new(&addr, "10")]),
            Err(BuildError::SigningFailure { .. })
        ));
    }
}
