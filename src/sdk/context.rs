//! Multi-signature verification context
//!
//! A context holds one verification slot per signer. Slot `i` receives the
//! `i`-th signer's script and signature; programs can only be taken out
//! once every slot is filled.

use crate::core::contract::{self, Contract};
use crate::core::transaction::Program;
use crate::sdk::error::BuildError;
use crate::sdk::signing::{ContractService, SigningService};
use crate::wallet::Account;

/// Verification slots for a transaction's signable payload
#[derive(Debug, Clone)]
pub struct ContractContext {
    data: Vec<u8>,
    codes: Vec<Option<Vec<u8>>>,
    parameters: Vec<Option<Vec<u8>>>,
}

impl ContractContext {
    /// Context with `len` empty slots over `data`
    pub fn with_length(data: Vec<u8>, len: usize) -> Self {
        Self {
            data,
            codes: vec![None; len],
            parameters: vec![None; len],
        }
    }

    /// The payload every slot signs
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Fill slot `index` with `contract` and its signature
    pub fn add(
        &mut self,
        contract: &Contract,
        index: usize,
        signature: &[u8],
    ) -> Result<(), BuildError> {
        let len = self.len();
        if index >= len {
            return Err(BuildError::SlotOutOfRange { index, len });
        }
        let parameter = contract::signature_parameter(signature)?;
        self.codes[index] = Some(contract.code.clone());
        self.parameters[index] = Some(parameter);
        Ok(())
    }

    /// Single-signer path: reuse the slot already holding this contract's
    /// code, otherwise take the first empty slot
    pub fn add_contract(&mut self, contract: &Contract, signature: &[u8]) -> Result<(), BuildError> {
        let index = self
            .codes
            .iter()
            .position(|code| code.as_deref() == Some(contract.code.as_slice()))
            .or_else(|| self.codes.iter().position(Option::is_none))
            .ok_or(BuildError::SlotOutOfRange {
                index: self.len(),
                len: self.len(),
            })?;
        self.add(contract, index, signature)
    }

    /// Whether every slot has code and a signature
    pub fn is_completed(&self) -> bool {
        self.codes.iter().all(Option::is_some) && self.parameters.iter().all(Option::is_some)
    }

    /// Programs in slot order. Fails if any slot is still empty.
    pub fn programs(&self) -> Result<Vec<Program>, BuildError> {
        let len = self.len();
        self.codes
            .iter()
            .zip(&self.parameters)
            .enumerate()
            .map(|(index, (code, parameter))| match (code, parameter) {
                (Some(code), Some(parameter)) => Ok(Program {
                    code: code.clone(),
                    parameter: parameter.clone(),
                }),
                _ => Err(BuildError::IncompleteContext { index, len }),
            })
            .collect()
    }
}

/// Signature by `account` over `data`. A collaborator that fails, or hands
/// back something that is not a compact signature, is a signing failure.
pub(crate) fn sign_as<S>(signing: &S, data: &[u8], account: &Account) -> Result<Vec<u8>, BuildError>
where
    S: SigningService + ?Sized,
{
    let failure = |reason: String| BuildError::SigningFailure {
        signer: account.program_hash(),
        reason,
    };
    let signature = signing
        .sign(data, account)
        .map_err(|e| failure(e.to_string()))?;
    contract::signature_parameter(&signature).map_err(|e| failure(e.to_string()))?;
    Ok(signature)
}

/// Sign `data` with every signer, in order, filling one slot per signer
pub fn build_context<S, C>(
    data: Vec<u8>,
    signers: &[&Account],
    signing: &S,
    contracts: &C,
) -> Result<ContractContext, BuildError>
where
    S: SigningService + ?Sized,
    C: ContractService + ?Sized,
{
    let mut context = ContractContext::with_length(data, signers.len());

    for (index, account) in signers.iter().enumerate() {
        let contract = contracts.create_signature_contract(&account.public_key_bytes())?;
        let signature = sign_as(signing, context.data(), account)?;
        context.add(&contract, index, &signature)?;
        log::debug!("Filled verification slot {} for {}", index, account.program_hash());
    }

    Ok(context)
}
