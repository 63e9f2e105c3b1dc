use cosmwasm_std::{Addr, Uint128};
use indexmap::IndexMap;
use meta_vault_adapter::{try_is_claimable, try_is_claimed};
use meta_vault_allocation::AllocationState;
use meta_vault_types::{ObligationKey, TargetHost};
use serde::{Deserialize, Serialize};

/// One target obligation backing a user claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPart {
    pub target: Addr,
    pub key: ObligationKey,
    pub amount: Uint128,
}

/// Assets owed to a user whose withdrawal could not settle immediately
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaim {
    pub owner: Addr,
    pub receiver: Addr,
    pub assets: Uint128,
    pub parts: Vec<ClaimPart>,
}

impl UserClaim {
    /// Parts whose key is still outstanding in the ledger
    pub fn outstanding_parts<'a>(
        &'a self,
        ledger: &'a AllocationState,
    ) -> impl Iterator<Item = &'a ClaimPart> + 'a {
        self.parts
            .iter()
            .filter(move |part| ledger.contains_key(&part.target, &part.key))
    }

    /// Amount already delivered to the vault for this claim.
    ///
    /// A part counts once its key left the ledger or the target reports it
    /// claimed, since a third party may claim before the next sweep.
    pub fn collected<H: TargetHost + ?Sized>(&self, ledger: &AllocationState, host: &H) -> Uint128 {
        self.parts
            .iter()
            .filter(|part| {
                !ledger.contains_key(&part.target, &part.key)
                    || try_is_claimed(host, &part.target, part.key)
            })
            .fold(Uint128::zero(), |acc, part| acc.saturating_add(part.amount))
    }

    /// Every part is resolved in the ledger
    pub fn is_settled(&self, ledger: &AllocationState) -> bool {
        self.outstanding_parts(ledger).next().is_none()
    }

    /// Every outstanding part can be collected by a sweep right now
    pub fn is_claimable<H: TargetHost + ?Sized>(&self, ledger: &AllocationState, host: &H) -> bool {
        self.outstanding_parts(ledger).all(|part| {
            try_is_claimable(host, &part.target, part.key)
                || try_is_claimed(host, &part.target, part.key)
        })
    }
}

/// Unpaid user claims keyed by vault-minted handles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    claims: IndexMap<ObligationKey, UserClaim>,
    nonce: u64,
}

impl UserClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh handle derived from the vault, the owner and a running nonce
    pub(crate) fn mint_key(&mut self, vault: &Addr, owner: &Addr) -> ObligationKey {
        loop {
            self.nonce += 1;
            let key = ObligationKey::derive(&[
                vault.as_bytes(),
                owner.as_bytes(),
                &self.nonce.to_be_bytes(),
            ]);
            if !key.is_zero() && !self.claims.contains_key(&key) {
                return key;
            }
        }
    }

    pub(crate) fn insert(&mut self, key: ObligationKey, claim: UserClaim) {
        self.claims.insert(key, claim);
    }

    pub(crate) fn remove(&mut self, key: &ObligationKey) -> Option<UserClaim> {
        self.claims.swap_remove(key)
    }

    pub fn get(&self, key: &ObligationKey) -> Option<&UserClaim> {
        self.claims.get(key)
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn keys_for(&self, owner: &Addr) -> Vec<ObligationKey> {
        self.claims
            .iter()
            .filter(|(_, claim)| &claim.owner == owner)
            .map(|(key, _)| *key)
            .collect()
    }

    /// Everything still owed to users
    pub fn owed(&self) -> Uint128 {
        self.claims
            .values()
            .fold(Uint128::zero(), |acc, claim| acc.saturating_add(claim.assets))
    }

    /// Idle the vault already holds on behalf of unpaid claims
    pub fn reserved<H: TargetHost + ?Sized>(&self, ledger: &AllocationState, host: &H) -> Uint128 {
        self.claims
            .values()
            .fold(Uint128::zero(), |acc, claim| acc.saturating_add(claim.collected(ledger, host)))
    }
}
