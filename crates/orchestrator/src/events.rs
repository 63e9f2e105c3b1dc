use cosmwasm_std::{attr, Addr, Attribute, Uint128};
use meta_vault_allocation::AllocationEvent;
use meta_vault_types::ObligationKey;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultEvent {
    Deposit {
        caller: Addr,
        receiver: Addr,
        assets: Uint128,
        shares: Uint128,
    },
    Withdraw {
        owner: Addr,
        receiver: Addr,
        assets: Uint128,
        shares: Uint128,
        /// Paid out during the call
        paid: Uint128,
        /// Handle for the remainder, zero when fully paid
        claim: ObligationKey,
    },
    ClaimPaid {
        claim: ObligationKey,
        receiver: Addr,
        assets: Uint128,
    },
    ShutdownChanged { active: bool },
    Allocation(AllocationEvent),
}

impl VaultEvent {
    pub fn action(&self) -> &'static str {
        match self {
            VaultEvent::Deposit { .. } => "deposit",
            VaultEvent::Withdraw { .. } => "withdraw",
            VaultEvent::ClaimPaid { .. } => "claim",
            VaultEvent::ShutdownChanged { .. } => "set_shutdown",
            VaultEvent::Allocation(event) => event.action(),
        }
    }

    pub fn attributes(&self) -> Vec<Attribute> {
        match self {
            VaultEvent::Deposit {
                caller,
                receiver,
                assets,
                shares,
            } => vec![
                attr("action", self.action()),
                attr("caller", caller.as_str()),
                attr("receiver", receiver.as_str()),
                attr("assets", assets.to_string()),
                attr("shares", shares.to_string()),
            ],
            VaultEvent::Withdraw {
                owner,
                receiver,
                assets,
                shares,
                paid,
                claim,
            } => vec![
                attr("action", self.action()),
                attr("owner", owner.as_str()),
                attr("receiver", receiver.as_str()),
                attr("assets", assets.to_string()),
                attr("shares", shares.to_string()),
                attr("paid", paid.to_string()),
                attr("claim", claim.to_string()),
            ],
            VaultEvent::ClaimPaid {
                claim,
                receiver,
                assets,
            } => vec![
                attr("action", self.action()),
                attr("claim", claim.to_string()),
                attr("receiver", receiver.as_str()),
                attr("assets", assets.to_string()),
            ],
            VaultEvent::ShutdownChanged { active } => vec![
                attr("action", self.action()),
                attr("active", active.to_string()),
            ],
            VaultEvent::Allocation(event) => event.attributes(),
        }
    }
}

impl From<AllocationEvent> for VaultEvent {
    fn from(event: AllocationEvent) -> Self {
        VaultEvent::Allocation(event)
    }
}
