use cosmwasm_std::{attr, Addr, Attribute, Uint128};
use meta_vault_types::ObligationKey;
use serde::{Deserialize, Serialize};

/// Observable outcome of an allocation manager operation, for indexers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AllocationEvent {
    Allocated {
        target: Addr,
        assets: Uint128,
        shares: Uint128,
    },
    Withdrawn {
        target: Addr,
        assets: Uint128,
        receiver: Addr,
        key: ObligationKey,
        received: Uint128,
    },
    Redeemed {
        target: Addr,
        shares: Uint128,
        receiver: Addr,
        key: ObligationKey,
        received: Uint128,
    },
    Claimed {
        target: Addr,
        key: ObligationKey,
        assets: Uint128,
    },
    /// Key found delivered by someone else; nothing collected
    ClaimedExternally { target: Addr, key: ObligationKey },
    TargetPruned { target: Addr },
}

impl AllocationEvent {
    pub fn action(&self) -> &'static str {
        match self {
            AllocationEvent::Allocated { .. } => "allocate",
            AllocationEvent::Withdrawn { .. } => "withdraw_allocation",
            AllocationEvent::Redeemed { .. } => "redeem_allocation",
            AllocationEvent::Claimed { .. } => "claim_allocation",
            AllocationEvent::ClaimedExternally { .. } => "claim_allocation_external",
            AllocationEvent::TargetPruned { .. } => "prune_target",
        }
    }

    pub fn target(&self) -> &Addr {
        match self {
            AllocationEvent::Allocated { target, .. }
            | AllocationEvent::Withdrawn { target, .. }
            | AllocationEvent::Redeemed { target, .. }
            | AllocationEvent::Claimed { target, .. }
            | AllocationEvent::ClaimedExternally { target, .. }
            | AllocationEvent::TargetPruned { target } => target,
        }
    }

    /// Flatten into response attributes
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attrs = vec![attr("action", self.action()), attr("target", self.target().as_str())];
        match self {
            AllocationEvent::Allocated { assets, shares, .. } => {
                attrs.push(attr("assets", assets.to_string()));
                attrs.push(attr("shares", shares.to_string()));
            }
            AllocationEvent::Withdrawn {
                assets,
                receiver,
                key,
                received,
                ..
            } => {
                attrs.push(attr("assets", assets.to_string()));
                attrs.push(attr("receiver", receiver.as_str()));
                attrs.push(attr("key", key.to_string()));
                attrs.push(attr("received", received.to_string()));
            }
            AllocationEvent::Redeemed {
                shares,
                receiver,
                key,
                received,
                ..
            } => {
                attrs.push(attr("shares", shares.to_string()));
                attrs.push(attr("receiver", receiver.as_str()));
                attrs.push(attr("key", key.to_string()));
                attrs.push(attr("received", received.to_string()));
            }
            AllocationEvent::Claimed { key, assets, .. } => {
                attrs.push(attr("key", key.to_string()));
                attrs.push(attr("assets", assets.to_string()));
            }
            AllocationEvent::ClaimedExternally { key, .. } => {
                attrs.push(attr("key", key.to_string()));
            }
            AllocationEvent::TargetPruned { .. } => {}
        }
        attrs
    }
}
