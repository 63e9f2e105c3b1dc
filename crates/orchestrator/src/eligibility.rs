use cosmwasm_std::Addr;
use indexmap::IndexSet;

/// Decides which targets the curator may allocate into
pub trait TargetEligibility {
    fn is_eligible(&self, target: &Addr) -> bool;
}

impl<F> TargetEligibility for F
where
    F: Fn(&Addr) -> bool,
{
    fn is_eligible(&self, target: &Addr) -> bool {
        self(target)
    }
}

/// Fixed allow-list of targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovedTargets {
    approved: IndexSet<Addr>,
}

impl ApprovedTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approve(&mut self, target: Addr) -> bool {
        self.approved.insert(target)
    }

    pub fn revoke(&mut self, target: &Addr) -> bool {
        self.approved.swap_remove(target)
    }

    pub fn len(&self) -> usize {
        self.approved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Addr> {
        self.approved.iter()
    }
}

impl FromIterator<Addr> for ApprovedTargets {
    fn from_iter<I: IntoIterator<Item = Addr>>(iter: I) -> Self {
        Self {
            approved: iter.into_iter().collect(),
        }
    }
}

impl TargetEligibility for ApprovedTargets {
    fn is_eligible(&self, target: &Addr) -> bool {
        self.approved.contains(target)
    }
}
