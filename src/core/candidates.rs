use crate::domain::model::{CandidateSet, SystemIdentity};
use crate::domain::ports::ProviderVerdicts;

/// Keeps the candidates whose provider got a `true` verdict, in their original
/// order. Providers missing from `verdicts` are dropped.
pub fn retain_permitted(candidates: CandidateSet, verdicts: &ProviderVerdicts) -> CandidateSet {
    candidates
        .into_iter()
        .filter(|candidate| verdicts.get(&candidate.provider).copied().unwrap_or(false))
        .collect()
}

/// Drops every candidate offered by `provider`.
pub fn without_provider(candidates: CandidateSet, provider: &SystemIdentity) -> CandidateSet {
    candidates
        .into_iter()
        .filter(|candidate| &candidate.provider != provider)
        .collect()
}

/// Distinct providers in first-seen order.
pub fn providers_of(candidates: &CandidateSet) -> Vec<SystemIdentity> {
    let mut providers: Vec<SystemIdentity> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !providers.contains(&candidate.provider) {
            providers.push(candidate.provider.clone());
        }
    }
    providers
}
