use crate::core::ActivityCodeEntry;

use super::snapshot::{RegistryActivity, RegistrySnapshot};

/// How many secondary CNAEs are offered on the registration form.
pub const MAX_SECONDARY_ACTIVITIES: usize = 5;

/// Build the candidate activity list for a registration form from a registry lookup.
///
/// The primary CNAE comes first (when the registry has one), followed by at
/// most [`MAX_SECONDARY_ACTIVITIES`] secondary CNAEs in registry order. Extra
/// secondary CNAEs are dropped without error. Service codes start empty.
pub fn populate_from_lookup(snapshot: &RegistrySnapshot) -> Vec<ActivityCodeEntry> {
    snapshot
        .cnae_principal
        .iter()
        .chain(
            snapshot
                .cnaes_secundarios
                .iter()
                .take(MAX_SECONDARY_ACTIVITIES),
        )
        .map(to_entry)
        .collect()
}

fn to_entry(activity: &RegistryActivity) -> ActivityCodeEntry {
    ActivityCodeEntry::suggested(
        activity.codigo.clone().unwrap_or_default(),
        activity.descricao.clone().unwrap_or_default(),
    )
}
