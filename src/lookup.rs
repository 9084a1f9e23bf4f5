//! Package identifier lookup
//!
//! The real lookup lives with the package database; the dispatcher only
//! needs `id_from_name`.

use std::collections::HashMap;

pub type PackageId = u64;

/// Name to identifier resolution
pub trait PackageLookup: Send + Sync {
    fn id_from_name(&self, name: &str) -> Option<PackageId>;
}

/// In-memory lookup built from the `[packages]` config table
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    ids: HashMap<String, PackageId>,
}

impl<S: Into<String>> FromIterator<(S, PackageId)> for MemoryLookup {
    fn from_iter<I: IntoIterator<Item = (S, PackageId)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|(name, id)| (name.into(), id)).collect(),
        }
    }
}

impl PackageLookup for MemoryLookup {
    fn id_from_name(&self, name: &str) -> Option<PackageId> {
        self.ids.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_lookup() {
        let lookup: MemoryLookup = [("foo", 7), ("bar", 9)].into_iter().collect();
        assert_eq!(lookup.id_from_name("foo"), Some(7));
        assert_eq!(lookup.id_from_name("bar"), Some(9));
        assert_eq!(lookup.id_from_name("baz"), None);
        assert_eq!(lookup.id_from_name(""), None);
    }
}
