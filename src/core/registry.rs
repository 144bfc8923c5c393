use std::collections::HashMap;

use crate::core::package::PackageRecord;
use crate::error::{DebgraphError, Result};

#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Reservation {
    name: String,
}

impl Reservation {
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a PackageRecord),
    Vacant(Reservation),
}

#[derive(Debug, Default)]
pub struct PackageRegistry {
    records: HashMap<String, PackageRecord>,
    order: Vec<String>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.records.get(name)
    }

    pub fn lookup_or_reserve(&self, name: &str) -> Lookup<'_> {
        match self.records.get(name) {
            Some(record) => Lookup::Found(record),
            None => Lookup::Vacant(Reservation {
                name: name.to_string(),
            }),
        }
    }

    pub fn register(
        &mut self,
        reservation: Reservation,
        record: PackageRecord,
    ) -> Result<&PackageRecord> {
        if record.name() != reservation.name || self.records.contains_key(&reservation.name) {
            return Err(DebgraphError::RegistryConflict(reservation.name));
        }
        self.order.push(reservation.name.clone());
        let stored: &PackageRecord = self.records.entry(reservation.name).or_insert(record);
        Ok(stored)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
        self.order.iter().filter_map(|name| self.records.get(name))
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use crate::core::depends::DependencyGroups;
    use crate::core::package::PackageRecord;
    use crate::core::registry::{Lookup, PackageRegistry};
    use crate::error::DebgraphError;
    use crate::query::PackageFacts;

    fn record(name: &str) -> PackageRecord {
        PackageRecord::classify(name, &PackageFacts::default(), DependencyGroups::default())
    }

    #[test]
    fn reserve_then_register_then_find() {
        let mut registry = PackageRegistry::new();
        let reservation = match registry.lookup_or_reserve("zlib1g") {
            Lookup::Vacant(reservation) => reservation,
            Lookup::Found(_) => panic!("registry starts empty"),
        };
        assert_eq!(reservation.name(), "zlib1g");
        registry
            .register(reservation, record("zlib1g"))
            .expect("register zlib1g");

        assert!(registry.contains("zlib1g"));
        assert_eq!(registry.len(), 1);
        match registry.lookup_or_reserve("zlib1g") {
            Lookup::Found(found) => assert_eq!(found.name(), "zlib1g"),
            Lookup::Vacant(_) => panic!("zlib1g was registered"),
        }
    }

    #[test]
    fn second_reservation_for_same_name_is_rejected() {
        let mut registry = PackageRegistry::new();
        let first = match registry.lookup_or_reserve("a") {
            Lookup::Vacant(reservation) => reservation,
            Lookup::Found(_) => panic!("empty"),
        };
        let second = match registry.lookup_or_reserve("a") {
            Lookup::Vacant(reservation) => reservation,
            Lookup::Found(_) => panic!("still empty"),
        };
        registry.register(first, record("a")).expect("first wins");
        let err = registry
            .register(second, record("a"))
            .expect_err("duplicate insert");
        assert!(matches!(err, DebgraphError::RegistryConflict(name) if name == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn record_must_match_its_reservation() {
        let mut registry = PackageRegistry::new();
        let reservation = match registry.lookup_or_reserve("a") {
            Lookup::Vacant(reservation) => reservation,
            Lookup::Found(_) => panic!("empty"),
        };
        assert!(registry.register(reservation, record("b")).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn iterates_in_discovery_order() {
        let mut registry = PackageRegistry::new();
        for name in ["c", "a", "b"] {
            let Lookup::Vacant(reservation) = registry.lookup_or_reserve(name) else {
                continue;
            };
            registry.register(reservation, record(name)).expect("register");
        }
        let names: Vec<&str> = registry.iter().map(PackageRecord::name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(registry.names(), ["c", "a", "b"]);
    }
}
