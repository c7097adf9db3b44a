use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::frontend::error::{FrontendError, FrontendErrorKind};
use crate::meta::Meta;

/// alias, we use String as key everywhere in the project
pub type Env<T> = HashMap<String, T>;

pub trait UniqueEnv<ItemT, LocationT> {
    /// associates k with v, making sure k is not bound yet (the first binding is kept)
    fn insert_unique(&mut self, k: String, v: Meta<ItemT, LocationT>) -> Result<(), FrontendError<LocationT>>;
}

impl<ItemT, LocationT: Clone> UniqueEnv<ItemT, LocationT> for Env<ItemT> {
    /// insert only items, location is used for reporting the duplicate
    fn insert_unique(&mut self, k: String, v: Meta<ItemT, LocationT>) -> Result<(), FrontendError<LocationT>> {
        match self.entry(k) {
            Entry::Occupied(entry) => {
                let kind = FrontendErrorKind::EnvError {
                    message: format!("Variable '{}' already declared in this scope", entry.key())
                };
                Err(FrontendError::new(kind, v.get_meta().clone()))
            }
            Entry::Vacant(entry) => {
                entry.insert(v.item);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::meta::LocationMeta;

    use super::*;

    #[test]
    fn duplicate_keeps_first_binding() {
        let mut env: Env<i32> = Env::new();
        assert!(env.insert_unique(String::from("x"), Meta::new(1, LocationMeta::from(1))).is_ok());
        let err = env.insert_unique(String::from("x"), Meta::new(2, LocationMeta::from(3)))
            .unwrap_err();
        assert_eq!(err.to_string(), "Line 3: Variable 'x' already declared in this scope");
        assert_eq!(env.get("x"), Some(&1));
    }
}
