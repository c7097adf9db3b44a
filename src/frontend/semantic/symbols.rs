use tracing::trace;

use crate::frontend::ast::Type;
use crate::frontend::error::FrontendError;
use crate::meta::{LocationMeta, Meta};
use crate::util::env::{Env, UniqueEnv};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
}

/// what a name is bound to, together with its declared type
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub t: Type,
}

impl Symbol {
    pub fn variable(t: Type) -> Self {
        Self { kind: SymbolKind::Variable, t }
    }

    pub fn function(ret: Type) -> Self {
        Self { kind: SymbolKind::Function, t: ret }
    }
}

/// stack of scopes, the last one is the innermost,
/// the first (global) scope lives as long as the table
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Env<Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_globals(Env::new())
    }

    /// table whose global scope starts with the given bindings
    pub fn with_globals(globals: Env<Symbol>) -> Self {
        Self { scopes: vec![globals] }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Env::new());
        trace!("entered scope, depth {}", self.depth());
    }

    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            trace!("left scope, depth {}", self.depth());
        }
    }

    /// number of scopes currently on the stack, including the global one
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// bind name in the innermost scope, fails if it is already bound there
    pub fn insert(&mut self, name: String, symbol: Meta<Symbol, LocationMeta>) -> Result<(), FrontendError<LocationMeta>> {
        trace!("binding {} as {:?}", name, symbol.item.kind);
        match self.scopes.last_mut() {
            Some(scope) => scope.insert_unique(name, symbol),
            None => Ok(()),
        }
    }

    /// innermost binding of the name
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn is_in_current_scope(&self, name: &str) -> bool {
        match self.scopes.last() {
            Some(scope) => scope.contains_key(name),
            None => false,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(symbol: Symbol, line: usize) -> Meta<Symbol, LocationMeta> {
        Meta::new(symbol, LocationMeta::from(line))
    }

    #[test]
    fn lookup_prefers_innermost_scope() {
        let mut table = SymbolTable::new();
        table.insert(String::from("x"), at(Symbol::variable(Type::Int), 1)).unwrap();
        table.enter_scope();
        table.insert(String::from("x"), at(Symbol::variable(Type::Float), 2)).unwrap();
        assert_eq!(table.lookup("x"), Some(&Symbol::variable(Type::Float)));
        table.exit_scope();
        assert_eq!(table.lookup("x"), Some(&Symbol::variable(Type::Int)));
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        table.insert(String::from("x"), at(Symbol::variable(Type::Int), 1)).unwrap();
        let err = table.insert(String::from("x"), at(Symbol::variable(Type::Char), 2)).unwrap_err();
        assert_eq!(err.get_meta().line, 2);
        assert_eq!(table.lookup("x"), Some(&Symbol::variable(Type::Int)));
    }

    #[test]
    fn globals_are_visible_in_nested_scopes() {
        let mut globals = Env::new();
        globals.insert(String::from("print"), Symbol::function(Type::Void));
        let mut table = SymbolTable::with_globals(globals);
        table.enter_scope();
        assert_eq!(table.lookup("print"), Some(&Symbol::function(Type::Void)));
        table.exit_scope();
        let err = table.insert(String::from("print"), at(Symbol::variable(Type::Int), 4)).unwrap_err();
        assert_eq!(err.get_meta().line, 4);
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.insert(String::from("g"), at(Symbol::variable(Type::Int), 1)).unwrap();
        table.enter_scope();
        assert_eq!(table.depth(), 2);
        assert!(!table.is_in_current_scope("g"));
        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.depth(), 1);
        assert!(table.is_in_current_scope("g"));
    }

    #[test]
    fn unknown_name_is_not_found() {
        let table = SymbolTable::default();
        assert!(table.lookup("nope").is_none());
    }
}
