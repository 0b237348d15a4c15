use std::collections::HashMap;

/// Where a resolved name lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    /// Slot in the VM's globals store.
    Global,
    /// Slot above the current frame's base pointer.
    Local,
    /// Index into the built-in function registry.
    Builtin,
    /// Index into the current closure's captured values.
    Free,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub scope: SymbolScope,
    pub index: usize,
}

/// One scope's name bindings, chained to the enclosing scope.
///
/// The compiler owns exactly one table at a time; entering a function scope
/// wraps the current table as `outer`, leaving unwraps it.
#[derive(Debug, Default)]
pub struct SymbolTable {
    outer: Option<Box<SymbolTable>>,

    store: HashMap<String, Symbol>,
    /// Original symbols (as seen in the enclosing scope) captured by this
    /// scope, in first-use order.
    pub free_symbols: Vec<Symbol>,
    /// Number of Global/Local definitions. Builtin and Free registrations do
    /// not count.
    pub num_definitions: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Creates a table whose misses fall through to `outer`.
    pub fn enclosed(outer: SymbolTable) -> Self {
        SymbolTable {
            outer: Some(Box::new(outer)),
            ..SymbolTable::default()
        }
    }

    /// Unwraps the enclosing table, if any.
    pub fn into_outer(self) -> Option<SymbolTable> {
        self.outer.map(|outer| *outer)
    }

    pub fn has_outer(&self) -> bool {
        self.outer.is_some()
    }

    /// Defines `name` in this table: Global in the top-level table, Local in
    /// an enclosed one. Every call allocates the next index, so rebinding a
    /// name points it at a fresh slot; code compiled against the previous
    /// binding keeps its old index.
    pub fn define(&mut self, name: &str) -> Symbol {
        let scope = if self.outer.is_some() {
            SymbolScope::Local
        } else {
            SymbolScope::Global
        };
        let symbol = Symbol {
            name: name.to_string(),
            scope,
            index: self.num_definitions,
        };

        self.store.insert(name.to_string(), symbol.clone());
        self.num_definitions += 1;
        symbol
    }

    /// Registers a built-in function at a caller-chosen index. Does not count
    /// toward `num_definitions`.
    pub fn define_builtin(&mut self, index: usize, name: &str) -> Symbol {
        let symbol = Symbol {
            name: name.to_string(),
            scope: SymbolScope::Builtin,
            index,
        };
        self.store.insert(name.to_string(), symbol.clone());
        symbol
    }

    /// Looks `name` up through the scope chain.
    ///
    /// A hit in an enclosing scope that is Local or Free there is promoted
    /// into this table's free list and re-registered here with Free scope;
    /// Global and Builtin hits pass through unchanged. Promotion happens at
    /// every intermediate scope, so a variable captured through two function
    /// boundaries is free in both.
    pub fn resolve(&mut self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.store.get(name) {
            return Some(symbol.clone());
        }

        let outer = self.outer.as_mut()?;
        let symbol = outer.resolve(name)?;

        match symbol.scope {
            SymbolScope::Global | SymbolScope::Builtin => Some(symbol),
            SymbolScope::Local | SymbolScope::Free => Some(self.define_free(symbol)),
        }
    }

    fn define_free(&mut self, original: Symbol) -> Symbol {
        let symbol = Symbol {
            name: original.name.clone(),
            scope: SymbolScope::Free,
            index: self.free_symbols.len(),
        };
        self.free_symbols.push(original);

        self.store.insert(symbol.name.clone(), symbol.clone());
        symbol
    }
}
