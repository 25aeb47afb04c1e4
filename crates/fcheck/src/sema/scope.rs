//! Scopes, symbol table and tuple field table

use super::types::Type;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a lexical scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeId {
    Main,
    Function(u32),
    Loop(u32),
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeId::Main => write!(f, "main"),
            ScopeId::Function(n) => write!(f, "function{}", n),
            ScopeId::Loop(n) => write!(f, "loop{}", n),
        }
    }
}

/// Stack of active scopes, innermost last
#[derive(Debug)]
pub struct ScopeStack {
    active: Vec<ScopeId>,
    next_function: u32,
    next_loop: u32,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            active: vec![ScopeId::Main],
            next_function: 0,
            next_loop: 0,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.active.last().copied().unwrap_or(ScopeId::Main)
    }

    /// Enter a fresh function scope
    pub fn push_function(&mut self) -> ScopeId {
        let id = ScopeId::Function(self.next_function);
        self.next_function += 1;
        self.active.push(id);
        id
    }

    /// Enter a fresh loop scope
    pub fn push_loop(&mut self) -> ScopeId {
        let id = ScopeId::Loop(self.next_loop);
        self.next_loop += 1;
        self.active.push(id);
        id
    }

    /// Leave the innermost scope; `main` is never popped
    pub fn pop(&mut self) -> Option<ScopeId> {
        if self.active.len() > 1 {
            self.active.pop()
        } else {
            None
        }
    }

    /// Active scopes, innermost first
    pub fn innermost_first(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.active.iter().rev().copied()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// Declared with `name is value`
    Variable,
    /// Function literal parameter
    Parameter,
    /// `for x in ...` binding
    LoopVariable,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Variable => write!(f, "variable"),
            SymbolKind::Parameter => write!(f, "parameter"),
            SymbolKind::LoopVariable => write!(f, "loop variable"),
        }
    }
}

/// A binding in the symbol table
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub ty: Type,
    /// The initializer could not be typed; references stay silent
    pub poisoned: bool,
}

impl Symbol {
    pub fn new(kind: SymbolKind, ty: Type) -> Self {
        Self {
            kind,
            ty,
            poisoned: false,
        }
    }

    pub fn poisoned(kind: SymbolKind) -> Self {
        Self {
            kind,
            ty: Type::Undefined,
            poisoned: true,
        }
    }
}

/// `(name, scope) -> symbol`; entries live for the whole run
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<(String, ScopeId), Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a symbol unless the name is already bound in `scope`
    pub fn define(&mut self, name: &str, scope: ScopeId, symbol: Symbol) -> Result<(), String> {
        let key = (name.to_string(), scope);
        if self.symbols.contains_key(&key) {
            return Err(format!("Variable {} is already declared.", name));
        }
        self.symbols.insert(key, symbol);
        Ok(())
    }

    pub fn contains(&self, name: &str, scope: ScopeId) -> bool {
        self.symbols.contains_key(&(name.to_string(), scope))
    }

    pub fn get(&self, name: &str, scope: ScopeId) -> Option<&Symbol> {
        self.symbols.get(&(name.to_string(), scope))
    }

    /// Innermost binding of `name` along the active chain
    pub fn lookup(&self, name: &str, scopes: &ScopeStack) -> Option<(ScopeId, &Symbol)> {
        scopes
            .innermost_first()
            .find_map(|scope| self.get(name, scope).map(|symbol| (scope, symbol)))
    }

    /// All entries sorted by scope, then name
    pub fn entries(&self) -> Vec<(&str, ScopeId, &Symbol)> {
        let mut entries: Vec<_> = self
            .symbols
            .iter()
            .map(|((name, scope), symbol)| (name.as_str(), *scope, symbol))
            .collect();
        entries.sort_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)));
        entries
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// A tuple field: its name (or 1-based ordinal) and type
pub type TupleField = (String, Type);

/// `(owner declaration, scope) -> fields` for tuple literals
#[derive(Debug, Default)]
pub struct TupleTable {
    tuples: HashMap<(String, ScopeId), Vec<TupleField>>,
}

impl TupleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fields of a tuple evaluated while declaring `owner`;
    /// a later tuple for the same owner and scope replaces the earlier one
    pub fn record(&mut self, owner: &str, scope: ScopeId, fields: Vec<TupleField>) {
        self.tuples.insert((owner.to_string(), scope), fields);
    }

    /// Fields recorded for `owner` in exactly `scope`; enclosing scopes
    /// are not searched
    pub fn lookup(&self, owner: &str, scope: ScopeId) -> Option<&[TupleField]> {
        self.tuples.get(&(owner.to_string(), scope)).map(Vec::as_slice)
    }
}
