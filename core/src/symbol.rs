//! Symbols and keywords.
//!
//! Local symbols and keywords are interned by name and qualified symbols by
//! their (domain, name) pair, so equal inputs always yield the same
//! identity. Generated symbols are never interned: each one is unique for
//! the lifetime of the process, even when created concurrently.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};
use tracing::trace;

static INTERNER: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

static GENSYM_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Separator between the domain and name of a qualified symbol.
pub const DOMAIN_SEPARATOR: char = '/';

/// A name that has been interned in the global string interner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name(DefaultSymbol);

impl Name {
    /// Intern a string and return its Name
    pub fn new(s: &str) -> Self {
        let existing = INTERNER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(s);
        if let Some(sym) = existing {
            return Name(sym);
        }

        let mut interner = INTERNER.write().unwrap_or_else(PoisonError::into_inner);
        let before = interner.len();
        let sym = interner.get_or_intern(s);
        if interner.len() > before {
            trace!(name = s, interned = interner.len(), "interned new name");
        }
        Name(sym)
    }

    /// Resolve the name and run a function with the string slice
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let interner = INTERNER.read().unwrap_or_else(PoisonError::into_inner);
        // Names are only ever created by interning, so resolution can't fail
        f(interner.resolve(self.0).unwrap_or_default())
    }

    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}

// ============================================================================
// Symbols
// ============================================================================

#[derive(Debug, Clone)]
pub enum Symbol {
    /// Interned by name
    Local(Name),
    /// Interned by (domain, name)
    Qualified { domain: Name, name: Name },
    /// Unique, never interned
    Generated(Arc<str>),
}

impl Symbol {
    /// Return the canonical local symbol for `name`.
    pub fn intern_local(name: &str) -> Self {
        Symbol::Local(Name::new(name))
    }

    /// Return the canonical symbol for `name` within `domain`.
    pub fn intern_qualified(domain: &str, name: &str) -> Self {
        Symbol::Qualified {
            domain: Name::new(domain),
            name: Name::new(name),
        }
    }

    /// Intern `text`, treating `domain/name` as qualified. A lone `/` and
    /// names with an empty domain or name part are local.
    pub fn parse(text: &str) -> Self {
        match text.split_once(DOMAIN_SEPARATOR) {
            Some((domain, name)) if !domain.is_empty() && !name.is_empty() => {
                Self::intern_qualified(domain, name)
            }
            _ => Self::intern_local(text),
        }
    }

    /// Generate a fresh symbol that can never be produced by interning.
    pub fn gen_sym(prefix: &str) -> Self {
        let id = GENSYM_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        let name = format!("x-{prefix}-gensym-{id:x}");
        trace!(%name, "generated symbol");
        Symbol::Generated(Arc::from(name))
    }

    /// The local part of the symbol's name.
    pub fn name(&self) -> String {
        match self {
            Symbol::Local(name) | Symbol::Qualified { name, .. } => name.resolve(),
            Symbol::Generated(name) => name.to_string(),
        }
    }

    pub fn domain(&self) -> Option<String> {
        match self {
            Symbol::Qualified { domain, .. } => Some(domain.resolve()),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Symbol::Generated(_))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Symbol::Local(a), Symbol::Local(b)) => a == b,
            (
                Symbol::Qualified { domain, name },
                Symbol::Qualified {
                    domain: other_domain,
                    name: other_name,
                },
            ) => domain == other_domain && name == other_name,
            (Symbol::Generated(a), Symbol::Generated(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Local(name) => write!(f, "{name}"),
            Symbol::Qualified { domain, name } => write!(f, "{domain}{DOMAIN_SEPARATOR}{name}"),
            Symbol::Generated(name) => f.write_str(name),
        }
    }
}

// ============================================================================
// Keywords
// ============================================================================

/// A self-evaluating interned name, printed with a leading colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keyword(Name);

impl Keyword {
    pub fn new(name: &str) -> Self {
        Keyword(Name::new(name.strip_prefix(':').unwrap_or(name)))
    }

    pub fn name(&self) -> String {
        self.0.resolve()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}
