use crate::{symbolize, Symbol};

use log::warn;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// Index of a [`Production`] in its [`Grammar`], in source order.
pub type ProductionId = usize;

/// A rewrite rule `A → α`.
///
/// The ε-production is represented as the one-element body `[Epsilon]`;
/// [`Production::rhs_len`] is the single place that maps it back to length
/// zero for dot positions and reduce pops.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

impl Production {
    /// Creates a production, normalizing an empty body to `[Epsilon]`.
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        let rhs = if rhs.is_empty() {
            vec![Symbol::Epsilon]
        } else {
            rhs
        };

        Self { lhs, rhs }
    }

    /// Whether this is the ε-production `A → ε`.
    pub fn is_epsilon(&self) -> bool {
        self.rhs == [Symbol::Epsilon]
    }

    /// Number of symbols the right-hand side actually derives: ε carries no
    /// progress, so only non-ε symbols count.
    pub fn rhs_len(&self) -> usize {
        self.rhs.iter().filter(|s| !s.is_epsilon()).count()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → ", self.lhs)?;
        for symbol in &self.rhs {
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// An immutable context-free grammar over single-character symbols.
///
/// Holds the productions in source order, the terminal and nonterminal
/// inventories, the fixed start symbol `S`, and an index from each
/// nonterminal to its productions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    productions: Vec<Production>,
    nonterminals: BTreeSet<Symbol>,
    terminals: BTreeSet<Symbol>,
    start: Symbol,
    by_lhs: BTreeMap<Symbol, Vec<ProductionId>>,
}

impl Grammar {
    /// Creates a new [`GrammarBuilder`].
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::new()
    }

    /// Parses the textual grammar format: a first line holding the number of
    /// production lines, then one line per nonterminal of the shape
    /// `X -> alt alt ...` where every alternative becomes its own production.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, GrammarError> {
        let mut lines = lines.iter();

        let count_line = lines.next().ok_or(GrammarError::Empty)?;
        let declared: usize = count_line
            .as_ref()
            .trim()
            .parse()
            .map_err(|_| GrammarError::BadCount(count_line.as_ref().trim().to_owned()))?;

        let mut builder = Self::builder();
        for found in 0..declared {
            let line = lines.next().ok_or(GrammarError::MissingProductions {
                expected: declared,
                found,
            })?;

            for production in parse_production_line(line.as_ref())? {
                builder.add_production(production);
            }
        }

        Ok(builder.build())
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id]
    }

    /// Productions with the given nonterminal on the left-hand side, in
    /// source order. A referenced-but-undefined nonterminal has none.
    pub fn productions_of(&self, nonterminal: Symbol) -> &[ProductionId] {
        self.by_lhs
            .get(&nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every left-hand side plus every nonterminal referenced on a
    /// right-hand side.
    pub fn nonterminals(&self) -> &BTreeSet<Symbol> {
        &self.nonterminals
    }

    /// Every terminal appearing on a right-hand side.
    pub fn terminals(&self) -> &BTreeSet<Symbol> {
        &self.terminals
    }

    pub fn start(&self) -> Symbol {
        self.start
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, production) in self.productions.iter().enumerate() {
            if id > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", production)?;
        }
        Ok(())
    }
}

/// Parses one production line into the productions of its alternatives.
///
/// The separator is the literal ` -> ` and must occur exactly once; the
/// left-hand side is a single uppercase letter; alternatives are split on
/// whitespace runs and symbolized character by character.
pub fn parse_production_line(line: &str) -> Result<Vec<Production>, GrammarError> {
    let parts: Vec<&str> = line.split(" -> ").collect();
    if parts.len() != 2 {
        return Err(GrammarError::MissingArrow(line.to_owned()));
    }
    let (lhs_part, rhs_part) = (parts[0], parts[1]);

    let lhs_str = lhs_part.trim();
    let mut lhs_chars = lhs_str.chars();
    let lhs = match (lhs_chars.next(), lhs_chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Symbol::Nonterminal(c),
        _ => return Err(GrammarError::BadLhs(lhs_str.to_owned())),
    };

    Ok(rhs_part
        .split_whitespace()
        .map(|alternative| Production::new(lhs, symbolize(alternative)))
        .collect())
}

/// Builder struct for the [`Grammar`].
pub struct GrammarBuilder {
    productions: Vec<Production>,
}

impl GrammarBuilder {
    fn new() -> Self {
        Self {
            productions: Vec::new(),
        }
    }

    /// Adds a production to the grammar.
    pub fn with_production(mut self, lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        self.add_production(Production::new(lhs, rhs));
        self
    }

    /// Adds a production to the grammar.
    pub fn add_production(&mut self, production: Production) {
        self.productions.push(production);
    }

    /// Builds the [`Grammar`], deriving the symbol inventories and the
    /// per-nonterminal production index.
    ///
    /// A nonterminal that is referenced but never defined is tolerated: it
    /// simply has no productions and makes every derivation through it fail
    /// at recognition time.
    pub fn build(self) -> Grammar {
        let mut nonterminals = BTreeSet::new();
        let mut terminals = BTreeSet::new();
        let mut by_lhs: BTreeMap<Symbol, Vec<ProductionId>> = BTreeMap::new();

        for (id, production) in self.productions.iter().enumerate() {
            nonterminals.insert(production.lhs);
            by_lhs.entry(production.lhs).or_default().push(id);

            for &symbol in &production.rhs {
                match symbol {
                    Symbol::Nonterminal(_) => {
                        nonterminals.insert(symbol);
                    }
                    Symbol::Terminal(_) => {
                        terminals.insert(symbol);
                    }
                    Symbol::Epsilon | Symbol::EndMarker => {}
                }
            }
        }

        for undefined in nonterminals.iter().filter(|nt| !by_lhs.contains_key(nt)) {
            warn!("nonterminal {} is referenced but has no productions", undefined);
        }

        Grammar {
            productions: self.productions,
            nonterminals,
            terminals,
            start: Symbol::Nonterminal('S'),
            by_lhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("empty grammar input")]
    Empty,
    #[error("invalid production count: {0:?}")]
    BadCount(String),
    #[error("expected {expected} production lines, found {found}")]
    MissingProductions { expected: usize, found: usize },
    #[error("missing ` -> ` separator in production line: {0:?}")]
    MissingArrow(String),
    #[error("left-hand side must be a single uppercase letter: {0:?}")]
    BadLhs(String),
}
