//! FIRST and FOLLOW set computation by fixed-point iteration over the
//! productions of a grammar.

use crate::{Grammar, Symbol};

use log::debug;

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// Ordered set of symbols; iteration follows the total symbol order.
pub type SymbolSet = BTreeSet<Symbol>;

/// FIRST sets for every symbol of a grammar.
///
/// Terminals, ε and `$` map to their singletons; every nonterminal maps to
/// the least set satisfying the FIRST recurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: BTreeMap<Symbol, SymbolSet>,
    empty: SymbolSet,
}

impl FirstSets {
    pub fn of_grammar(grammar: &Grammar) -> Self {
        let mut sets = BTreeMap::new();

        for &terminal in grammar.terminals() {
            sets.insert(terminal, SymbolSet::from([terminal]));
        }
        sets.insert(Symbol::Epsilon, SymbolSet::from([Symbol::Epsilon]));
        sets.insert(Symbol::EndMarker, SymbolSet::from([Symbol::EndMarker]));
        for &nonterminal in grammar.nonterminals() {
            sets.insert(nonterminal, SymbolSet::new());
        }

        let mut first = Self {
            sets,
            empty: SymbolSet::new(),
        };

        // grow every FIRST(A) by FIRST of its bodies until a full pass
        // changes nothing; the sets are monotone and bounded by the symbol
        // inventory, so this terminates
        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                let body_first = first.of_sequence(&production.rhs);

                let lhs_first = first
                    .sets
                    .get_mut(&production.lhs)
                    .expect("every left-hand side is in the nonterminal inventory");
                let before = lhs_first.len();
                lhs_first.extend(body_first);
                changed |= lhs_first.len() > before;
            }
        }

        for (symbol, set) in &first.sets {
            if symbol.is_nonterminal() {
                debug!("FIRST({}) = {}", symbol, SetDisplay(set));
            }
        }

        first
    }

    /// FIRST of a single symbol. Symbols the grammar never mentions have an
    /// empty FIRST.
    pub fn of_symbol(&self, symbol: Symbol) -> &SymbolSet {
        self.sets.get(&symbol).unwrap_or(&self.empty)
    }

    /// FIRST of a sequence of symbols, evaluated against the current map.
    ///
    /// ε is part of the result exactly when every symbol of the sequence can
    /// derive ε, which covers the empty sequence.
    pub fn of_sequence(&self, symbols: &[Symbol]) -> SymbolSet {
        let mut result = SymbolSet::new();

        for &symbol in symbols {
            let symbol_first = self.of_symbol(symbol);
            result.extend(symbol_first.iter().copied().filter(|s| !s.is_epsilon()));

            if !symbol_first.contains(&Symbol::Epsilon) {
                return result;
            }
        }

        result.insert(Symbol::Epsilon);
        result
    }
}

/// FOLLOW sets for every nonterminal of a grammar.
///
/// Members are terminals or `$`, never ε and never nonterminals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: BTreeMap<Symbol, SymbolSet>,
    empty: SymbolSet,
}

impl FollowSets {
    /// Computes FOLLOW against a finalized FIRST map.
    pub fn of_grammar(grammar: &Grammar, first: &FirstSets) -> Self {
        let mut sets: BTreeMap<Symbol, SymbolSet> = grammar
            .nonterminals()
            .iter()
            .map(|&nonterminal| (nonterminal, SymbolSet::new()))
            .collect();
        sets.entry(grammar.start())
            .or_default()
            .insert(Symbol::EndMarker);

        let mut changed = true;
        while changed {
            changed = false;

            for production in grammar.productions() {
                for (position, &symbol) in production.rhs.iter().enumerate() {
                    if !symbol.is_nonterminal() {
                        continue;
                    }

                    let rest = &production.rhs[position + 1..];
                    let rest_first = first.of_sequence(rest);
                    let rest_derives_epsilon = rest_first.contains(&Symbol::Epsilon);

                    let mut additions: SymbolSet = rest_first
                        .into_iter()
                        .filter(|s| !s.is_epsilon())
                        .collect();
                    if rest_derives_epsilon {
                        let lhs_follow = sets
                            .get(&production.lhs)
                            .cloned()
                            .unwrap_or_default();
                        additions.extend(lhs_follow);
                    }

                    let follow = sets.entry(symbol).or_default();
                    let before = follow.len();
                    follow.extend(additions);
                    changed |= follow.len() > before;
                }
            }
        }

        for (nonterminal, set) in &sets {
            debug!("FOLLOW({}) = {}", nonterminal, SetDisplay(set));
        }

        Self {
            sets,
            empty: SymbolSet::new(),
        }
    }

    /// FOLLOW of a nonterminal; empty for anything else.
    pub fn of(&self, nonterminal: Symbol) -> &SymbolSet {
        self.sets.get(&nonterminal).unwrap_or(&self.empty)
    }
}

/// Renders a symbol set as `{ a b c }` in the stable symbol order.
pub struct SetDisplay<'a>(pub &'a SymbolSet);

impl fmt::Display for SetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for symbol in self.0 {
            write!(f, " {}", symbol)?;
        }
        f.write_str(" }")
    }
}
