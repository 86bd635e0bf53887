use super::error::Ll1Conflict;
use crate::{
    analysis::{FirstSets, FollowSets},
    grammar::ProductionId,
    symbolize, Grammar, Symbol,
};

use log::debug;

use std::collections::{btree_map::Entry, BTreeMap};

/// Predictive parser: the table `M[A, a]` plus the stack-driven top-down
/// recognizer.
#[derive(Debug)]
pub struct Ll1Parser<'g> {
    grammar: &'g Grammar,
    table: BTreeMap<(Symbol, Symbol), ProductionId>,
}

impl<'g> Ll1Parser<'g> {
    /// Builds the predictive table.
    ///
    /// Every production `A → α` claims the cell `(A, a)` for each terminal
    /// `a` in FIRST(α); when α can derive ε it also claims the cell `(A, b)`
    /// for each `b` in FOLLOW(A). Claiming an occupied cell makes the
    /// grammar non-LL(1).
    pub fn new(
        grammar: &'g Grammar,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> Result<Self, Ll1Conflict> {
        let mut table = BTreeMap::new();

        for (id, production) in grammar.productions().iter().enumerate() {
            let body_first = first.of_sequence(&production.rhs);

            for &symbol in &body_first {
                if symbol.is_epsilon() {
                    continue;
                }
                Self::insert(grammar, &mut table, production.lhs, symbol, id)?;
            }

            if body_first.contains(&Symbol::Epsilon) {
                for &symbol in follow.of(production.lhs) {
                    Self::insert(grammar, &mut table, production.lhs, symbol, id)?;
                }
            }
        }

        debug!("predictive table has {} cells", table.len());

        Ok(Self { grammar, table })
    }

    fn insert(
        grammar: &Grammar,
        table: &mut BTreeMap<(Symbol, Symbol), ProductionId>,
        nonterminal: Symbol,
        lookahead: Symbol,
        production: ProductionId,
    ) -> Result<(), Ll1Conflict> {
        match table.entry((nonterminal, lookahead)) {
            Entry::Vacant(cell) => {
                cell.insert(production);
                Ok(())
            }
            Entry::Occupied(cell) => Err(Ll1Conflict {
                nonterminal,
                lookahead,
                existing: grammar.production(*cell.get()).clone(),
                incoming: grammar.production(production).clone(),
            }),
        }
    }

    /// Runs the predictive recognizer over `input`.
    ///
    /// The stack starts as `[$, S]` and the symbolized input gets `$`
    /// appended; acceptance requires stack and input to bottom out on the
    /// appended terminator together, with the whole input consumed. A
    /// literal `$` or `e` inside the input can never be consumed as a
    /// terminal, so it only ever rejects. ε never reaches the stack and is
    /// never compared against input.
    pub fn accepts(&self, input: &str) -> bool {
        let mut symbols = symbolize(input);
        symbols.push(Symbol::EndMarker);

        let mut stack = vec![Symbol::EndMarker, self.grammar.start()];
        let mut head = 0;

        loop {
            let top = *stack
                .last()
                .expect("the end marker stays on the stack until acceptance");
            let current = symbols[head];

            if top.is_end_marker() && current.is_end_marker() {
                // only the appended terminator closes the parse; meeting an
                // embedded `$` here means unread input remains
                return head == symbols.len() - 1;
            }

            if top.is_nonterminal() {
                let Some(&id) = self.table.get(&(top, current)) else {
                    return false;
                };

                stack.pop();
                for &symbol in self.grammar.production(id).rhs.iter().rev() {
                    if !symbol.is_epsilon() {
                        stack.push(symbol);
                    }
                }
            } else if top == current {
                stack.pop();
                head += 1;
            } else {
                return false;
            }
        }
    }
}
