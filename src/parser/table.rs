use super::error::SlrConflict;
use crate::{
    analysis::FollowSets,
    cfsm::{Cfsm, StateId},
    grammar::ProductionId,
    Symbol,
};

use std::collections::{btree_map::Entry, BTreeMap};

/// A single ACTION-table entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

/// ACTION and GOTO tables driving the shift-reduce recognizer.
///
/// Both tables are indexed by state id; an absent column means a parse
/// error. ACTION columns are terminals or `$`, GOTO columns nonterminals.
#[derive(Debug)]
pub struct ParseTable {
    pub(super) action: Vec<BTreeMap<Symbol, Action>>,
    pub(super) goto: Vec<BTreeMap<Symbol, StateId>>,
}

impl ParseTable {
    /// Synthesizes the SLR(1) tables from the canonical collection and the
    /// FOLLOW sets. The first doubly-claimed cell aborts construction.
    pub fn new_slr(cfsm: &Cfsm<'_>, follow: &FollowSets) -> Result<Self, SlrConflict> {
        let productions = cfsm.productions();

        let mut action: Vec<BTreeMap<Symbol, Action>> =
            vec![BTreeMap::new(); cfsm.states().len()];
        let mut goto: Vec<BTreeMap<Symbol, StateId>> =
            vec![BTreeMap::new(); cfsm.states().len()];

        for state in cfsm.states() {
            for &item in &state.items {
                match item.next_symbol(productions) {
                    Some(symbol) if symbol.is_terminal() => {
                        // item of the form `A → α•aβ`
                        let dest = state.transitions[&symbol];
                        Self::insert_action(
                            &mut action,
                            cfsm,
                            state.id,
                            symbol,
                            Action::Shift(dest),
                        )?;
                    }
                    None if item.production == cfsm.augmented() => {
                        // the accept item `S' → S•`
                        Self::insert_action(
                            &mut action,
                            cfsm,
                            state.id,
                            Symbol::EndMarker,
                            Action::Accept,
                        )?;
                    }
                    None => {
                        // item of the form `A → α•`: reduce on FOLLOW(A)
                        let lhs = productions[item.production].lhs;
                        for &symbol in follow.of(lhs) {
                            Self::insert_action(
                                &mut action,
                                cfsm,
                                state.id,
                                symbol,
                                Action::Reduce(item.production),
                            )?;
                        }
                    }
                    Some(Symbol::Epsilon) => {
                        unreachable!("the dot is kept normalized past ε")
                    }
                    Some(_) => {
                        // a nonterminal (covered by GOTO below) or a literal
                        // `$` inside a body, which never becomes an entry
                    }
                }
            }

            for (&symbol, &dest) in &state.transitions {
                if symbol.is_nonterminal() {
                    Self::insert_goto(&mut goto, state.id, symbol, dest);
                }
            }
        }

        Ok(Self { action, goto })
    }

    fn insert_action(
        table: &mut [BTreeMap<Symbol, Action>],
        cfsm: &Cfsm<'_>,
        state: StateId,
        symbol: Symbol,
        action: Action,
    ) -> Result<(), SlrConflict> {
        match table[state].entry(symbol) {
            Entry::Vacant(cell) => {
                cell.insert(action);
                Ok(())
            }
            Entry::Occupied(cell) if *cell.get() == action => Ok(()),
            Entry::Occupied(cell) => Err(Self::conflict(cfsm, state, symbol, *cell.get(), action)),
        }
    }

    fn conflict(
        cfsm: &Cfsm<'_>,
        state: StateId,
        symbol: Symbol,
        existing: Action,
        incoming: Action,
    ) -> SlrConflict {
        let production = |id: ProductionId| cfsm.productions()[id].clone();

        match (existing, incoming) {
            (Action::Shift(_), Action::Reduce(id)) | (Action::Reduce(id), Action::Shift(_)) => {
                SlrConflict::ShiftReduce {
                    state,
                    symbol,
                    reduction: production(id),
                }
            }
            (Action::Reduce(first), Action::Reduce(second)) => SlrConflict::ReduceReduce {
                state,
                symbol,
                existing: production(first),
                incoming: production(second),
            },
            // accepting is reducing by the augmented production, so a clash
            // with an ordinary reduce is a reduce/reduce conflict
            (Action::Accept, Action::Reduce(id)) | (Action::Reduce(id), Action::Accept) => {
                SlrConflict::ReduceReduce {
                    state,
                    symbol,
                    existing: production(cfsm.augmented()),
                    incoming: production(id),
                }
            }
            _ => unreachable!("equal shift targets come from the same deterministic transition"),
        }
    }

    fn insert_goto(
        table: &mut [BTreeMap<Symbol, StateId>],
        state: StateId,
        symbol: Symbol,
        dest: StateId,
    ) {
        let previous = table[state].insert(symbol, dest);

        debug_assert!(
            previous.map_or(true, |p| p == dest),
            "goto conflict should not be possible"
        );
    }
}
