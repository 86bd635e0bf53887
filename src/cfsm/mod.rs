//! Characteristic finite-state machine: the canonical collection of LR(0)
//! item sets for an augmented grammar.

pub use self::{
    item::{Item, ItemSet},
    state::{State, StateId},
};

use self::{item::close, state::StateIdGenerator};
use crate::{grammar::ProductionId, Grammar, Production, Symbol};

use log::{debug, log_enabled, trace, Level};

use std::collections::{BTreeSet, HashMap, VecDeque};

mod item;
mod state;

/// The canonical LR(0) collection of a grammar, augmented with a synthetic
/// start production `S' → S`.
///
/// State 0 is the closure of the augmented item; state equality during
/// construction is item-set equality. Items index the augmented production
/// list, and the augmented production is identified by its id; its
/// left-hand side character plays no role in any comparison.
#[derive(Debug)]
pub struct Cfsm<'g> {
    grammar: &'g Grammar,
    /// Grammar productions in source order with `S' → S` appended last.
    productions: Vec<Production>,
    augmented: ProductionId,
    states: Vec<State>,
}

impl<'g> Cfsm<'g> {
    /// Builds the canonical collection with a worklist of unprocessed
    /// states.
    pub fn from_grammar(grammar: &'g Grammar) -> Self {
        let mut productions = grammar.productions().to_vec();
        productions.push(Production::new(
            Symbol::Nonterminal('\''),
            vec![grammar.start()],
        ));
        let augmented = productions.len() - 1;

        let mut state_ids = StateIdGenerator::default();
        let mut states: Vec<State> = Vec::new();
        let mut ids_by_items: HashMap<ItemSet, StateId> = HashMap::new();

        let mut start_items = ItemSet::from([Item::new(augmented, &productions)]);
        close(&mut start_items, grammar, &productions);

        let start_id = state_ids.next();
        ids_by_items.insert(start_items.clone(), start_id);
        states.push(State::new(start_id, start_items));

        let mut pending = VecDeque::from([start_id]);
        while let Some(id) = pending.pop_front() {
            // every symbol some item of this state is reading, in symbol
            // order so state numbering is reproducible
            let read_symbols: BTreeSet<Symbol> = states[id]
                .items
                .iter()
                .filter_map(|item| item.next_symbol(&productions))
                .collect();

            for symbol in read_symbols {
                // goto: advance the items reading this symbol, then close;
                // never empty because the symbol came from an item
                let mut target: ItemSet = states[id]
                    .items
                    .iter()
                    .filter(|item| item.next_symbol(&productions) == Some(symbol))
                    .map(|item| item.advanced(&productions))
                    .collect();
                close(&mut target, grammar, &productions);

                let target_id = match ids_by_items.get(&target) {
                    Some(&existing) => existing,
                    None => {
                        let new_id = state_ids.next();
                        ids_by_items.insert(target.clone(), new_id);
                        states.push(State::new(new_id, target));
                        pending.push_back(new_id);
                        new_id
                    }
                };

                states[id].transitions.insert(symbol, target_id);
            }
        }

        debug!("canonical collection has {} states", states.len());
        if log_enabled!(Level::Trace) {
            for state in &states {
                for item in &state.items {
                    trace!("state {}: {}", state.id, item.render(&productions));
                }
            }
        }

        Self {
            grammar,
            productions,
            augmented,
            states,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        self.grammar
    }

    /// The augmented production list the items index into.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Id of the synthetic `S' → S` production.
    pub fn augmented(&self) -> ProductionId {
        self.augmented
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Consumes the automaton, keeping the augmented production list for
    /// table-driven recognition.
    pub fn into_productions(self) -> Vec<Production> {
        self.productions
    }
}

#[cfg(test)]
mod tests {
    use super::{Cfsm, Item};
    use crate::{Grammar, Symbol};

    #[test]
    fn expression_grammar_has_the_classic_twelve_states() {
        let grammar =
            Grammar::parse(&["3", "S -> S+T T", "T -> T*F F", "F -> (S) i"]).unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);

        assert_eq!(cfsm.states().len(), 12);
    }

    #[test]
    fn start_state_is_the_closure_of_the_augmented_item() {
        let grammar = Grammar::parse(&["1", "S -> aS b"]).unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);
        let productions = cfsm.productions();

        // S' → •S plus both S items
        assert_eq!(
            cfsm.states()[0].items,
            [
                Item::new(cfsm.augmented(), productions),
                Item::new(0, productions),
                Item::new(1, productions),
            ]
            .into_iter()
            .collect()
        );
    }

    #[test]
    fn equal_item_sets_share_a_state() {
        // goto(I2, a) loops back to I2 itself
        let grammar = Grammar::parse(&["1", "S -> aS e"]).unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);

        assert_eq!(cfsm.states().len(), 4);

        let shifted = cfsm.states()[0].transitions[&Symbol::Terminal('a')];
        assert_eq!(
            cfsm.states()[shifted].transitions[&Symbol::Terminal('a')],
            shifted
        );
    }

    #[test]
    fn transitions_cover_terminals_and_nonterminals() {
        let grammar = Grammar::parse(&["1", "S -> aS b"]).unwrap();
        let cfsm = Cfsm::from_grammar(&grammar);
        let start = &cfsm.states()[0];

        assert!(start.transitions.contains_key(&Symbol::Terminal('a')));
        assert!(start.transitions.contains_key(&Symbol::Terminal('b')));
        assert!(start.transitions.contains_key(&Symbol::Nonterminal('S')));
    }
}
