use crate::{grammar::ProductionId, Grammar, Production, Symbol};

use std::collections::{BTreeSet, VecDeque};

/// An [LR(0) item](https://en.wikipedia.org/wiki/LR_parser#Items): a
/// production with a dot marking recognition progress.
///
/// `production` indexes the automaton's augmented production list. The dot is
/// kept normalized past ε symbols (ε carries no progress, it counts as
/// already read), so the ε-production only ever exists as a single,
/// immediately reducible item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Item {
    pub production: ProductionId,
    pub dot: usize,
}

/// A state's worth of items. [`BTreeSet`] equality is the set equality that
/// identifies states, and the ordered representation doubles as a canonical
/// lookup key.
pub type ItemSet = BTreeSet<Item>;

impl Item {
    /// Creates the item with the dot at the start of the production.
    pub fn new(production: ProductionId, productions: &[Production]) -> Self {
        let dot = leading_epsilons(&productions[production], 0);

        Self { production, dot }
    }

    /// The symbol immediately after the dot, or `None` for a completed item.
    pub fn next_symbol(self, productions: &[Production]) -> Option<Symbol> {
        productions[self.production].rhs.get(self.dot).copied()
    }

    /// The item with the dot advanced over one symbol.
    pub fn advanced(self, productions: &[Production]) -> Self {
        let production = &productions[self.production];
        let dot = leading_epsilons(production, self.dot + 1);

        Self {
            production: self.production,
            dot: dot.min(production.rhs.len()),
        }
    }

    pub fn is_complete(self, productions: &[Production]) -> bool {
        self.next_symbol(productions).is_none()
    }

    /// Renders the item with a bullet, e.g. `A → a•B`.
    pub fn render(self, productions: &[Production]) -> String {
        let production = &productions[self.production];

        let mut rendered = format!("{} → ", production.lhs);
        for (position, symbol) in production.rhs.iter().enumerate() {
            if position == self.dot {
                rendered.push('•');
            }
            rendered.push_str(&symbol.to_string());
        }
        if self.dot == production.rhs.len() {
            rendered.push('•');
        }

        rendered
    }
}

/// Dot position after skipping the ε run starting at `from`.
fn leading_epsilons(production: &Production, from: usize) -> usize {
    from + production
        .rhs
        .iter()
        .skip(from)
        .take_while(|s| s.is_epsilon())
        .count()
}

/// Extends `items` with `B → •γ` for every nonterminal `B` some item is
/// reading, repeated to a fixed point.
pub(super) fn close(items: &mut ItemSet, grammar: &Grammar, productions: &[Production]) {
    let mut pending: VecDeque<Item> = items.iter().copied().collect();

    while let Some(item) = pending.pop_front() {
        let Some(symbol) = item.next_symbol(productions) else {
            continue;
        };
        if !symbol.is_nonterminal() {
            continue;
        }

        for &id in grammar.productions_of(symbol) {
            let new_item = Item::new(id, productions);
            if items.insert(new_item) {
                pending.push_back(new_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{close, Item, ItemSet};
    use crate::{Grammar, Symbol};

    fn productions_of(grammar: &Grammar) -> Vec<crate::Production> {
        grammar.productions().to_vec()
    }

    #[test]
    fn epsilon_production_item_is_immediately_complete() {
        let grammar = Grammar::parse(&["1", "S -> e"]).unwrap();
        let productions = productions_of(&grammar);

        let item = Item::new(0, &productions);

        assert!(item.is_complete(&productions));
        assert_eq!(item.next_symbol(&productions), None);
    }

    #[test]
    fn dot_walks_the_body() {
        let grammar = Grammar::parse(&["1", "S -> aSb"]).unwrap();
        let productions = productions_of(&grammar);

        let item = Item::new(0, &productions);
        assert_eq!(item.next_symbol(&productions), Some(Symbol::Terminal('a')));

        let item = item.advanced(&productions);
        assert_eq!(
            item.next_symbol(&productions),
            Some(Symbol::Nonterminal('S'))
        );

        let item = item.advanced(&productions).advanced(&productions);
        assert!(item.is_complete(&productions));
    }

    #[test]
    fn dot_skips_interior_epsilons() {
        // `ae` symbolizes to [a, ε]; the ε counts as already read
        let grammar = Grammar::parse(&["1", "S -> ae"]).unwrap();
        let productions = productions_of(&grammar);

        let item = Item::new(0, &productions);
        assert_eq!(item.next_symbol(&productions), Some(Symbol::Terminal('a')));
        assert_eq!(productions[0].rhs_len(), 1);

        let item = item.advanced(&productions);
        assert!(item.is_complete(&productions));
    }

    #[test]
    fn closure_pulls_in_reachable_productions() {
        let grammar = Grammar::parse(&["3", "S -> AB", "A -> aA d", "B -> b"]).unwrap();
        let productions = productions_of(&grammar);

        let mut items = ItemSet::from([Item::new(0, &productions)]);
        close(&mut items, &grammar, &productions);

        // S → •AB plus both A items; B is not yet being read
        assert_eq!(
            items,
            ItemSet::from([
                Item::new(0, &productions),
                Item::new(1, &productions),
                Item::new(2, &productions),
            ])
        );
    }

    #[test]
    fn render_marks_the_dot() {
        let grammar = Grammar::parse(&["1", "S -> aSb"]).unwrap();
        let productions = productions_of(&grammar);

        let item = Item::new(0, &productions);
        assert_eq!(item.render(&productions), "S → •aSb");
        assert_eq!(
            item.advanced(&productions).render(&productions),
            "S → a•Sb"
        );
    }
}
