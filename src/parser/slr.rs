use super::{
    error::SlrConflict,
    table::{Action, ParseTable},
};
use crate::{analysis::FollowSets, cfsm::Cfsm, symbolize, Grammar, Production, Symbol};

/// Shift-reduce parser backed by the SLR(1) ACTION/GOTO tables.
#[derive(Debug)]
pub struct SlrParser {
    table: ParseTable,
    /// The augmented production list reduce entries index into.
    productions: Vec<Production>,
}

impl SlrParser {
    /// Builds the LR(0) automaton and synthesizes its SLR(1) tables.
    pub fn new(grammar: &Grammar, follow: &FollowSets) -> Result<Self, SlrConflict> {
        let cfsm = Cfsm::from_grammar(grammar);
        let table = ParseTable::new_slr(&cfsm, follow)?;

        Ok(Self {
            table,
            productions: cfsm.into_productions(),
        })
    }

    /// Runs the shift-reduce recognizer over `input`.
    ///
    /// The stack holds state ids and starts as `[0]`; the symbolized input
    /// gets `$` appended. An absent ACTION or GOTO entry rejects, and
    /// accepting requires the whole input to have been consumed, so a
    /// literal `$` or `e` inside the input only ever rejects.
    pub fn accepts(&self, input: &str) -> bool {
        let mut symbols = symbolize(input);
        symbols.push(Symbol::EndMarker);

        let mut stack = vec![0];
        let mut head = 0;

        loop {
            let state = *stack.last().expect("state 0 stays on the stack");
            let current = symbols[head];

            let Some(&action) = self.table.action[state].get(&current) else {
                return false;
            };

            match action {
                Action::Shift(dest) => {
                    stack.push(dest);
                    head += 1;
                }
                Action::Reduce(id) => {
                    let production = &self.productions[id];

                    if stack.len() <= production.rhs_len() {
                        return false;
                    }
                    stack.truncate(stack.len() - production.rhs_len());

                    let top = *stack.last().expect("state 0 stays on the stack");
                    let Some(&dest) = self.table.goto[top].get(&production.lhs) else {
                        return false;
                    };
                    stack.push(dest);
                }
                // accepting on an embedded `$` would leave input unread
                Action::Accept => return head == symbols.len() - 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SlrParser;
    use crate::{
        analysis::{FirstSets, FollowSets},
        Grammar, SlrConflict,
    };

    fn parser_for(grammar: &Grammar) -> Result<SlrParser, SlrConflict> {
        let first = FirstSets::of_grammar(grammar);
        let follow = FollowSets::of_grammar(grammar, &first);
        SlrParser::new(grammar, &follow)
    }

    #[test]
    fn recognizes_the_expression_grammar() {
        let grammar =
            Grammar::parse(&["3", "S -> S+T T", "T -> T*F F", "F -> (S) i"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        assert!(parser.accepts("i+i"));
        assert!(parser.accepts("(i)"));
        assert!(parser.accepts("i+i*i"));
        assert!(parser.accepts("(i+i)*i"));
        assert!(!parser.accepts("(i+i)*i)"));
        assert!(!parser.accepts("i+"));
        assert!(!parser.accepts(""));
    }

    #[test]
    fn recognizes_left_recursion() {
        let grammar = Grammar::parse(&["1", "S -> Sa a"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        assert!(parser.accepts("a"));
        assert!(parser.accepts("aa"));
        assert!(parser.accepts("aaaa"));
        assert!(!parser.accepts(""));
        assert!(!parser.accepts("b"));
    }

    #[test]
    fn reduces_epsilon_productions_without_popping() {
        let grammar = Grammar::parse(&["1", "S -> aSb e"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        assert!(parser.accepts(""));
        assert!(parser.accepts("ab"));
        assert!(parser.accepts("aabb"));
        assert!(!parser.accepts("aab"));
        assert!(!parser.accepts("ba"));
    }

    #[test]
    fn end_marker_character_in_input_is_rejected() {
        let grammar = Grammar::parse(&["1", "S -> aSb e"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        assert!(!parser.accepts("$"));
        assert!(!parser.accepts("ab$cd"));
        assert!(!parser.accepts("ab$"));
        assert!(parser.accepts("ab"));
    }

    #[test]
    fn epsilon_character_in_input_is_rejected() {
        let grammar = Grammar::parse(&["1", "S -> aSb e"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        assert!(!parser.accepts("e"));
        assert!(!parser.accepts("aeb"));
    }

    #[test]
    fn recognition_is_repeatable() {
        let grammar =
            Grammar::parse(&["3", "S -> S+T T", "T -> T*F F", "F -> (S) i"]).unwrap();
        let parser = parser_for(&grammar).unwrap();

        for input in ["i+i", "(i", "", "i*i+i"] {
            assert_eq!(parser.accepts(input), parser.accepts(input));
        }
    }
}
