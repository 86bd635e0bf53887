pub mod error;
pub mod ll1;
pub mod slr;
pub mod table;

#[cfg(test)]
mod tests {
    use crate::{
        analysis::{FirstSets, FollowSets},
        Grammar, Ll1Parser, Production, SlrParser, Symbol,
    };

    use proptest::{collection, prelude::*};

    fn arbitrary_grammar() -> impl Strategy<Value = Grammar> {
        let lhs = prop_oneof![Just('S'), Just('A'), Just('B')].prop_map(Symbol::Nonterminal);
        let symbol = prop_oneof![
            Just(Symbol::Nonterminal('S')),
            Just(Symbol::Nonterminal('A')),
            Just(Symbol::Nonterminal('B')),
            Just(Symbol::Terminal('a')),
            Just(Symbol::Terminal('b')),
            Just(Symbol::Terminal('c')),
        ];
        let rhs = prop_oneof![
            1 => Just(vec![Symbol::Epsilon]),
            4 => collection::vec(symbol, 1..4),
        ];

        collection::vec((lhs, rhs), 1..8).prop_map(|rules| {
            let mut builder = Grammar::builder();
            for (lhs, rhs) in rules {
                builder.add_production(Production::new(lhs, rhs));
            }
            builder.build()
        })
    }

    proptest! {
        /// Whenever both constructions succeed, the two recognizers decide
        /// the same language.
        #[test]
        fn recognizers_agree_when_both_parsers_build(
            grammar in arbitrary_grammar(),
            input in "[abc]{0,6}",
        ) {
            let first = FirstSets::of_grammar(&grammar);
            let follow = FollowSets::of_grammar(&grammar, &first);

            let (Ok(ll1), Ok(slr)) = (
                Ll1Parser::new(&grammar, &first, &follow),
                SlrParser::new(&grammar, &follow),
            ) else {
                return Ok(());
            };

            prop_assert_eq!(ll1.accepts(&input), slr.accepts(&input));
        }

        /// Construction never panics, whatever the productions look like.
        #[test]
        fn builders_are_total(grammar in arbitrary_grammar()) {
            let first = FirstSets::of_grammar(&grammar);
            let follow = FollowSets::of_grammar(&grammar, &first);

            let _ = Ll1Parser::new(&grammar, &first, &follow);
            let _ = SlrParser::new(&grammar, &follow);
        }
    }
}
