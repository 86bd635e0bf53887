use crate::{cfsm::StateId, Production, Symbol};

/// Two productions demanded the same predictive-table cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "grammar is not LL(1): conflict at M[{nonterminal}, {lookahead}] \
     between `{existing}` and `{incoming}`"
)]
pub struct Ll1Conflict {
    pub nonterminal: Symbol,
    pub lookahead: Symbol,
    pub existing: Production,
    pub incoming: Production,
}

/// Two distinct actions demanded the same ACTION-table cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlrConflict {
    #[error(
        "grammar is not SLR(1): shift/reduce conflict in state {state} \
         on `{symbol}` (reduce by `{reduction}`)"
    )]
    ShiftReduce {
        state: StateId,
        symbol: Symbol,
        reduction: Production,
    },
    #[error(
        "grammar is not SLR(1): reduce/reduce conflict in state {state} \
         on `{symbol}` between `{existing}` and `{incoming}`"
    )]
    ReduceReduce {
        state: StateId,
        symbol: Symbol,
        existing: Production,
        incoming: Production,
    },
}
