use jass_core::game::observation::ObservationError;
use jass_core::model::player::PlayerPosition;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("invalid observation: {0}")]
    InvalidObservation(#[from] ObservationError),
    #[error("observation is terminal; every card has been played")]
    TerminalObservation,
    #[error("card play requires a declared trump")]
    TrumpNotDeclared,
    #[error("no card available for {seat} in trick {trick_index}")]
    EmptyLegalSet {
        seat: PlayerPosition,
        trick_index: usize,
    },
    #[error("search finished without a child at the root")]
    NoChildren,
}
