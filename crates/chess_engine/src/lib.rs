pub mod ai;
pub mod bitboard;
pub mod budget;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod rules;
pub mod search;

pub use ai::{find_best_move, ChessAI, SearchOutcome};
pub use bitboard::BitboardEvaluator;
pub use budget::SearchBudget;
pub use config::{SearchConfig, SearchVariant, DEFAULT_THINK_TIME, MAX_DEPTH, MIN_DEPTH};
pub use error::SearchError;
pub use evaluation::{
    evaluate_position, EvaluationWeights, PositionTerms, Score, DRAW_SCORE, MATE_SCORE,
};
pub use rules::RulesEngine;
pub use search::{ClockCheck, DepthConvention, Evaluator, Pruning, SearchStats, Searcher};
