use std::time::Duration;

use chess_core::{Color, Move};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    budget::SearchBudget,
    config::{SearchConfig, MAX_DEPTH, MIN_DEPTH},
    error::SearchError,
    evaluation::{EvaluationWeights, Score},
    rules::RulesEngine,
    search::Searcher,
};

/// Result of one root search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Value of `best_move`, or `±inf` if the budget ran out before any root
    /// move finished.
    pub score: Score,
    pub nodes: u64,
    /// Whether every root move was searched with budget to spare.
    pub completed: bool,
}

/// Picks a move for the side to move.
///
/// Root moves are shuffled and exact ties are broken by a coin flip, so
/// equally good moves are chosen with some variety. Seed the RNG through
/// [`ChessAI::with_rng`] for reproducible play.
#[derive(Debug, Clone)]
pub struct ChessAI<R: Rng = StdRng> {
    config: SearchConfig,
    budget: SearchBudget,
    rng: R,
}

impl ChessAI<StdRng> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl Default for ChessAI<StdRng> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl<R: Rng> ChessAI<R> {
    pub fn with_rng(config: SearchConfig, rng: R) -> Self {
        let budget = SearchBudget::new(config.max_thinking_time);
        Self {
            config,
            budget,
            rng,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_time(&mut self, max_thinking_time: Option<Duration>) {
        self.config.max_thinking_time = max_thinking_time;
        self.budget.set_max_thinking_time(max_thinking_time);
    }

    pub fn set_max_depth(&mut self, depth: u8) {
        self.config.max_depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    }

    pub fn set_weights(&mut self, weights: EvaluationWeights) {
        self.config.weights = weights;
    }

    pub fn find_best_move<B: RulesEngine + ?Sized>(
        &mut self,
        board: &mut B,
    ) -> Result<Move, SearchError> {
        self.search(board).map(|outcome| outcome.best_move)
    }

    /// Searches every root move to `max_depth` plies, or until the budget
    /// expires, and leaves `board` exactly as it was given.
    pub fn search<B: RulesEngine + ?Sized>(
        &mut self,
        board: &mut B,
    ) -> Result<SearchOutcome, SearchError> {
        self.budget.reset();

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            return Err(SearchError::GameOver(board.status()));
        }
        moves.shuffle(&mut self.rng);

        let maximizing = board.side_to_move() == Color::White;
        let max_depth = self.config.max_depth;
        debug!(
            "searching {} root moves for {:?} to depth {}",
            moves.len(),
            board.side_to_move(),
            max_depth
        );

        let mut searcher = Searcher::new(board, &self.config, self.budget);
        let child_depth = searcher.depth_convention().below_root(max_depth);

        let mut best_move = moves[0];
        let mut best_value = if maximizing {
            Score::NEG_INFINITY
        } else {
            Score::INFINITY
        };
        let mut alpha = Score::NEG_INFINITY;
        let mut beta = Score::INFINITY;
        let mut searched = 0;

        for &mv in &moves {
            if self.budget.is_expired() {
                break;
            }

            let value = {
                let mut child = searcher.play(mv)?;
                child.search(child_depth, alpha, beta, !maximizing)?
            };
            searched += 1;

            let coin: bool = self.rng.gen();
            let improves = if maximizing {
                value > best_value
            } else {
                value < best_value
            };
            if improves || (value == best_value && !coin) {
                best_move = mv;
                best_value = value;
                if maximizing {
                    alpha = alpha.max(value);
                } else {
                    beta = beta.min(value);
                }
            }
            trace!("root move {} scored {}", mv, value);
        }

        let nodes = searcher.stats().nodes;
        if searched == 0 {
            warn!(
                "search budget expired before any root move finished, playing {}",
                best_move
            );
        }
        debug!(
            "chose {} ({}) after {}/{} root moves, {} nodes in {:?}",
            best_move,
            best_value,
            searched,
            moves.len(),
            nodes,
            self.budget.elapsed()
        );

        Ok(SearchOutcome {
            best_move,
            score: best_value,
            nodes,
            completed: searched == moves.len() && !self.budget.is_expired(),
        })
    }
}

/// One-shot search with the standard evaluator and a fresh entropy-seeded RNG.
pub fn find_best_move<B: RulesEngine + ?Sized>(
    board: &mut B,
    max_depth: u8,
    max_thinking_time: Option<Duration>,
    weights: EvaluationWeights,
) -> Result<Move, SearchError> {
    let config = SearchConfig::new(max_depth)
        .with_max_thinking_time(max_thinking_time)
        .with_weights(weights);
    ChessAI::new(config).find_best_move(board)
}
