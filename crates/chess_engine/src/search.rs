//! Depth-bounded minimax with alpha-beta pruning.
//!
//! One recursive routine serves both the board-scan and the bitboard
//! evaluators. The two ways they differ are carried as explicit parameters:
//! [`ClockCheck`] decides whether interior nodes poll the budget and
//! [`DepthConvention`] decides which way the depth counter runs.

use std::ops::{Deref, DerefMut};

use chess_core::Move;
use log::error;

use crate::{
    bitboard::BitboardEvaluator,
    budget::SearchBudget,
    config::{SearchConfig, SearchVariant},
    error::SearchError,
    evaluation::{evaluate_position, EvaluationWeights, Score},
    rules::RulesEngine,
};

/// Leaf scoring strategy.
#[derive(Debug, Clone)]
pub enum Evaluator {
    BoardScan(EvaluationWeights),
    Bitboard(BitboardEvaluator),
}

impl Evaluator {
    pub fn for_config<B: RulesEngine + ?Sized>(board: &B, config: &SearchConfig) -> Self {
        match config.variant {
            SearchVariant::Standard => Evaluator::BoardScan(config.weights),
            SearchVariant::BitboardAccelerated => {
                Evaluator::Bitboard(BitboardEvaluator::new(board, config.weights))
            }
        }
    }

    pub fn evaluate<B: RulesEngine + ?Sized>(&self, board: &B) -> Score {
        match self {
            Evaluator::BoardScan(weights) => evaluate_position(board, weights),
            Evaluator::Bitboard(bitboards) => bitboards.evaluate(board),
        }
    }

    fn after_apply<B: RulesEngine + ?Sized>(&mut self, board: &B, mv: Move) {
        if let Evaluator::Bitboard(bitboards) = self {
            bitboards.after_apply(board, mv);
        }
    }

    fn after_undo<B: RulesEngine + ?Sized>(&mut self, board: &B, mv: Move) {
        if let Evaluator::Bitboard(bitboards) = self {
            bitboards.after_undo(board, mv);
        }
    }
}

/// Where the search polls the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockCheck {
    /// Before every move at every node, root included.
    EveryNode,
    /// Only in the root loop. A deep subtree can overrun the budget.
    RootOnly,
}

/// How the depth argument of [`Searcher::search`] is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthConvention {
    /// Remaining plies; the horizon is zero.
    Countdown,
    /// Plies from the root; the horizon is `max_depth`.
    CountUp { max_depth: u8 },
}

impl DepthConvention {
    pub fn at_horizon(self, depth: u8) -> bool {
        match self {
            DepthConvention::Countdown => depth == 0,
            DepthConvention::CountUp { max_depth } => depth >= max_depth,
        }
    }

    pub fn child(self, depth: u8) -> u8 {
        match self {
            DepthConvention::Countdown => depth.saturating_sub(1),
            DepthConvention::CountUp { .. } => depth + 1,
        }
    }

    /// Depth argument for the children of the root of a `max_depth` search.
    pub fn below_root(self, max_depth: u8) -> u8 {
        match self {
            DepthConvention::Countdown => max_depth.saturating_sub(1),
            DepthConvention::CountUp { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pruning {
    AlphaBeta,
    /// Plain minimax over the same move order, for comparison.
    Disabled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Calls to [`Searcher::search`], leaves included.
    pub nodes: u64,
}

/// Owns exclusive access to the position for the duration of one search.
pub struct Searcher<'a, B: RulesEngine + ?Sized> {
    board: &'a mut B,
    evaluator: Evaluator,
    budget: SearchBudget,
    clock_check: ClockCheck,
    depth_convention: DepthConvention,
    pruning: Pruning,
    stats: SearchStats,
}

impl<'a, B: RulesEngine + ?Sized> Searcher<'a, B> {
    pub fn new(board: &'a mut B, config: &SearchConfig, budget: SearchBudget) -> Self {
        let evaluator = Evaluator::for_config(&*board, config);
        Self {
            board,
            evaluator,
            budget,
            clock_check: config.clock_check,
            depth_convention: config.depth_convention(),
            pruning: config.pruning,
            stats: SearchStats::default(),
        }
    }

    pub fn board(&self) -> &B {
        &*self.board
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn depth_convention(&self) -> DepthConvention {
        self.depth_convention
    }

    pub fn evaluate(&self) -> Score {
        self.evaluator.evaluate(&*self.board)
    }

    /// Applies `mv` and hands back a guard that undoes it when dropped.
    pub fn play(&mut self, mv: Move) -> Result<AppliedMove<'_, 'a, B>, SearchError> {
        self.board.apply(mv)?;
        self.evaluator.after_apply(&*self.board, mv);
        Ok(AppliedMove { searcher: self, mv })
    }

    /// Minimax value of the current position, White maximizing.
    ///
    /// When the budget runs out mid-loop the extremum gathered so far is
    /// returned as is, which is `-inf`/`+inf` if no child finished.
    pub fn search(
        &mut self,
        depth: u8,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Result<Score, SearchError> {
        self.stats.nodes += 1;

        if self.depth_convention.at_horizon(depth) || self.board.status().is_over() {
            return Ok(self.evaluate());
        }

        let moves = self.board.legal_moves();
        assert!(
            !moves.is_empty(),
            "rules engine reported an ongoing position without legal moves"
        );

        let child_depth = self.depth_convention.child(depth);
        let mut best = if maximizing {
            Score::NEG_INFINITY
        } else {
            Score::INFINITY
        };

        for mv in moves {
            if self.clock_check == ClockCheck::EveryNode && self.budget.is_expired() {
                break;
            }

            let value = {
                let mut child = self.play(mv)?;
                child.search(child_depth, alpha, beta, !maximizing)?
            };

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }

            if self.pruning == Pruning::AlphaBeta && beta <= alpha {
                break;
            }
        }

        Ok(best)
    }
}

/// A move applied to the searcher's position, taken back on drop.
///
/// Every exit path (normal return, `?`, unwinding) restores the position.
pub struct AppliedMove<'s, 'a, B: RulesEngine + ?Sized> {
    searcher: &'s mut Searcher<'a, B>,
    mv: Move,
}

impl<'s, 'a, B: RulesEngine + ?Sized> AppliedMove<'s, 'a, B> {
    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl<'s, 'a, B: RulesEngine + ?Sized> Deref for AppliedMove<'s, 'a, B> {
    type Target = Searcher<'a, B>;

    fn deref(&self) -> &Self::Target {
        &*self.searcher
    }
}

impl<'s, 'a, B: RulesEngine + ?Sized> DerefMut for AppliedMove<'s, 'a, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.searcher
    }
}

impl<'s, 'a, B: RulesEngine + ?Sized> Drop for AppliedMove<'s, 'a, B> {
    fn drop(&mut self) {
        let searcher = &mut *self.searcher;
        if let Err(err) = searcher.board.undo(self.mv) {
            error!("failed to take back {}: {}", self.mv, err);
            if !std::thread::panicking() {
                debug_assert!(false, "unpaired undo of {}: {}", self.mv, err);
            }
        }
        searcher.evaluator.after_undo(&*searcher.board, self.mv);
    }
}
