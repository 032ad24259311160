use std::time::Duration;

use crate::{
    evaluation::EvaluationWeights,
    search::{ClockCheck, DepthConvention, Pruning},
};

pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(3);
pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 8;
pub const DEFAULT_DEPTH: u8 = MIN_DEPTH + 3;

/// Which leaf evaluator drives the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchVariant {
    /// Scans the board at every leaf; depth counts down to zero.
    Standard,
    /// Incremental bitboards; depth counts up from the root ply.
    BitboardAccelerated,
}

impl SearchVariant {
    pub fn default_clock_check(self) -> ClockCheck {
        match self {
            SearchVariant::Standard => ClockCheck::EveryNode,
            SearchVariant::BitboardAccelerated => ClockCheck::RootOnly,
        }
    }
}

/// Everything fixed for the lifetime of one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub max_thinking_time: Option<Duration>,
    pub weights: EvaluationWeights,
    pub variant: SearchVariant,
    pub clock_check: ClockCheck,
    pub pruning: Pruning,
}

impl SearchConfig {
    pub fn new(max_depth: u8) -> Self {
        Self::with_variant(max_depth, SearchVariant::Standard)
    }

    pub fn bitboard(max_depth: u8) -> Self {
        Self::with_variant(max_depth, SearchVariant::BitboardAccelerated)
    }

    fn with_variant(max_depth: u8, variant: SearchVariant) -> Self {
        Self {
            max_depth: max_depth.clamp(MIN_DEPTH, MAX_DEPTH),
            max_thinking_time: Some(DEFAULT_THINK_TIME),
            weights: EvaluationWeights::default(),
            variant,
            clock_check: variant.default_clock_check(),
            pruning: Pruning::AlphaBeta,
        }
    }

    pub fn with_max_thinking_time(mut self, max_thinking_time: Option<Duration>) -> Self {
        self.max_thinking_time = max_thinking_time;
        self
    }

    pub fn with_weights(mut self, weights: EvaluationWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_clock_check(mut self, clock_check: ClockCheck) -> Self {
        self.clock_check = clock_check;
        self
    }

    pub fn with_pruning(mut self, pruning: Pruning) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn depth_convention(&self) -> DepthConvention {
        match self.variant {
            SearchVariant::Standard => DepthConvention::Countdown,
            SearchVariant::BitboardAccelerated => DepthConvention::CountUp {
                max_depth: self.max_depth,
            },
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}
