mod engine;

pub use engine::{RecommendationEngine, RecommenderConfig, ScoringWeights};
