//! Serving core: validation, scoring, and ranking against a shared classifier

pub mod classifier;
pub mod rank;
pub mod score;
pub mod validate;

pub use classifier::{Classifier, LogisticModel};
pub use rank::{average_ranks_desc, score_batch};
pub use score::{score_one, score_record, Score, ScoreError, HABITABILITY_THRESHOLD};
pub use validate::{validate_input, Validation};
