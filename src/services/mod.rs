pub mod batch_submitter;
pub mod candidate_resolver;
pub mod challenge_gate;
pub mod result_extractor;
pub mod set_store;

pub use batch_submitter::{BatchSubmitter, SubmitTiming};
pub use challenge_gate::ChallengeGate;
pub use result_extractor::ResultExtractor;
