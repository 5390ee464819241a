//! Resume tailoring core: keyword handling, section rewriting,
//! verification and orchestration

pub mod extractor;
pub mod infuser;
pub mod keywords;
pub mod normalizer;
pub mod pipeline;
pub mod sections;
pub mod statistical;
pub mod tailor;
pub mod verifier;
