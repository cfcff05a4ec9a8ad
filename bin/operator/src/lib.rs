//! Library surface of the operator binary: CLI definition and startup
//! plumbing, kept separate from `main` so the config struct is testable.

pub mod cfg;
