//! Query operations: authenticate, run one command, classify the result.

mod classify;
mod client;

pub use classify::{
    classify, Classified, RawOutput, StderrPolicy, ENCODING_MARKERS, NO_SUCH_CHANGELIST,
    TRUST_HINT, TRUST_MARKERS,
};
pub use client::P4Client;
