//! Injectable node-id generation strategies.
//!
//! Id generation is a strategy, not a global: mutation operations that mint
//! ids take a generator argument, so tests can supply a counter-based one
//! instead of random ids.

use crate::graph::NodeId;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated node ids.
const ID_LENGTH: usize = 10;

pub trait IdGenerator {
    fn generate(&mut self) -> NodeId;
}

/// Production default: random 10-character alphanumeric ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate(&mut self) -> NodeId {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Deterministic counter-based ids for tests: "n1", "n2", ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        SequentialIds {
            prefix: prefix.to_string(),
            next: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn generate(&mut self) -> NodeId {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }
}
