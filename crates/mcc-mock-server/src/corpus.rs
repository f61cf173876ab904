//! Canned snippets and seeded selection.
//!
//! The endpoint ignores the requested language and picks uniformly from a
//! small mixed corpus. Selection uses a seeded PRNG (Xoshiro256**) so a run
//! can be reproduced from its seed.

use std::sync::Mutex;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// A canned snippet with the language it is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSnippet {
    pub language: &'static str,
    pub code: &'static str,
}

/// The fixed corpus served by `POST /generate`.
pub const CORPUS: [MockSnippet; 5] = [
    MockSnippet {
        language: "javascript",
        code: include_str!("../corpus/react_counter.js"),
    },
    MockSnippet {
        language: "python",
        code: include_str!("../corpus/fibonacci.py"),
    },
    MockSnippet {
        language: "javascript",
        code: include_str!("../corpus/express_api.js"),
    },
    MockSnippet {
        language: "python",
        code: include_str!("../corpus/bank_account.py"),
    },
    MockSnippet {
        language: "javascript",
        code: include_str!("../corpus/fetch_user.js"),
    },
];

/// Seeded, thread-safe index picker.
///
/// Given the same seed, yields the same sequence of picks.
pub struct SnippetPicker {
    seed: u64,
    rng: Mutex<Xoshiro256StarStar>,
}

impl SnippetPicker {
    /// Create a picker with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(Xoshiro256StarStar::seed_from_u64(seed)),
        }
    }

    /// Create a picker with a random seed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Get the seed used to create this picker.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Pick an index in `0..len`.
    pub fn pick_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "Cannot pick from an empty corpus");
        // Picks never leave the PRNG half-updated, so a poisoned lock is reusable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }

    /// Pick a snippet from [`CORPUS`].
    pub fn pick(&self) -> &'static MockSnippet {
        &CORPUS[self.pick_index(CORPUS.len())]
    }
}
