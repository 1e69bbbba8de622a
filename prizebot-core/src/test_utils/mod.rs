// File: prizebot-core/src/test_utils/mod.rs
//
// Fakes and database helpers shared by unit and integration tests.

pub mod helpers;
pub mod memory;
pub mod surface;

use std::sync::Arc;

pub use memory::InMemoryGiveawayStore;
pub use surface::{RecordingSurface, SurfaceCall, SurfaceOp};
pub use crate::utils::time::ManualClock;

use crate::giveaway::{GiveawayEngine, GiveawayPolicy};

/// An engine wired to an in-memory store, a recording surface and a manual
/// clock, with handles to all three.
pub struct TestRig {
    pub engine: Arc<GiveawayEngine>,
    pub store: Arc<InMemoryGiveawayStore>,
    pub surface: Arc<RecordingSurface>,
    pub clock: ManualClock,
}

impl TestRig {
    pub fn new(start_ms: i64) -> Self {
        Self::with_policy(start_ms, GiveawayPolicy::default())
    }

    pub fn with_policy(start_ms: i64, policy: GiveawayPolicy) -> Self {
        let store = Arc::new(InMemoryGiveawayStore::new());
        let surface = Arc::new(RecordingSurface::new());
        let clock = ManualClock::new(start_ms);
        let engine = Arc::new(GiveawayEngine::new(
            store.clone(),
            store.clone(),
            surface.clone(),
            Arc::new(clock.clone()),
            policy,
        ));
        Self { engine, store, surface, clock }
    }
}
