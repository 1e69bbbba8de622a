// File: prizebot-core/src/test_utils/surface.rs

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use prizebot_common::Error;

use crate::giveaway::surface::{GiveawayCard, GiveawaySurface, Reaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Publish { channel_id: String, message_id: String, card: GiveawayCard },
    Update { channel_id: String, message_id: String, card: GiveawayCard },
    Delete { channel_id: String, message_id: String },
    OpenThread { channel_id: String, message_id: String, name: String, thread_id: String },
    Post { channel_id: String, content: String },
    ArchiveThread { thread_id: String },
    React { channel_id: String, message_id: String, reaction: Reaction },
    ReplyTransient { channel_id: String, message_id: String, content: String },
}

/// Operations a `RecordingSurface` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceOp {
    Publish,
    Update,
    Delete,
    OpenThread,
    Post,
    ArchiveThread,
    React,
    ReplyTransient,
}

/// Records every call and hands out ids `msg-N` / `thread-N`. Failed calls
/// are not recorded.
#[derive(Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
    failing: Mutex<HashSet<SurfaceOp>>,
    next_id: AtomicU64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: SurfaceOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self, op: SurfaceOp) {
        self.failing.lock().unwrap().remove(&op);
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// The most recent card shown for `message_id`, published or updated.
    pub fn last_card(&self, message_id: &str) -> Option<GiveawayCard> {
        self.calls().into_iter().rev().find_map(|c| match c {
            SurfaceCall::Publish { message_id: m, card, .. }
            | SurfaceCall::Update { message_id: m, card, .. }
                if m == message_id =>
            {
                Some(card)
            }
            _ => None,
        })
    }

    pub fn posts_in(&self, channel_id: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::Post { channel_id: ch, content } if ch == channel_id => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn reactions_on(&self, message_id: &str) -> Vec<Reaction> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SurfaceCall::React { message_id: m, reaction, .. } if m == message_id => Some(reaction),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn check(&self, op: SurfaceOp) -> Result<(), Error> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(Error::Platform(format!("{op:?} failed")));
        }
        Ok(())
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl GiveawaySurface for RecordingSurface {
    async fn publish(&self, channel_id: &str, card: &GiveawayCard) -> Result<String, Error> {
        self.check(SurfaceOp::Publish)?;
        let message_id = self.next("msg");
        self.record(SurfaceCall::Publish {
            channel_id: channel_id.into(),
            message_id: message_id.clone(),
            card: card.clone(),
        });
        Ok(message_id)
    }

    async fn update(&self, channel_id: &str, message_id: &str, card: &GiveawayCard) -> Result<(), Error> {
        self.check(SurfaceOp::Update)?;
        self.record(SurfaceCall::Update {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            card: card.clone(),
        });
        Ok(())
    }

    async fn delete(&self, channel_id: &str, message_id: &str) -> Result<(), Error> {
        self.check(SurfaceOp::Delete)?;
        self.record(SurfaceCall::Delete { channel_id: channel_id.into(), message_id: message_id.into() });
        Ok(())
    }

    async fn open_thread(&self, channel_id: &str, message_id: &str, name: &str) -> Result<String, Error> {
        self.check(SurfaceOp::OpenThread)?;
        let thread_id = self.next("thread");
        self.record(SurfaceCall::OpenThread {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            name: name.into(),
            thread_id: thread_id.clone(),
        });
        Ok(thread_id)
    }

    async fn post(&self, channel_id: &str, content: &str) -> Result<String, Error> {
        self.check(SurfaceOp::Post)?;
        self.record(SurfaceCall::Post { channel_id: channel_id.into(), content: content.into() });
        Ok(self.next("msg"))
    }

    async fn archive_thread(&self, thread_id: &str) -> Result<(), Error> {
        self.check(SurfaceOp::ArchiveThread)?;
        self.record(SurfaceCall::ArchiveThread { thread_id: thread_id.into() });
        Ok(())
    }

    async fn react(&self, channel_id: &str, message_id: &str, reaction: Reaction) -> Result<(), Error> {
        self.check(SurfaceOp::React)?;
        self.record(SurfaceCall::React {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            reaction,
        });
        Ok(())
    }

    async fn reply_transient(
        &self,
        channel_id: &str,
        message_id: &str,
        content: &str,
        _ttl: Duration,
    ) -> Result<(), Error> {
        self.check(SurfaceOp::ReplyTransient)?;
        self.record(SurfaceCall::ReplyTransient {
            channel_id: channel_id.into(),
            message_id: message_id.into(),
            content: content.into(),
        });
        Ok(())
    }
}
