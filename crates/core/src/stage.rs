use std::collections::BTreeMap;
use std::time::Duration;

use folio_protocol::TypewriterFrame;

use crate::config::TypewriterConfig;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::typewriter::{CursorBlink, Typewriter, TypewriterState};

/// Identifies one mounted typewriter within a [`Stage`].
pub type InstanceId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Tick,
    Blink,
}

#[derive(Debug)]
struct Mounted {
    typewriter: Typewriter,
    cursor: CursorBlink,
    tick: Option<TaskHandle>,
    blink: Option<TaskHandle>,
}

/// Root context for every animated typewriter on a page.
///
/// Owns the scheduler all instances share. Each instance has at most one
/// pending tick and one pending blink; unmounting cancels both before the
/// instance is dropped, so nothing fires for it afterwards.
#[derive(Debug, Default)]
pub struct Stage {
    scheduler: Scheduler<(InstanceId, Job)>,
    instances: BTreeMap<InstanceId, Mounted>,
    next_id: InstanceId,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn mount(&mut self, config: TypewriterConfig) -> InstanceId {
        let id = self.next_id;
        self.next_id += 1;

        let typewriter = Typewriter::new(config);
        let cursor = CursorBlink::from_config(typewriter.config());
        let tick = typewriter
            .next_delay()
            .map(|delay| self.scheduler.schedule(delay, (id, Job::Tick)));
        let blink = cursor
            .interval()
            .map(|every| self.scheduler.schedule(every, (id, Job::Blink)));

        tracing::debug!(
            id,
            phrases = typewriter.config().phrases.len(),
            "mounted typewriter"
        );
        self.instances.insert(
            id,
            Mounted {
                typewriter,
                cursor,
                tick,
                blink,
            },
        );
        id
    }

    /// Tear down an instance. Returns `false` for an unknown id.
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        let Some(mounted) = self.instances.remove(&id) else {
            return false;
        };
        for handle in [mounted.tick, mounted.blink].into_iter().flatten() {
            self.scheduler.cancel(handle);
        }
        tracing::debug!(id, "unmounted typewriter");
        true
    }

    /// Replace an instance's configuration, restarting it from the first
    /// phrase. The old tick is cancelled so it can't act on the new phrases.
    pub fn reconfigure(&mut self, id: InstanceId, config: TypewriterConfig) -> bool {
        let Some(mounted) = self.instances.get_mut(&id) else {
            return false;
        };
        for handle in [mounted.tick.take(), mounted.blink.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }

        mounted.typewriter.reconfigure(config);
        mounted.cursor = CursorBlink::from_config(mounted.typewriter.config());
        mounted.tick = mounted
            .typewriter
            .next_delay()
            .map(|delay| self.scheduler.schedule(delay, (id, Job::Tick)));
        mounted.blink = mounted
            .cursor
            .interval()
            .map(|every| self.scheduler.schedule(every, (id, Job::Blink)));

        tracing::debug!(id, "reconfigured typewriter");
        true
    }

    pub fn frame(&self, id: InstanceId) -> Option<TypewriterFrame> {
        self.instances
            .get(&id)
            .map(|m| m.typewriter.frame(&m.cursor))
    }

    pub fn state(&self, id: InstanceId) -> Option<TypewriterState> {
        self.instances.get(&id).map(|m| m.typewriter.state())
    }

    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Fire every task due by `now`, in deadline order. Returns the number of
    /// state mutations (ticks and blinks) applied.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut mutations = 0;
        while let Some((handle, (id, job))) = self.scheduler.pop_due(now) {
            let Some(mounted) = self.instances.get_mut(&id) else {
                continue;
            };
            match job {
                Job::Tick => {
                    if mounted.tick != Some(handle) {
                        continue;
                    }
                    mounted.tick = None;
                    if mounted.typewriter.tick() {
                        mutations += 1;
                    }
                    // Armed only after the mutation, so ticks never overlap.
                    mounted.tick = mounted
                        .typewriter
                        .next_delay()
                        .map(|delay| self.scheduler.schedule(delay, (id, Job::Tick)));
                }
                Job::Blink => {
                    if mounted.blink != Some(handle) {
                        continue;
                    }
                    mounted.cursor.toggle();
                    mutations += 1;
                    mounted.blink = mounted
                        .cursor
                        .interval()
                        .map(|every| self.scheduler.schedule(every, (id, Job::Blink)));
                }
            }
        }
        self.scheduler.advance_to(now);
        mutations
    }

    pub fn advance_by(&mut self, elapsed: Duration) -> usize {
        let target = self.now() + elapsed;
        self.advance_to(target)
    }
}
