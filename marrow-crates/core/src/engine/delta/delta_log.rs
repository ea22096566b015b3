use crate::basic_types::Cause;

/// A value removed from a domain, together with the cause of its removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub value: i32,
    pub cause: Option<Cause>,
}

/// The removals of one variable since the log was last cleared.
///
/// The log is tied to the timestamp of the reversible store: once a world is pushed or popped its
/// content is stale and it is emptied on the next write. Every clear starts a new generation so
/// that readers can tell their cursor apart from the current content. Generations are never
/// handed out twice, also not across [`DeltaLog::stash`] and [`DeltaLog::restore`].
#[derive(Debug, Clone)]
pub(crate) struct DeltaLog {
    removals: Vec<Removal>,
    timestamp: u64,
    generation: u64,
    next_generation: u64,
}

impl DeltaLog {
    pub(crate) fn new(timestamp: u64) -> DeltaLog {
        DeltaLog {
            removals: Vec::new(),
            timestamp,
            generation: 0,
            next_generation: 1,
        }
    }

    pub(crate) fn add(&mut self, removal: Removal, timestamp: u64) {
        if self.timestamp != timestamp {
            self.clear();
            self.timestamp = timestamp;
        }
        self.removals.push(removal);
    }

    pub(crate) fn clear(&mut self) {
        self.removals.clear();
        self.generation = self.next_generation;
        self.next_generation += 1;
    }

    /// Installs an empty log in a fresh generation and returns the current one.
    pub(crate) fn stash(&mut self) -> DeltaLog {
        let empty = DeltaLog {
            removals: Vec::new(),
            timestamp: self.timestamp,
            generation: self.next_generation,
            next_generation: self.next_generation + 1,
        };
        std::mem::replace(self, empty)
    }

    /// Puts back a log returned by [`DeltaLog::stash`] while the store was at `stashed_at`.
    ///
    /// If it was readable then, its removals are readable again at `timestamp`.
    pub(crate) fn restore(&mut self, mut stashed: DeltaLog, stashed_at: u64, timestamp: u64) {
        if stashed.timestamp == stashed_at {
            stashed.timestamp = timestamp;
        }
        stashed.next_generation = stashed.next_generation.max(self.next_generation);
        *self = stashed;
    }

    /// The removals readable at `timestamp`, along with the generation they belong to.
    pub(crate) fn visible(&self, timestamp: u64) -> (u64, &[Removal]) {
        if self.timestamp == timestamp {
            (self.generation, &self.removals)
        } else {
            // The next write clears the log, which moves it to the next generation.
            (self.next_generation, &[])
        }
    }
}

/// Appends the removals of a single mutation to the log of the mutated variable, if it has one.
#[derive(Debug)]
pub(crate) struct DeltaRecorder<'a> {
    log: Option<&'a mut DeltaLog>,
    cause: Option<Cause>,
    timestamp: u64,
}

impl<'a> DeltaRecorder<'a> {
    pub(crate) fn new(
        log: Option<&'a mut DeltaLog>,
        cause: Option<Cause>,
        timestamp: u64,
    ) -> DeltaRecorder<'a> {
        DeltaRecorder {
            log,
            cause,
            timestamp,
        }
    }

    /// Whether removed values need to be enumerated at all.
    pub(crate) fn is_active(&self) -> bool {
        self.log.is_some()
    }

    pub(crate) fn record(&mut self, value: i32) {
        if let Some(log) = self.log.as_mut() {
            log.add(
                Removal {
                    value,
                    cause: self.cause,
                },
                self.timestamp,
            );
        }
    }
}
