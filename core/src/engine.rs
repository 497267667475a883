use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Running (on start)
/// - Running -> Running (restart)
/// - Running -> Idle (countdown finished)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Running,
}

impl SessionState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Outcome of adjudicating one activation event.
///
/// A miss is a normal outcome, not an error, so every variant is a plain
/// non-scoring answer except `Scored`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Mole was up and the event was trusted; score went up by one.
    Scored,
    /// The targeted cell had no mole up.
    MoleDown,
    /// Synthetic or programmatic activation, silently ignored.
    Untrusted,
    /// Nonexistent cell id, a no-op.
    OutOfBounds,
    /// Session is not running; the final score stays frozen.
    SessionOver,
}

impl HitOutcome {
    pub const fn scored(self) -> bool {
        matches!(self, Self::Scored)
    }

    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Scored)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ActiveMole {
    cell: CellId,
    hide_task: TaskId,
}

/// One timed play-through: board, score, countdown, and every outstanding
/// deferred action, advanced by explicit timestamps.
///
/// Hosts call [`GameSession::advance_to`] with the current session time and
/// re-arm a single platform timer at [`GameSession::next_wakeup`]. All
/// mutation happens inside those calls, so ordering is deterministic and
/// stopping the session cancels every pending continuation in one place.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    queue: TaskQueue,
    scheduler: MoleScheduler,
    countdown: Option<Countdown>,
    active: Option<ActiveMole>,
    score: u32,
    state: SessionState,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            board: Board::new(config.cell_count),
            queue: TaskQueue::new(),
            scheduler: MoleScheduler::new(config.cadence, seed),
            countdown: None,
            active: None,
            score: 0,
            state: Default::default(),
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn cell_count(&self) -> CellCount {
        self.board.cell_count()
    }

    pub fn is_mole_up(&self, cell: CellId) -> Result<bool> {
        self.board.is_mole_up(cell)
    }

    pub fn active_mole(&self) -> Option<CellId> {
        self.active.map(|active| active.cell)
    }

    /// Milliseconds left; full duration before the first start, 0 after the
    /// countdown expires.
    pub fn remaining_ms(&self) -> Millis {
        self.countdown
            .map_or(self.config.duration, |countdown| countdown.remaining_ms())
    }

    /// Countdown text value: whole seconds, rounded up.
    ///
    /// Before the first start this shows the configured duration.
    pub fn display_secs(&self) -> u32 {
        self.countdown.map_or(
            self.config.duration.div_ceil(1000) as u32,
            |countdown| countdown.display_secs(),
        )
    }

    /// Deadline of the next pending task, for hosts that sleep between calls
    /// to [`GameSession::advance_to`].
    pub fn next_wakeup(&self) -> Option<Millis> {
        self.queue.next_due()
    }

    /// Starts a fresh session at `now`.
    ///
    /// Always a full reset: any prior session's score, moles, and pending
    /// tasks are dropped first, so calling this mid-game restarts instead of
    /// double-scheduling.
    pub fn start(&mut self, now: Millis) {
        if self.state.is_running() {
            log::debug!("restarting a running session");
        }
        self.queue.clear();
        self.board.clear_all();
        self.active = None;
        self.score = 0;
        self.state = SessionState::Running;
        self.countdown = Some(Countdown::start(now, self.config.duration));

        // The finish task is scheduled before any pop-up, so its lower id wins
        // deadline ties against pop-ups that land exactly on the end of game.
        self.queue
            .schedule(now + TICK_INTERVAL, TaskOwner::Countdown, Task::Tick);
        self.queue
            .schedule(now + self.config.duration, TaskOwner::Countdown, Task::Finish);
        self.queue.schedule(
            now + self.config.duration + SAFETY_STOP_SLACK,
            TaskOwner::Countdown,
            Task::SafetyStop,
        );
        let delay = self.scheduler.next_popup_delay();
        self.queue
            .schedule(now + delay, TaskOwner::Scheduler, Task::PopUp);
        log::debug!(
            "session started at {}, duration {}ms, first pop-up in {}ms",
            now,
            self.config.duration,
            delay
        );
    }

    /// Runs every task due at or before `now`, in deterministic order.
    ///
    /// Returns whether any observable state changed.
    pub fn advance_to(&mut self, now: Millis) -> bool {
        let mut updated = false;
        while let Some(entry) = self.queue.pop_due(now) {
            updated |= self.run_task(entry);
        }
        updated
    }

    fn run_task(&mut self, entry: ScheduledTask) -> bool {
        match entry.task {
            Task::PopUp => self.pop_up(entry.due_at),
            Task::HideMole(cell) => self.hide_mole(cell),
            Task::Tick => self.tick(entry.due_at),
            Task::Finish => self.finish(),
            Task::SafetyStop => self.finish(),
        }
    }

    fn pop_up(&mut self, due_at: Millis) -> bool {
        if !self.state.is_running() {
            return false;
        }

        // one mole at a time; if the previous one is still up, just try again
        // after the next random delay
        let raised = if self.active.is_none() {
            let cell = self.scheduler.pick_cell(self.board.cell_count());
            self.board[cell] = true;
            let hide_task = self.queue.schedule(
                due_at + self.scheduler.cadence().visible_duration,
                TaskOwner::Scheduler,
                Task::HideMole(cell),
            );
            self.active = Some(ActiveMole { cell, hide_task });
            log::debug!("mole up at hole {}", display_index(cell));
            true
        } else {
            false
        };

        let delay = self.scheduler.next_popup_delay();
        self.queue
            .schedule(due_at + delay, TaskOwner::Scheduler, Task::PopUp);
        raised
    }

    fn hide_mole(&mut self, cell: CellId) -> bool {
        match self.active.take_if(|active| active.cell == cell) {
            Some(_) if self.board[cell] => {
                self.board[cell] = false;
                log::trace!("mole down at hole {}", display_index(cell));
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, due_at: Millis) -> bool {
        let Some(mut countdown) = self.countdown else {
            return false;
        };
        let prev_secs = countdown.display_secs();
        countdown.update(due_at);
        self.countdown = Some(countdown);

        if countdown.is_finished() {
            self.finish()
        } else {
            self.queue
                .schedule(due_at + TICK_INTERVAL, TaskOwner::Countdown, Task::Tick);
            countdown.display_secs() != prev_secs
        }
    }

    /// Ends the session exactly once; every later finish or safety stop is a
    /// no-op.
    fn finish(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = SessionState::Idle;
        // stop effects win over any late pop-up: nothing may touch the board
        // once the session is over
        self.queue.clear();
        self.active = None;
        self.board.clear_all();
        if let Some(countdown) = &mut self.countdown {
            countdown.expire();
        }
        log::debug!("session ended, final score {}", self.score);
        true
    }

    /// Adjudicates one activation event on a hole.
    ///
    /// Scores iff the event is trusted, the session is running, and the
    /// targeted cell's mole is up; scoring clears the mole immediately so the
    /// same up-period can never score twice.
    pub fn whack(&mut self, cell: CellId, trusted: bool) -> HitOutcome {
        use HitOutcome::*;

        if !trusted {
            log::debug!("ignoring untrusted activation on cell {}", cell);
            return Untrusted;
        }
        if !self.state.is_running() {
            return SessionOver;
        }
        let Ok(cell) = self.board.validate_cell(cell) else {
            return OutOfBounds;
        };
        if !self.board[cell] {
            return MoleDown;
        }

        self.board[cell] = false;
        if let Some(active) = self.active.take_if(|active| active.cell == cell) {
            self.queue.cancel(active.hide_task);
        }
        self.score += 1;
        log::debug!("hole {} whacked, score {}", display_index(cell), self.score);
        Scored
    }
}
