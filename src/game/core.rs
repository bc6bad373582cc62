use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::config::{GamePrefs, Labels, PairDescriptor, RosterArrangement};
use crate::error::{GameError, Result};
use crate::focus::{self, NavCommand};
use crate::item::{Item, ItemId};
use crate::layout::{GridScaler, GridSpec};
use crate::logging::{event_with_fields, json_kv, LogLevel, Logger};
use crate::metrics::{GameMetrics, MetricSnapshot};
use crate::popup::{FeedbackPopup, FeedbackRequest, NullPopup};
use crate::queue::UnselectQueue;
use crate::scheduler::{GameTask, TaskScheduler};
use crate::timer::{SessionTimer, Timer};

use super::counter::TurnCounter;

const LOG_TARGET: &str = "matchgrid::game";

/// Notifications the game pushes at its host, drained with
/// [`Game::take_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The game was attached to its presentation surface.
    Attached,
    /// The player did something; hosts can report activity on this.
    Interacted,
    /// A face was turned over.
    Selected { item: ItemId },
    /// An item's announcement label should be re-read to the player.
    Announced { item: ItemId },
    /// A pair was found and removed from play.
    MatchFound { first: ItemId, second: ItemId },
    /// Two faces did not match; they stay revealed until the next drain.
    Mismatch { first: ItemId, second: ItemId },
    /// A queued mismatched pair was turned back over.
    PairUnselected { first: ItemId, second: ItemId },
    /// A matched pair carries feedback; the popup collaborator should show it.
    FeedbackRequested(FeedbackRequest),
    /// All pairs found. Fired exactly once per game instance.
    Completed {
        score: u32,
        max_score: u32,
        duration_secs: f64,
    },
    /// Completion happened and retry is configured; hosts may offer a reset.
    RetryAvailable,
    /// The grid geometry changed.
    LayoutChanged { cols: usize, font_size: f64 },
    /// Keyboard focus moved to another item.
    FocusMoved { item: ItemId },
    /// The roster order changed after a reset.
    RosterReshuffled,
}

/// State carried from a feedback popup being opened to its dismissal.
#[derive(Debug, Clone, Copy)]
struct PopupFollowUp {
    item: ItemId,
    finish: bool,
}

/// The pair-matching game: owns the roster and counters, resolves
/// selections into matches and mismatches, tracks focus, and drives the
/// grid scaler. All state transitions happen on the caller's thread in
/// response to discrete events; waits are scheduled continuations released
/// through [`Game::advance`].
pub struct Game {
    roster: Vec<Item>,
    cursor: Option<ItemId>,
    queue: UnselectQueue,
    scheduler: TaskScheduler,
    scaler: GridScaler,
    grid: Option<GridSpec>,
    last_width: Option<f64>,
    timer: Box<dyn Timer>,
    popup: Box<dyn FeedbackPopup>,
    popup_open: bool,
    pending_popup: Option<PopupFollowUp>,
    prefs: GamePrefs,
    labels: Labels,
    num_selected: usize,
    removed: usize,
    turns: TurnCounter,
    finished: bool,
    events: Vec<GameEvent>,
    logger: Option<Logger>,
    metrics: GameMetrics,
    rng: StdRng,
}

impl Game {
    /// Build a game from pair descriptors with default behaviour and labels.
    ///
    /// Invalid descriptors are skipped silently; a configuration with no
    /// valid pair yields an inert, already-empty game rather than an error.
    pub fn new(descriptors: &[PairDescriptor]) -> Self {
        Self::configured(descriptors, GamePrefs::default(), Labels::default())
    }

    pub fn configured(descriptors: &[PairDescriptor], prefs: GamePrefs, labels: Labels) -> Self {
        let mut rng = match prefs.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut roster = Vec::new();
        for descriptor in descriptors {
            if !descriptor.is_valid() {
                continue;
            }
            let (Some(face), Some(partner_face)) = (&descriptor.face, &descriptor.partner) else {
                continue;
            };
            let a = ItemId(roster.len());
            let b = ItemId(roster.len() + 1);
            roster.push(Item::new(
                a,
                b,
                face.to_payload(),
                descriptor.face_alt.clone(),
                descriptor.feedback.clone(),
            ));
            roster.push(Item::new(
                b,
                a,
                partner_face.to_payload(),
                descriptor.partner_alt.clone(),
                descriptor.feedback.clone(),
            ));
        }
        shuffle_items(&mut roster, prefs.arrangement, &mut rng);

        Self {
            roster,
            cursor: None,
            queue: UnselectQueue::new(),
            scheduler: TaskScheduler::new(),
            scaler: GridScaler::new(),
            grid: None,
            last_width: None,
            timer: Box::new(SessionTimer::new()),
            popup: Box::new(NullPopup),
            popup_open: false,
            pending_popup: None,
            prefs,
            labels,
            num_selected: 0,
            removed: 0,
            turns: TurnCounter::new(),
            finished: false,
            events: Vec::new(),
            logger: None,
            metrics: GameMetrics::new(),
            rng,
        }
    }

    pub fn with_timer(mut self, timer: Box<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn with_popup(mut self, popup: Box<dyn FeedbackPopup>) -> Self {
        self.popup = popup;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Attach the game to its presentation surface: default labels are
    /// written and the first item becomes the tab stop.
    pub fn attach(&mut self) {
        self.push(GameEvent::Attached);
        for pos in 0..self.roster.len() {
            self.roster[pos].update_label(pos + 1, false, true, &self.labels);
        }
        if let Some(first) = self.roster.first_mut() {
            first.make_tabbable();
        }
        self.log(
            LogLevel::Info,
            "game_attached",
            [json_kv("items", json!(self.roster.len()))],
        );
    }

    /// Turn over the face at `index` (display order).
    ///
    /// Re-selecting a revealed face and selecting a removed face are
    /// announce-only no-ops. Everything else follows one round of the match
    /// state machine: first selection is held on the cursor, the second
    /// schedules a comparison after the configured pause.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.roster.len() {
            return Err(GameError::ItemOutOfBounds(index));
        }
        if !self.roster[index].select() {
            let item = self.roster[index].id();
            self.push(GameEvent::Announced { item });
            return Ok(());
        }
        let id = self.roster[index].id();

        // Focus always lands on the face selected last.
        for item in &mut self.roster {
            item.make_untabbable();
        }
        self.roster[index].make_tabbable();

        if self.popup_open {
            self.popup.close();
            self.handle_popup_closed(false);
        }

        self.push(GameEvent::Interacted);
        self.timer.play();
        self.num_selected += 1;
        self.turns.increment();
        self.metrics.record_selection();
        self.push(GameEvent::Selected { item: id });

        // Announce the face unless it is the final one and it is correct.
        let partner = self.roster[index].partner();
        let is_matched = self.cursor == Some(partner);
        let is_last = self.removed + 2 == self.roster.len();
        self.roster[index].update_label(index + 1, is_matched, false, &self.labels);
        if !(is_matched && is_last) {
            self.push(GameEvent::Announced { item: id });
        }

        if let Some(held) = self.cursor.take() {
            self.scheduler.schedule(
                self.prefs.compare_delay(),
                GameTask::Compare {
                    first: id,
                    second: held,
                },
            );
        } else {
            if self.queue.len() > 1 {
                self.drain_pair();
            }
            self.cursor = Some(id);
        }

        self.log(
            LogLevel::Debug,
            "item_selected",
            [
                json_kv("item", json!(id.0)),
                json_kv("num_selected", json!(self.num_selected)),
            ],
        );
        Ok(())
    }

    /// Move the tab stop to `index` and tell the host to focus it.
    pub fn set_focus(&mut self, index: usize) -> Result<()> {
        if index >= self.roster.len() {
            return Err(GameError::ItemOutOfBounds(index));
        }
        for item in &mut self.roster {
            item.make_untabbable();
        }
        self.roster[index].make_tabbable();
        let item = self.roster[index].id();
        self.push(GameEvent::FocusMoved { item });
        Ok(())
    }

    /// Move keyboard focus from the item at `index`. Returns the new focus
    /// position, or `None` when the command runs off the roster bound.
    pub fn navigate(&mut self, index: usize, command: NavCommand) -> Option<usize> {
        let target = match command {
            NavCommand::Next => focus::step(&mut self.roster, index, 1),
            NavCommand::Prev => focus::step(&mut self.roster, index, -1),
            NavCommand::First => focus::edge(&mut self.roster, index, false),
            NavCommand::Last => focus::edge(&mut self.roster, index, true),
        };
        if let Some(pos) = target {
            let item = self.roster[pos].id();
            self.push(GameEvent::FocusMoved { item });
        }
        target
    }

    /// Advance virtual time, releasing due comparisons and relayouts.
    pub fn advance(&mut self, dt: Duration) {
        for task in self.scheduler.advance(dt) {
            match task {
                GameTask::Compare { first, second } => self.resolve_compare(first, second),
                GameTask::RelayoutAfterReset => self.relayout_after_reset(),
            }
        }
    }

    /// Notification that the container width changed.
    pub fn resize(&mut self, width: f64) {
        if !self.prefs.use_grid {
            return;
        }
        self.last_width = Some(width);
        self.apply_rescale(width);
    }

    /// The feedback popup was dismissed. Resumes the timer, optionally
    /// refocuses the matched item, and runs terminal completion when the
    /// match that opened the popup ended the game.
    pub fn popup_closed(&mut self, refocus: bool) {
        self.handle_popup_closed(refocus);
    }

    /// Shuffle the roster and restart the game. Item state is cleared and
    /// the board relaid out after the configured dismiss pause; stale
    /// continuations from the previous round never fire.
    pub fn reset(&mut self) {
        self.removed = 0;
        self.num_selected = 0;
        self.turns.reset();
        self.finished = false;
        self.cursor = None;
        self.queue.clear();
        self.pending_popup = None;
        if self.popup_open {
            self.popup.close();
            self.popup_open = false;
        }
        self.timer.reset();
        self.scheduler.bump_generation();
        self.metrics.record_reset();

        shuffle_items(&mut self.roster, self.prefs.arrangement, &mut self.rng);
        self.push(GameEvent::RosterReshuffled);
        self.scheduler.schedule(
            self.prefs.reset_relayout_delay(),
            GameTask::RelayoutAfterReset,
        );
        self.log(
            LogLevel::Info,
            "game_reset",
            [json_kv("generation", json!(self.scheduler.generation()))],
        );
    }

    /// Drain the game's pending notifications.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- match resolution ---------------------------------------------------

    fn resolve_compare(&mut self, first: ItemId, second: ItemId) {
        let Some(second_pos) = self.position_of(second) else {
            return;
        };
        let correct = self.roster[second_pos].partner();

        if first != correct {
            self.queue.enqueue_pair(first, second);
            self.metrics.record_mismatch();
            self.push(GameEvent::Mismatch { first, second });
            self.log(
                LogLevel::Debug,
                "mismatch",
                [
                    json_kv("first", json!(first.0)),
                    json_kv("second", json!(second.0)),
                ],
            );
            // Wait for the next selection to unselect them, unless a third
            // face is already revealed.
            if self.num_selected > 2 {
                self.drain_pair();
            }
            return;
        }

        self.num_selected = self.num_selected.saturating_sub(2);
        self.removed += 2;
        self.metrics.record_match();
        let finished_now = self.removed == self.roster.len();

        let Some(first_pos) = self.position_of(first) else {
            return;
        };
        self.roster[first_pos].remove();
        self.roster[second_pos].remove();
        self.push(GameEvent::MatchFound { first, second });
        self.log(
            LogLevel::Debug,
            "match_found",
            [
                json_kv("first", json!(first.0)),
                json_kv("removed", json!(self.removed)),
            ],
        );

        let feedback = self.roster[first_pos].feedback().map(str::to_string);
        if let Some(text) = feedback {
            // Pause the clock while the player reads the feedback.
            self.timer.pause();
            let mut images = vec![self.roster[first_pos].payload().clone()];
            let second_payload = self.roster[second_pos].payload().clone();
            if second_payload != images[0] {
                images.push(second_payload);
            }
            let request = FeedbackRequest {
                text,
                images,
                style_hint: None,
            };
            self.popup.show(&request);
            self.popup_open = true;
            self.pending_popup = Some(PopupFollowUp {
                item: first,
                finish: finished_now,
            });
            self.push(GameEvent::FeedbackRequested(request));
        } else if finished_now {
            self.roster[first_pos].make_untabbable();
            self.finish();
        }
    }

    fn drain_pair(&mut self) {
        let Some((first, second)) = self.queue.drain_oldest_pair() else {
            return;
        };
        self.unselect_by_id(first);
        self.unselect_by_id(second);
        self.num_selected = self.num_selected.saturating_sub(2);
        self.metrics.record_drain();
        self.push(GameEvent::PairUnselected { first, second });
    }

    fn unselect_by_id(&mut self, id: ItemId) {
        if let Some(pos) = self.position_of(id) {
            self.roster[pos].unselect(pos + 1, &self.labels);
        }
    }

    fn handle_popup_closed(&mut self, refocus: bool) {
        self.popup_open = false;
        let Some(follow) = self.pending_popup.take() else {
            return;
        };
        if follow.finish {
            if let Some(pos) = self.position_of(follow.item) {
                self.roster[pos].make_untabbable();
            }
            self.finish();
        } else {
            self.timer.play();
            if refocus {
                if let Some(pos) = self.position_of(follow.item) {
                    self.roster[pos].make_tabbable();
                    let item = self.roster[pos].id();
                    self.push(GameEvent::FocusMoved { item });
                }
            }
        }
    }

    /// Terminal transition. Both completion paths (direct and popup-close)
    /// converge here; the latch makes it fire exactly once per game.
    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.timer.stop();
        let duration_secs = ((self.timer.elapsed_millis() as f64) / 10.0).round() / 100.0;

        for item in &mut self.roster {
            item.make_untabbable();
        }

        self.push(GameEvent::Completed {
            score: 1,
            max_score: 1,
            duration_secs,
        });
        if self.prefs.allow_retry {
            self.push(GameEvent::RetryAvailable);
        }
        self.log(
            LogLevel::Info,
            "game_completed",
            [
                json_kv("duration_secs", json!(duration_secs)),
                json_kv("turns", json!(self.turns.current())),
            ],
        );
    }

    // --- layout -------------------------------------------------------------

    fn relayout_after_reset(&mut self) {
        for pos in 0..self.roster.len() {
            self.roster[pos].reset(pos + 1, &self.labels);
        }
        self.scaler.invalidate();
        if let Some(width) = self.last_width {
            self.apply_rescale(width);
        }
        if let Some(first) = self.roster.first_mut() {
            first.make_tabbable();
            let item = first.id();
            self.push(GameEvent::FocusMoved { item });
        }
    }

    fn apply_rescale(&mut self, width: f64) {
        if let Some(spec) = self.scaler.rescale(width, self.roster.len()) {
            self.grid = Some(spec);
            self.popup.set_scale(spec.font_size);
            self.metrics.record_layout_solve();
            self.push(GameEvent::LayoutChanged {
                cols: spec.cols,
                font_size: spec.font_size,
            });
            self.log(
                LogLevel::Debug,
                "layout_rescaled",
                [
                    json_kv("width", json!(width)),
                    json_kv("cols", json!(spec.cols)),
                ],
            );
        }
    }

    // --- accessors ----------------------------------------------------------

    pub fn roster(&self) -> &[Item] {
        &self.roster
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.roster.get(index)
    }

    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.roster.iter().position(|item| item.id() == id)
    }

    /// Current tab stop, if any.
    pub fn tabbable_index(&self) -> Option<usize> {
        self.roster.iter().position(Item::is_tabbable)
    }

    pub fn num_selected(&self) -> usize {
        self.num_selected
    }

    pub fn removed_count(&self) -> usize {
        self.removed
    }

    pub fn turns(&self) -> u32 {
        self.turns.current()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn grid(&self) -> Option<GridSpec> {
        self.grid
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn elapsed_millis(&self) -> u64 {
        self.timer.elapsed_millis()
    }

    pub fn prefs(&self) -> &GamePrefs {
        &self.prefs
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn metrics_snapshot(&self, uptime: Duration) -> MetricSnapshot {
        self.metrics.snapshot(uptime)
    }

    fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

/// Shuffle the roster for display. A dual-list arrangement keeps first faces
/// in the left half and match faces in the right half, each half shuffled on
/// its own.
fn shuffle_items(roster: &mut Vec<Item>, arrangement: RosterArrangement, rng: &mut StdRng) {
    match arrangement {
        RosterArrangement::Single => roster.shuffle(rng),
        RosterArrangement::DualList => {
            let (mut left, mut right): (Vec<Item>, Vec<Item>) = roster
                .drain(..)
                .partition(|item| item.id().0 % 2 == 0);
            left.shuffle(rng);
            right.shuffle(rng);
            roster.extend(left);
            roster.extend(right);
        }
    }
}
