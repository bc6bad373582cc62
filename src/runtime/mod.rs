//! Cooperative terminal runtime around the game core.
//!
//! Maps raw crossterm input to core operations, drives scheduled
//! continuations from a tick interval, and repaints dirty cells after each
//! event. `run_scripted` feeds a fixed event sequence instead of polling the
//! terminal, which is how the tests and benches drive full games
//! deterministically.

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use serde_json::json;

use crate::error::Result;
use crate::focus::NavCommand;
use crate::game::{Game, GameEvent};
use crate::logging::{event_with_fields, json_kv, LogLevel, Logger};
use crate::render::CellRenderer;
use crate::view::{compose_cell, ViewRegistry};

const LOG_TARGET: &str = "matchgrid::runtime";

/// Configuration knobs for the runtime loop.
#[derive(Clone)]
pub struct RuntimeConfig {
    /// Interval between synthetic tick events.
    pub tick_interval: Duration,
    /// Optional structured logger used by the runtime.
    pub logger: Option<Logger>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Pixels represented by one terminal column, translating resize
    /// notifications into container widths for the grid scaler.
    pub px_per_col: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            logger: None,
            metrics_interval: Duration::from_secs(5),
            px_per_col: 8.0,
        }
    }
}

/// High-level events delivered to the runtime.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Tick { elapsed: Duration },
    Key(KeyEvent),
    Resize(u16, u16),
    Raw(CrosstermEvent),
}

/// Terminal driver owning a [`Game`] and its presentation state.
pub struct GameRuntime {
    game: Game,
    view: ViewRegistry,
    renderer: CellRenderer,
    config: RuntimeConfig,
    initial_cols: u16,
    cols: usize,
    should_exit: bool,
    redraw_requested: bool,
    retry_offered: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl GameRuntime {
    pub fn new(game: Game, renderer: CellRenderer, initial_cols: u16) -> Self {
        Self {
            game,
            view: ViewRegistry::new(),
            renderer,
            config: RuntimeConfig::default(),
            initial_cols,
            cols: 1,
            should_exit: false,
            redraw_requested: true,
            retry_offered: false,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Poll the terminal until exit is requested.
    pub fn run(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.bootstrap(stdout)?;
        let mut last_tick = Instant::now();

        while !self.should_exit {
            let timeout = self
                .config
                .tick_interval
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::ZERO);

            if event::poll(timeout)? {
                let runtime_event = Self::map_event(event::read()?);
                self.dispatch(runtime_event)?;
                self.render_if_needed(stdout)?;
                if self.should_exit {
                    break;
                }
            }

            if last_tick.elapsed() >= self.config.tick_interval {
                let now = Instant::now();
                let elapsed = now.duration_since(last_tick);
                last_tick = now;
                self.dispatch(RuntimeEvent::Tick { elapsed })?;
                self.render_if_needed(stdout)?;
            }

            self.maybe_emit_metrics();
        }

        self.finalize();
        Ok(())
    }

    /// Drive the runtime from a fixed event sequence.
    pub fn run_scripted<I>(&mut self, stdout: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = RuntimeEvent>,
    {
        self.bootstrap(stdout)?;
        for event in events.into_iter() {
            self.dispatch(event)?;
            self.render_if_needed(stdout)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn bootstrap(&mut self, stdout: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.redraw_requested = true;
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);

        self.game.attach();
        self.game
            .resize(self.initial_cols as f64 * self.config.px_per_col);
        self.process_game_events();

        self.log(
            LogLevel::Info,
            "runtime_started",
            [
                json_kv("items", json!(self.game.roster().len())),
                json_kv("terminal_cols", json!(self.initial_cols)),
            ],
        );
        self.render_if_needed(stdout)
    }

    fn dispatch(&mut self, event: RuntimeEvent) -> Result<()> {
        let described = Self::describe_event(&event);
        match event {
            RuntimeEvent::Tick { elapsed } => self.game.advance(elapsed),
            RuntimeEvent::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key)?,
            RuntimeEvent::Key(_) => {}
            RuntimeEvent::Resize(cols, _) => {
                self.game.resize(cols as f64 * self.config.px_per_col);
            }
            RuntimeEvent::Raw(_) => {}
        }

        self.process_game_events();
        self.log(
            LogLevel::Debug,
            "event_dispatched",
            [json_kv("event", json!(described))],
        );
        self.maybe_emit_metrics();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.game.roster().is_empty() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.should_exit = true;
            }
            return Ok(());
        }

        let focused = self.game.tabbable_index().unwrap_or(0);
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.game.select(focused)?,
            KeyCode::Right | KeyCode::Down => {
                self.game.navigate(focused, NavCommand::Next);
            }
            KeyCode::Left | KeyCode::Up => {
                self.game.navigate(focused, NavCommand::Prev);
            }
            KeyCode::Home => {
                self.game.navigate(focused, NavCommand::First);
            }
            KeyCode::End => {
                self.game.navigate(focused, NavCommand::Last);
            }
            KeyCode::Char('r') => {
                if self.retry_offered {
                    self.retry_offered = false;
                    self.game.reset();
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
        Ok(())
    }

    fn process_game_events(&mut self) {
        for game_event in self.game.take_events() {
            match &game_event {
                GameEvent::LayoutChanged { cols, .. } => {
                    self.cols = *cols;
                    // Cells move when the column count changes; start over.
                    self.view = ViewRegistry::new();
                }
                GameEvent::RosterReshuffled => {
                    self.view = ViewRegistry::new();
                }
                GameEvent::RetryAvailable => {
                    self.retry_offered = true;
                }
                GameEvent::Completed { duration_secs, .. } => {
                    self.log(
                        LogLevel::Info,
                        "game_completed",
                        [json_kv("duration_secs", json!(*duration_secs))],
                    );
                }
                _ => {}
            }
            self.redraw_requested = true;
        }
    }

    fn render_if_needed(&mut self, stdout: &mut impl Write) -> Result<()> {
        if !self.redraw_requested {
            return Ok(());
        }
        self.redraw_requested = false;

        let len = self.game.roster().len();
        self.view.sync_len(len);
        let focused = self.game.tabbable_index();
        for index in 0..len {
            if let Some(item) = self.game.item(index) {
                self.view
                    .apply_content(index, compose_cell(item, focused == Some(index)));
            }
        }

        let dirty = self.view.take_dirty();
        let cols = self.cols.max(1);
        if !dirty.is_empty() {
            self.renderer.render(stdout, cols, &dirty)?;
        }

        let status_row = self.renderer.settings().origin_row + len.div_ceil(cols) as u16 + 1;
        self.renderer
            .render_status(stdout, status_row, &self.status_line())?;
        Ok(())
    }

    fn status_line(&self) -> String {
        let labels = self.game.labels();
        if self.game.is_finished() {
            let mut line = labels.done.clone();
            if self.retry_offered {
                line.push_str(&format!("  [r] {}", labels.try_again));
            }
            line
        } else {
            format!(
                "{}: {}  turns: {}",
                labels.time_spent,
                format_elapsed(self.game.elapsed_millis()),
                self.game.turns()
            )
        }
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log(
            LogLevel::Info,
            "runtime_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics_interval == Duration::ZERO {
            return;
        }
        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();
        if let Some(logger) = self.config.logger.as_ref() {
            let snapshot = self.game.metrics_snapshot(uptime);
            let _ = logger.log_event(snapshot.to_log_event("matchgrid::runtime.metrics"));
        }
    }

    fn map_event(event: CrosstermEvent) -> RuntimeEvent {
        match event {
            CrosstermEvent::Key(key) => RuntimeEvent::Key(key),
            CrosstermEvent::Resize(cols, rows) => RuntimeEvent::Resize(cols, rows),
            other => RuntimeEvent::Raw(other),
        }
    }

    fn describe_event(event: &RuntimeEvent) -> &'static str {
        match event {
            RuntimeEvent::Tick { .. } => "tick",
            RuntimeEvent::Key(_) => "key",
            RuntimeEvent::Resize(..) => "resize",
            RuntimeEvent::Raw(_) => "raw",
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, LOG_TARGET, message, fields));
        }
    }
}

/// Format milliseconds as `m:ss` for the status line.
pub fn format_elapsed(millis: u64) -> String {
    let total_secs = millis / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GamePrefs, Labels, PairDescriptor};
    use crate::render::CellRenderer;
    use crossterm::event::KeyModifiers;
    use std::io;

    fn pair(face: &str, partner: &str) -> PairDescriptor {
        serde_json::from_value(json!({ "face": face, "match": partner })).unwrap()
    }

    fn key(code: KeyCode) -> RuntimeEvent {
        RuntimeEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn tick(ms: u64) -> RuntimeEvent {
        RuntimeEvent::Tick {
            elapsed: Duration::from_millis(ms),
        }
    }

    fn seeded_game(descriptors: &[PairDescriptor]) -> Game {
        let prefs = GamePrefs {
            shuffle_seed: Some(21),
            ..GamePrefs::default()
        };
        Game::configured(descriptors, prefs, Labels::default())
    }

    /// Select both faces of a one-pair game: whatever the shuffle did, Home
    /// and End land on the two partners.
    fn play_only_pair() -> Vec<RuntimeEvent> {
        vec![
            key(KeyCode::Home),
            key(KeyCode::Enter),
            key(KeyCode::End),
            key(KeyCode::Enter),
            tick(100),
        ]
    }

    #[test]
    fn scripted_session_completes_the_game() {
        let game = seeded_game(&[pair("sun", "soleil")]);
        let renderer = CellRenderer::with_default();
        let mut runtime = GameRuntime::new(game, renderer, 80);

        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, play_only_pair()).unwrap();
        assert!(runtime.game().is_finished());
        assert!(runtime.retry_offered);
        assert_eq!(runtime.game().removed_count(), 2);
    }

    #[test]
    fn arrow_keys_move_the_selection_target() {
        let game = seeded_game(&[pair("a", "b"), pair("c", "d")]);
        let renderer = CellRenderer::with_default();
        let mut runtime = GameRuntime::new(game, renderer, 80);

        let script = vec![key(KeyCode::Home), key(KeyCode::Right), key(KeyCode::Enter)];
        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, script).unwrap();
        // Whatever face the shuffle put at slot 1, it is now revealed.
        assert!(runtime.game().item(1).unwrap().is_selected());
    }

    #[test]
    fn retry_key_restarts_a_finished_game() {
        let game = seeded_game(&[pair("a", "b")]);
        let renderer = CellRenderer::with_default();
        let mut runtime = GameRuntime::new(game, renderer, 80);

        let mut script = play_only_pair();
        script.push(key(KeyCode::Char('r')));
        script.push(tick(600));

        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, script).unwrap();
        assert!(!runtime.game().is_finished());
        assert_eq!(runtime.game().removed_count(), 0);
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let game = seeded_game(&[pair("a", "b")]);
        let renderer = CellRenderer::with_default();
        let mut runtime = GameRuntime::new(game, renderer, 80);

        let script = vec![key(KeyCode::Char('q')), key(KeyCode::Enter)];
        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, script).unwrap();
        assert!(runtime.game().roster().iter().all(|item| !item.is_selected()));
    }

    #[test]
    fn resize_reaches_the_scaler() {
        let game = seeded_game(&[pair("a", "b"), pair("c", "d")]);
        let renderer = CellRenderer::with_default();
        let mut runtime = GameRuntime::new(game, renderer, 80);

        let script = vec![RuntimeEvent::Resize(40, 24)];
        let mut sink = io::sink();
        runtime.run_scripted(&mut sink, script).unwrap();
        // 40 cols at 8 px each is 320 px: two columns still fit.
        assert_eq!(runtime.game().grid().unwrap().cols, 2);
    }

    #[test]
    fn elapsed_formats_as_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "0:00");
        assert_eq!(format_elapsed(61_000), "1:01");
        assert_eq!(format_elapsed(600_000), "10:00");
    }
}
