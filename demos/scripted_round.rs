//! Drive a full game through the library API and print the event stream.
//!
//! Run with: cargo run --example scripted_round

use std::time::Duration;

use matchgrid::{Game, GameEvent, GamePrefs, ItemId, Labels, PairDescriptor};
use serde_json::json;

fn main() {
    let descriptors: Vec<PairDescriptor> = serde_json::from_value(json!([
        { "face": "sun", "match": "soleil" },
        { "face": "moon", "match": "lune", "feedback": "The moon rises!" },
        { "face": "star", "match": "etoile" },
    ]))
    .expect("descriptors");

    let prefs = GamePrefs {
        shuffle_seed: Some(42),
        ..GamePrefs::default()
    };
    let mut game = Game::configured(&descriptors, prefs, Labels::default());
    game.attach();
    game.resize(640.0);
    report(&mut game);

    // One mismatch first: faces 0 and 2 belong to different pairs. Both stay
    // revealed until the next selection drains them.
    let first = game.position_of(ItemId(0)).expect("position");
    let wrong = game.position_of(ItemId(2)).expect("position");
    game.select(first).expect("select");
    game.select(wrong).expect("select");
    game.advance(Duration::from_millis(100));
    report(&mut game);

    // Then resolve every pair. Face 0 is still revealed from the mismatch,
    // so its pair is played partner-first.
    for (a, b) in [(1, 0), (2, 3), (4, 5)] {
        let first = game.position_of(ItemId(a)).expect("position");
        let second = game.position_of(ItemId(b)).expect("position");
        game.select(first).expect("select");
        game.select(second).expect("select");
        game.advance(Duration::from_millis(100));

        // Feedback popups park the game until the host dismisses them.
        let events = game.take_events();
        for event in &events {
            describe(event);
        }
        let had_feedback = events
            .iter()
            .any(|event| matches!(event, GameEvent::FeedbackRequested(_)));
        if had_feedback {
            game.popup_closed(true);
            report(&mut game);
        }
    }
    report(&mut game);

    println!(
        "finished={} removed={}/{} turns={}",
        game.is_finished(),
        game.removed_count(),
        game.roster().len(),
        game.turns()
    );
}

fn report(game: &mut Game) {
    for event in game.take_events() {
        describe(&event);
    }
}

fn describe(event: &GameEvent) {
    match event {
        GameEvent::Attached => println!("attached"),
        GameEvent::Interacted => {}
        GameEvent::Selected { item } => println!("selected item {}", item.0),
        GameEvent::Announced { .. } => {}
        GameEvent::MatchFound { first, second } => {
            println!("match: {} + {}", first.0, second.0)
        }
        GameEvent::Mismatch { first, second } => {
            println!("mismatch: {} / {}", first.0, second.0)
        }
        GameEvent::PairUnselected { first, second } => {
            println!("turned back over: {} / {}", first.0, second.0)
        }
        GameEvent::FeedbackRequested(request) => println!("feedback: {}", request.text),
        GameEvent::Completed {
            score,
            max_score,
            duration_secs,
        } => println!("completed {score}/{max_score} in {duration_secs}s"),
        GameEvent::RetryAvailable => println!("retry available"),
        GameEvent::LayoutChanged { cols, font_size } => {
            println!("layout: {cols} cols, font {font_size:.1}px")
        }
        GameEvent::FocusMoved { item } => println!("focus on item {}", item.0),
        GameEvent::RosterReshuffled => println!("reshuffled"),
    }
}
