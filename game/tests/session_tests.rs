use std::time::Duration;

use engine::image::RgbaImage;
use engine::regression::image_sha256_hex;
use glam::Vec2;
use jigsaw::config::PuzzleConfig;
use jigsaw::edges::EdgeDir;
use jigsaw::error::ConfigError;
use jigsaw::image_source::{GradientImage, ImageSource, ImageSourceKind};
use jigsaw::piece::{DropOutcome, RejectReason};
use jigsaw::{PuzzleSession, SessionEvent, SessionStatus};

fn small_config(rows: u32, cols: u32, seed: u64) -> PuzzleConfig {
    let mut config = PuzzleConfig::default().with_grid(rows, cols).with_seed(seed);
    config.tile_px = 16;
    config.image = ImageSourceKind::Gradient(GradientImage::default());
    config
}

fn generated(config: &PuzzleConfig) -> PuzzleSession {
    let mut session = PuzzleSession::new().with_image_source(config.image.build());
    session.generate(config).expect("valid config");
    session
}

/// Grabs piece `id` at its centre, moves it onto its target and lets go.
fn place(session: &mut PuzzleSession, id: usize) -> Option<DropOutcome> {
    let piece = session.piece(id)?;
    let (start, target) = (piece.position(), piece.target());
    let grabbed = session.pick_up_at(start)?;
    assert_eq!(grabbed, id, "grabbed the wrong piece");
    session.drag_to(target);
    session.drop_piece()
}

fn count_won(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Won { .. }))
        .count()
}

#[test]
fn two_by_two_scenario() {
    let config = small_config(2, 2, 7);
    let session = generated(&config);

    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.pieces().len(), 4);

    let slots = session.target_slots();
    let origin = config.board_origin;
    assert_eq!(slots[0], origin);
    assert_eq!(slots[1], origin + Vec2::new(1.5, 0.0));
    assert_eq!(slots[2], origin + Vec2::new(0.0, -1.5));
    assert_eq!(slots[3], origin + Vec2::new(1.5, -1.5));

    let left_piece = session.piece(0).expect("piece (0,0)");
    let right_piece = session.piece(1).expect("piece (0,1)");
    assert_eq!(left_piece.grid_pos(), (0, 0));
    assert_eq!(right_piece.grid_pos(), (0, 1));
    assert_eq!(
        left_piece.edges().get(EdgeDir::Right),
        right_piece.edges().get(EdgeDir::Left).complement()
    );
}

#[test]
fn generation_reports_piece_count_and_starts_active() {
    let mut session = generated(&small_config(3, 2, 1));
    assert_eq!(session.drain_events(), vec![SessionEvent::Generated { pieces: 6 }]);
    assert!(session.is_active());
    assert_eq!(session.placed_count(), 0);
    assert!(session.topology().is_some());
    let source = session.source_image().expect("source kept");
    assert_eq!((source.width(), source.height()), (32, 48));
}

#[test]
fn scramble_positions_are_distinct_and_away_from_board() {
    let session = generated(&small_config(4, 4, 3));
    let homes: Vec<Vec2> = session.pieces().iter().map(|p| p.scramble_position()).collect();
    for (i, a) in homes.iter().enumerate() {
        for b in &homes[i + 1..] {
            assert!(a.distance(*b) > 1.0, "{a} and {b} too close");
        }
    }
    for piece in session.pieces() {
        assert_eq!(piece.position(), piece.scramble_position());
    }
}

#[test]
fn exact_drop_places_piece_and_counts_once() {
    let mut session = generated(&small_config(2, 2, 11));
    session.drain_events();

    assert_eq!(place(&mut session, 2), Some(DropOutcome::Placed));
    assert_eq!(session.placed_count(), 1);
    let piece = session.piece(2).expect("piece");
    assert!(piece.is_placed());
    assert_eq!(piece.position(), piece.target());
    assert_eq!(
        session.drain_events(),
        vec![SessionEvent::PlacedCorrectly { piece: 2 }]
    );

    // Placed pieces can no longer be picked up.
    let target = session.piece(2).expect("piece").target();
    assert_eq!(session.pick_up_at(target), None);
    assert_eq!(session.placed_count(), 1);
}

#[test]
fn far_drop_returns_to_scramble_with_one_rejection() {
    let mut session = generated(&small_config(2, 2, 5));
    session.drain_events();

    let piece = session.piece(1).expect("piece");
    let (home, target) = (piece.scramble_position(), piece.target());
    assert_eq!(session.pick_up_at(home), Some(1));
    session.drag_to(target + Vec2::new(10.0, 0.0));
    assert!(matches!(session.drop_piece(), Some(DropOutcome::Returned(_))));

    let events = session.drain_events();
    assert_eq!(events, vec![SessionEvent::PlacedIncorrectly { piece: 1 }]);
    assert_eq!(session.placed_count(), 0);

    let piece = session.piece(1).expect("piece");
    assert!(piece.is_returning());
    assert!(!piece.is_placed());

    session.tick(Duration::from_secs(5));
    let piece = session.piece(1).expect("piece");
    assert!(!piece.is_returning());
    assert_eq!(piece.position(), home);
    assert!(session.drain_events().is_empty());
}

#[test]
fn win_fires_exactly_once_with_elapsed_time() {
    let mut session = generated(&small_config(2, 2, 21));
    session.drain_events();

    for id in [3, 0, 2] {
        assert_eq!(place(&mut session, id), Some(DropOutcome::Placed));
    }
    assert_eq!(session.status(), SessionStatus::Active, "N-1 pieces must not win");

    session.tick(Duration::from_millis(1500));
    assert_eq!(place(&mut session, 1), Some(DropOutcome::Placed));
    assert_eq!(session.status(), SessionStatus::Won);

    let events = session.drain_events();
    assert_eq!(count_won(&events), 1);
    assert!(events.contains(&SessionEvent::Won {
        elapsed: Duration::from_millis(1500)
    }));

    // Duplicate reports after the win are no-ops.
    for id in 0..4 {
        assert!(!session.report_placement(id, true));
    }
    assert!(session.drain_events().is_empty());

    // The clock stops and input is ignored once won.
    session.tick(Duration::from_secs(3));
    assert_eq!(session.elapsed(), Duration::from_millis(1500));
    assert!(!session.is_active());
}

#[test]
fn duplicate_reports_never_double_count() {
    let mut session = generated(&small_config(1, 3, 2));
    session.drain_events();

    assert!(session.report_placement(0, true));
    assert!(!session.report_placement(0, true));
    assert!(session.report_placement(1, true));
    assert!(!session.report_placement(1, true));
    assert_eq!(session.placed_count(), 2);
    assert_eq!(session.status(), SessionStatus::Active);

    assert!(!session.report_placement(99, true), "unknown ids are ignored");
    assert!(session.report_placement(2, true));
    assert_eq!(count_won(&session.drain_events()), 1);
}

#[test]
fn slot_taken_only_by_other_placed_pieces() {
    let mut session = generated(&small_config(2, 2, 9));
    let slot0 = session.target_slots()[0];
    for id in 0..4 {
        assert!(!session.is_slot_taken(id, slot0));
    }

    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));
    assert!(session.is_slot_taken(1, slot0));
    assert!(session.is_slot_taken(3, slot0 + Vec2::new(0.05, 0.0)));
    assert!(!session.is_slot_taken(0, slot0), "a piece never blocks itself");
    assert!(!session.is_slot_taken(1, session.target_slots()[1]));
}

#[test]
fn single_piece_puzzle_wins_on_first_drop() {
    let mut session = generated(&small_config(1, 1, 4));
    session.drain_events();
    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));
    assert_eq!(session.status(), SessionStatus::Won);
}

#[test]
fn invalid_grid_fails_without_touching_current_puzzle() {
    let config = small_config(2, 2, 8);
    let mut session = generated(&config);
    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));

    let err = session.generate(&config.clone().with_grid(0, 2));
    assert_eq!(err, Err(ConfigError::InvalidGrid { rows: 0, cols: 2 }));
    assert_eq!(session.pieces().len(), 4);
    assert_eq!(session.placed_count(), 1);
    assert!(session.is_active());
}

#[test]
fn missing_image_source_is_a_config_error() {
    let mut session = PuzzleSession::new();
    assert_eq!(
        session.generate(&small_config(2, 2, 1)),
        Err(ConfigError::MissingImageSource)
    );
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(!session.is_active());
    assert_eq!(session.restart(), Err(ConfigError::NothingToRestart));
}

struct WrongSize;

impl ImageSource for WrongSize {
    fn image(&mut self, _width: u32, _height: u32, _seed: u64) -> RgbaImage {
        RgbaImage::new(3, 3)
    }
}

#[test]
fn wrong_sized_source_image_is_rejected() {
    let mut session = PuzzleSession::new().with_image_source(Box::new(WrongSize));
    assert_eq!(
        session.generate(&small_config(2, 2, 1)),
        Err(ConfigError::ImageSizeMismatch {
            expected: (32, 32),
            actual: (3, 3)
        })
    );
}

#[test]
fn restart_rebuilds_the_same_seeded_puzzle() {
    let config = small_config(2, 3, 77);
    let mut session = generated(&config);
    let before: Vec<String> = session
        .pieces()
        .iter()
        .map(|p| image_sha256_hex(&p.sprite().image))
        .collect();
    let homes: Vec<Vec2> = session.pieces().iter().map(|p| p.scramble_position()).collect();

    for id in 0..6 {
        place(&mut session, id);
    }
    assert_eq!(session.status(), SessionStatus::Won);

    session.drain_events();
    session.restart().expect("restart");
    assert_eq!(session.status(), SessionStatus::Active);
    assert_eq!(session.placed_count(), 0);
    assert_eq!(session.elapsed(), Duration::ZERO);
    assert_eq!(session.drain_events(), vec![SessionEvent::Generated { pieces: 6 }]);

    let after: Vec<String> = session
        .pieces()
        .iter()
        .map(|p| image_sha256_hex(&p.sprite().image))
        .collect();
    let homes_after: Vec<Vec2> = session.pieces().iter().map(|p| p.scramble_position()).collect();
    assert_eq!(before, after);
    assert_eq!(homes, homes_after);
}

#[test]
fn timer_runs_only_while_active() {
    let mut session = PuzzleSession::new().with_image_source(Box::new(GradientImage::default()));
    session.tick(Duration::from_secs(1));
    assert_eq!(session.elapsed(), Duration::ZERO);

    session.generate(&small_config(1, 2, 3)).expect("valid config");
    session.tick(Duration::from_millis(250));
    session.tick(Duration::from_millis(250));
    assert_eq!(session.elapsed(), Duration::from_millis(500));
    assert_eq!(session.timer().formatted(), "00:00.50");
}

#[test]
fn world_bounds_cover_board_and_scramble_area() {
    let config = small_config(3, 3, 12);
    let session = generated(&config);
    let (min, max) = session.world_bounds().expect("bounds once generated");
    for piece in session.pieces() {
        for point in [piece.target(), piece.scramble_position()] {
            assert!(point.cmpge(min).all() && point.cmple(max).all(), "{point} outside");
        }
    }
    assert!(PuzzleSession::new().world_bounds().is_none());
}

#[test]
fn tiny_pieces_with_wide_slot_epsilon_are_rejected_up_front() {
    let mut config = small_config(1, 2, 5);
    config.piece_size = 0.05;
    config.scramble_distortion = 0.0;
    let mut session = PuzzleSession::new().with_image_source(config.image.build());
    assert!(matches!(
        session.generate(&config),
        Err(ConfigError::SlotEpsilonTooLarge { .. })
    ));

    // With an epsilon below the slot spacing both neighbours can be placed and the puzzle wins.
    config.slot_epsilon = 0.01;
    session.generate(&config).expect("valid config");
    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));
    assert_eq!(place(&mut session, 1), Some(DropOutcome::Placed));
    assert_eq!(session.status(), SessionStatus::Won);
}

#[test]
fn oversized_knob_ratio_fails_without_touching_current_puzzle() {
    let config = small_config(2, 2, 6);
    let mut session = generated(&config);
    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));

    let mut huge = config.clone();
    huge.knob_radius_ratio = 1e9;
    assert!(matches!(
        session.generate(&huge),
        Err(ConfigError::TextureTooLarge { .. })
    ));
    assert_eq!(session.pieces().len(), 4);
    assert_eq!(session.placed_count(), 1);
    assert!(session.is_active());
}

#[test]
fn drag_in_progress_still_resolves_after_the_win() {
    let mut session = generated(&small_config(1, 2, 13));
    let start = session.piece(0).expect("piece 0").position();
    assert_eq!(session.pick_up_at(start), Some(0));
    let far = start + Vec2::new(0.0, 6.0);
    session.drag_to(far);

    // The rest of the puzzle completes while piece 0 is still held.
    assert!(session.report_placement(1, true));
    assert!(session.report_placement(0, true));
    assert_eq!(session.status(), SessionStatus::Won);

    // Moves are ignored once the session is inactive, but the release resolves.
    session.drag_to(far + Vec2::new(1.0, 0.0));
    assert_eq!(session.piece(0).expect("piece 0").position(), far);
    assert_eq!(
        session.drop_piece(),
        Some(DropOutcome::Returned(RejectReason::TooFar))
    );
    assert_eq!(session.dragging(), None);

    let piece = session.piece(0).expect("piece 0");
    assert!(piece.is_returning());
    session.tick(Duration::from_millis(100));
    let midway = session.piece(0).expect("piece 0").position();
    assert_ne!(midway, far);
    assert_ne!(midway, start);
    session.tick(Duration::from_secs(2));
    let piece = session.piece(0).expect("piece 0");
    assert!(!piece.is_returning());
    assert_eq!(piece.position(), start);

    assert_eq!(session.pick_up_at(start), None);
    assert_eq!(session.status(), SessionStatus::Won);
}

#[test]
fn regenerating_discards_undrained_events() {
    let config = small_config(1, 2, 17);
    let mut session = generated(&config);
    assert_eq!(place(&mut session, 0), Some(DropOutcome::Placed));
    assert_eq!(place(&mut session, 1), Some(DropOutcome::Placed));
    assert_eq!(session.status(), SessionStatus::Won);

    session.restart().expect("restart");
    assert_eq!(session.drain_events(), vec![SessionEvent::Generated { pieces: 2 }]);
}
