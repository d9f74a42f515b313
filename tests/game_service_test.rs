//! Tests for the game service over both stores.

use memory_match::{
    Board, CardType::*, GAME_CREATED_MESSAGE, GameError, GameRepository, GameService,
    GameStatus, GameStore, InMemoryGameStore, ServiceError,
};
use tempfile::NamedTempFile;

fn ordered_board() -> Board {
    Board::from_rows([
        [Cat, Cat, Dog, Dog],
        [Horse, Horse, Sheep, Sheep],
        [Cow, Cow, Bird, Bird],
        [Pig, Pig, Fish, Fish],
    ])
    .expect("Valid board")
}

/// Matching pairs of `ordered_board`, row by row.
const PAIRS: [(&str, &str); 8] = [
    ("A1", "B1"),
    ("C1", "D1"),
    ("A2", "B2"),
    ("C2", "D2"),
    ("A3", "B3"),
    ("C3", "D3"),
    ("A4", "B4"),
    ("C4", "D4"),
];

fn sqlite_service() -> (NamedTempFile, GameService<GameRepository>) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::open(db_path).expect("Failed to open repository");
    (db_file, GameService::new(repo))
}

fn play_to_completion<S: GameStore>(service: &GameService<S>, game_id: &str, misses: usize) {
    for _ in 0..misses {
        service.play_round(game_id, "A1", "C1").expect("Miss failed");
    }
    for (a, b) in PAIRS {
        service.play_round(game_id, a, b).expect("Pair failed");
    }
}

#[test]
fn test_create_game_initial_state() {
    let service = GameService::new(InMemoryGameStore::new());
    let created = service.create_game().expect("Create failed");
    assert_eq!(created.message, GAME_CREATED_MESSAGE);
    assert!(!created.game_id.is_empty());

    let state = service.game_state(&created.game_id).expect("State failed");
    assert_eq!(state.game_id, created.game_id);
    assert_eq!(state.status, GameStatus::InProgress);
    assert!(state.matched_cards.is_empty());
    assert_eq!(state.attempt_count, 0);
    assert!(state.end_time.is_none());
}

#[test]
fn test_game_ids_unique() {
    let service = GameService::new(InMemoryGameStore::new());
    let a = service.create_game().unwrap();
    let b = service.create_game().unwrap();
    assert_ne!(a.game_id, b.game_id);
}

#[test]
fn test_state_of_missing_game() {
    let service = GameService::new(InMemoryGameStore::new());
    let err = service.game_state("missing").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::GameNotFound(_))));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_matching_round() {
    let service = GameService::new(InMemoryGameStore::new());
    let id = service.create_game_with_board(ordered_board()).unwrap().game_id;

    let outcome = service.play_round(&id, "A1", "B1").expect("Round failed");
    assert!(outcome.is_match);
    assert_eq!(outcome.card1.value, Cat);
    assert_eq!(outcome.card2.value, Cat);
    assert_eq!(outcome.attempt_number, 1);
    assert!(!outcome.game_completed);

    let state = service.game_state(&id).unwrap();
    assert_eq!(state.matched_cards.len(), 2);
    assert_eq!(state.attempt_count, 1);
}

#[test]
fn test_non_matching_round() {
    let service = GameService::new(InMemoryGameStore::new());
    let id = service.create_game_with_board(ordered_board()).unwrap().game_id;

    let outcome = service.play_round(&id, "D4", "A1").expect("Round failed");
    assert!(!outcome.is_match);
    assert_eq!(outcome.card1.value, Fish);
    assert_eq!(outcome.card2.value, Cat);
    assert!(service.game_state(&id).unwrap().matched_cards.is_empty());
}

#[test]
fn test_validation_order() {
    let service = GameService::new(InMemoryGameStore::new());

    // Malformed beats duplicate and missing game.
    let err = service.play_round("missing", "E1", "E1").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::InvalidPosition(_))));

    // Duplicate beats missing game.
    let err = service.play_round("missing", "A1", "A1").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::DuplicateSelection(_))));

    let err = service.play_round("missing", "A1", "A2").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::GameNotFound(_))));
}

#[test]
fn test_completion_then_rejection() {
    let service = GameService::new(InMemoryGameStore::new());
    let id = service.create_game_with_board(ordered_board()).unwrap().game_id;

    for (a, b) in &PAIRS[..7] {
        let outcome = service.play_round(&id, a, b).unwrap();
        assert!(!outcome.game_completed);
    }
    assert_eq!(service.game_state(&id).unwrap().matched_cards.len(), 14);

    let last = service.play_round(&id, "C4", "D4").unwrap();
    assert!(last.game_completed);
    assert_eq!(last.attempt_number, 8);

    let state = service.game_state(&id).unwrap();
    assert_eq!(state.status, GameStatus::Completed);
    assert!(state.end_time.is_some());
    assert_eq!(state.matched_cards.len(), 16);

    let err = service.play_round(&id, "A1", "C1").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::GameAlreadyCompleted(_))));
}

#[test]
fn test_history_ordered_and_complete() {
    let service = GameService::new(InMemoryGameStore::new());
    let id = service.create_game_with_board(ordered_board()).unwrap().game_id;

    assert!(service.history(&id).unwrap().attempts.is_empty());

    service.play_round(&id, "A1", "C1").unwrap();
    service.play_round(&id, "B1", "A1").unwrap();
    service.play_round(&id, "C1", "D1").unwrap();

    let history = service.history(&id).unwrap();
    assert_eq!(history.game_id, id);
    let numbers: Vec<_> = history.attempts.iter().map(|a| a.attempt_number).collect();
    assert_eq!(numbers, [1, 2, 3]);
    assert_eq!(history.attempts[1].positions[0].to_string(), "B1");
    assert_eq!(history.attempts[1].values, [Cat, Cat]);
    assert!(history.attempts[1].is_match);
    assert!(!history.attempts[0].is_match);
}

#[test]
fn test_history_of_missing_game() {
    let service = GameService::new(InMemoryGameStore::new());
    let err = service.history("missing").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::GameNotFound(_))));
}

#[test]
fn test_leaderboard_empty() {
    let service = GameService::new(InMemoryGameStore::new());
    service.create_game().unwrap();
    assert!(service.leaderboard().unwrap().is_empty());
}

#[test]
fn test_leaderboard_orders_by_attempts() {
    let service = GameService::new(InMemoryGameStore::new());
    let mut ids = Vec::new();
    for misses in [3, 0, 1] {
        let id = service.create_game_with_board(ordered_board()).unwrap().game_id;
        play_to_completion(&service, &id, misses);
        ids.push(id);
    }

    let board = service.leaderboard().unwrap();
    let ranked: Vec<_> = board.iter().map(|e| e.game_id.clone()).collect();
    assert_eq!(ranked, [ids[1].clone(), ids[2].clone(), ids[0].clone()]);
    assert_eq!(board[0].attempt_count, 8);
    assert_eq!(board[2].attempt_count, 11);
}

#[test]
fn test_leaderboard_limited_to_five() {
    let service = GameService::new(InMemoryGameStore::new());
    for misses in 0..7 {
        let id = service.create_game_with_board(ordered_board()).unwrap().game_id;
        play_to_completion(&service, &id, misses);
    }
    assert_eq!(service.leaderboard().unwrap().len(), 5);
}

#[test]
fn test_full_game_on_sqlite() {
    let (_db, service) = sqlite_service();
    let id = service.create_game_with_board(ordered_board()).unwrap().game_id;
    play_to_completion(&service, &id, 2);

    let state = service.game_state(&id).unwrap();
    assert_eq!(state.status, GameStatus::Completed);
    assert_eq!(state.attempt_count, 10);

    let history = service.history(&id).unwrap();
    assert_eq!(history.attempts.len(), 10);
    assert!(history.attempts.windows(2).all(|w| w[0].attempt_number < w[1].attempt_number));

    let board = service.leaderboard().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].game_id, id);

    let err = service.play_round(&id, "A1", "B1").unwrap_err();
    assert!(matches!(err, ServiceError::Game(GameError::GameAlreadyCompleted(_))));
}
