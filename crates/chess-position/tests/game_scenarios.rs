//! End-to-end scenarios and random playouts.
//!
//! Run with: `cargo test -p chess-position --test game_scenarios`

use chess_core::{Color, Move, Piece, Square};
use chess_position::{Game, GameConfig, GameStatus, Position};
use proptest::prelude::*;

fn uci(s: &str) -> Move {
    Move::from_uci(s).unwrap()
}

fn play_line(mut position: Position, line: &[&str]) -> Position {
    for m in line {
        let m = uci(m);
        assert!(position.is_legal(m), "{m} should be legal in {}", position.to_fen());
        position = position.make_move(m);
    }
    position
}

#[test]
fn scholars_mate_through_game() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut game = Game::new();
    for m in ["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6"] {
        assert_eq!(game.make_move_uci(m).unwrap(), GameStatus::InProgress);
    }
    assert_eq!(game.make_move_uci("h5f7").unwrap(), GameStatus::BlackCheckmated);
    assert!(game.status().white_won());
    assert_eq!(game.status().winner(), Some(Color::White));
    assert!(game.position().is_check(Color::Black));
    assert!(game.position().legal_moves().is_empty());
    assert_eq!(game.moves().len(), 7);
    assert_eq!(game.positions().len(), 8);
}

#[test]
fn castling_rights_do_not_come_back() {
    // King steps out and back: the position looks the same but castling is gone.
    let start = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let back = play_line(start.clone(), &["e1f1", "e8f8", "f1e1", "f8e8"]);
    assert_eq!(back.board(), start.board());
    assert!(back.castling().is_empty());
    assert!(!back.legal_moves().contains(uci("e1g1")));
    assert_ne!(back, start);
    assert_ne!(back.hash(), start.hash());
}

#[test]
fn en_passant_window_is_one_move() {
    let position = play_line(
        Position::startpos(),
        &["e2e4", "a7a6", "e4e5", "d7d5"],
    );
    assert_eq!(position.en_passant(), Square::from_algebraic("d6"));
    assert!(position.legal_moves().contains(uci("e5d6")));

    let captured = position.make_move(uci("e5d6"));
    assert_eq!(captured.piece_at(Square::from_algebraic("d5").unwrap()), None);
    assert_eq!(
        captured.piece_at(Square::from_algebraic("d6").unwrap()),
        Some((Piece::Pawn, Color::White))
    );

    let waited = play_line(position, &["g1f3", "h7h6"]);
    assert_eq!(waited.en_passant(), None);
    assert!(!waited.legal_moves().contains(uci("e5d6")));
}

#[test]
fn repetition_counter_resets_after_pawn_move() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let claim_only = GameConfig {
        auto_draw: false,
        ..GameConfig::default()
    };
    let mut game = Game::new().with_config(claim_only);
    for m in shuffle.iter().chain(shuffle.iter()) {
        game.make_move_uci(m).unwrap();
    }
    assert_eq!(game.position().repetition_count(), 3);

    // A pawn move starts a new window; the earlier occurrences no longer count.
    for m in ["e2e3", "e7e6"] {
        game.make_move_uci(m).unwrap();
    }
    for m in shuffle.iter().chain(shuffle.iter()) {
        game.make_move_uci(m).unwrap();
    }
    assert_eq!(game.position().repetition_count(), 3);
    assert!(game.can_claim_draw());

    let mut auto = Game::new();
    for m in shuffle.iter().chain(["e2e3", "e7e6"].iter()).chain(shuffle.iter()) {
        auto.make_move_uci(m).unwrap();
    }
    assert_eq!(auto.status(), GameStatus::InProgress);
    for m in shuffle {
        auto.make_move_uci(m).unwrap();
    }
    assert_eq!(auto.status(), GameStatus::ThreefoldRepetition);
}

#[test]
fn capture_into_bare_kings_is_a_draw() {
    let mut game = Game::from_fen("8/8/8/8/8/8/5n2/4K2k w - - 0 1").unwrap();
    assert_eq!(game.status(), GameStatus::InsufficientMaterial);

    let mut game_with_rook = Game::from_fen("8/8/8/8/8/8/5r2/4K2k w - - 0 1").unwrap();
    assert_eq!(game_with_rook.status(), GameStatus::InProgress);
    assert_eq!(
        game_with_rook.make_move_uci("e1f2").unwrap(),
        GameStatus::InsufficientMaterial
    );
    assert!(game.make_move_uci("e1f2").is_err());
}

#[test]
fn illegal_moves_never_enter_history() {
    let mut game = Game::new();
    game.make_move_uci("e2e4").unwrap();
    let before = game.position().clone();
    for attempt in ["e2e4", "e8e7", "d8h4", "a7a4"] {
        assert!(game.make_move_uci(attempt).is_err());
    }
    assert_eq!(game.moves().len(), 1);
    assert_eq!(game.position(), &before);
    assert_eq!(game.status(), GameStatus::InProgress);
}

#[test]
fn config_from_toml_drives_the_game() {
    let config = GameConfig::from_toml_str("repetition_limit = 2\n").unwrap();
    let mut game = Game::new().with_config(config);
    for m in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        game.make_move_uci(m).unwrap();
    }
    assert_eq!(game.status(), GameStatus::ThreefoldRepetition);
}

/// Plays a random legal line chosen by `picks`, stopping at the first
/// position without legal moves.
fn random_line(picks: &[usize]) -> Vec<Position> {
    let mut line = vec![Position::startpos()];
    for &pick in picks {
        let current = &line[line.len() - 1];
        let moves = current.legal_moves();
        if moves.is_empty() {
            break;
        }
        let next = current.make_move(moves[pick % moves.len()]);
        line.push(next);
    }
    line
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mate_and_stalemate_are_exclusive(picks in prop::collection::vec(any::<usize>(), 0..80)) {
        for position in random_line(&picks) {
            let in_check = position.is_in_check();
            let no_moves = position.legal_moves().is_empty();
            prop_assert_eq!(position.is_checkmate(), in_check && no_moves);
            prop_assert_eq!(position.is_stalemate(), !in_check && no_moves);
            prop_assert!(!(position.is_checkmate() && position.is_stalemate()));
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_attacked(picks in prop::collection::vec(any::<usize>(), 0..60)) {
        for position in random_line(&picks) {
            let mover = position.side_to_move();
            for &m in &position.legal_moves() {
                prop_assert!(!position.make_move(m).is_check(mover), "{} in {}", m, position.to_fen());
            }
        }
    }

    #[test]
    fn fen_round_trips_and_hash_ignores_clocks(
        picks in prop::collection::vec(any::<usize>(), 0..80),
        halfmove in 0u32..100,
        fullmove in 1u32..500,
    ) {
        for position in random_line(&picks) {
            let fen = position.to_fen();
            let parsed = Position::from_fen(&fen).unwrap();
            prop_assert_eq!(&parsed.to_fen(), &fen);
            prop_assert_eq!(&parsed, &position);
            prop_assert_eq!(parsed.hash(), position.hash());

            let fields: Vec<&str> = fen.split_whitespace().collect();
            let reclocked = format!(
                "{} {} {} {} {} {}",
                fields[0], fields[1], fields[2], fields[3], halfmove, fullmove
            );
            let reclocked = Position::from_fen(&reclocked).unwrap();
            prop_assert_eq!(reclocked.hash(), position.hash());
        }
    }

    #[test]
    fn status_matches_position_queries(picks in prop::collection::vec(any::<usize>(), 0..120)) {
        let line = random_line(&picks);
        let last = &line[line.len() - 1];
        let status = last.status();
        if last.is_checkmate() {
            prop_assert_eq!(status, GameStatus::checkmated(last.side_to_move()));
        } else if last.is_stalemate() {
            prop_assert_eq!(status, GameStatus::Stalemate);
        } else if last.is_insufficient_material() {
            prop_assert_eq!(status, GameStatus::InsufficientMaterial);
        } else {
            prop_assert!(!status.is_over() || status.is_draw());
        }
    }
}
