//! Tests for the same-device match controller.

use fourline::{LocalMatch, LocalMoveError, MatchResult, Player, ROWS};

/// A full 42-drop game that fills the grid without either player ever
/// connecting four.
const DRAW_SEQUENCE: [usize; 42] = [
    3, 1, 0, 0, 1, 6, 2, 1, 6, 2, 5, 2, 1, 1, 3, 2, 5, 5, 3, 0, 6, 5, 1, 5, 6, 3, 2, 6, 6, 2, 5,
    4, 3, 3, 0, 4, 4, 0, 4, 4, 0, 4,
];

#[test]
fn test_first_mover_is_player_one() {
    let game = LocalMatch::new();
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.result(), MatchResult::InProgress);
    assert!(game.last_move().is_none());
}

#[test]
fn test_turn_alternates_after_non_terminal_move() {
    let mut game = LocalMatch::new();
    game.drop_disc(3).expect("drop failed");
    assert_eq!(game.current_player(), Player::Two);
    game.drop_disc(3).expect("drop failed");
    assert_eq!(game.current_player(), Player::One);
}

#[test]
fn test_vertical_win_in_column_three() {
    // Player one stacks column 3; player two answers in column 0.
    let mut game = LocalMatch::new();
    for _ in 0..3 {
        game.drop_disc(3).expect("drop failed");
        game.drop_disc(0).expect("drop failed");
    }
    game.drop_disc(3).expect("winning drop failed");

    assert_eq!(game.result(), MatchResult::WonBy(Player::One));
    assert_eq!(game.scores().player_one_wins, 1);
    assert_eq!(game.scores().player_two_wins, 0);
    // Turn marker freezes on the winner.
    assert_eq!(game.current_player(), Player::One);

    let line = game.winning_line().expect("winning line missing");
    assert_eq!(line.cells(), &[(2, 3), (3, 3), (4, 3), (5, 3)]);
    for row in 2..ROWS {
        assert!(game.is_winning_cell(row, 3));
    }
    assert!(game.is_last_move(2, 3));
}

#[test]
fn test_finished_match_rejects_drops() {
    let mut game = LocalMatch::new();
    for _ in 0..3 {
        game.drop_disc(3).expect("drop failed");
        game.drop_disc(0).expect("drop failed");
    }
    game.drop_disc(3).expect("winning drop failed");

    let before = game.grid().clone();
    assert_eq!(game.drop_disc(0), Err(LocalMoveError::MatchOver));
    assert_eq!(game.grid(), &before);
}

#[test]
fn test_full_column_rejects_drop() {
    let mut game = LocalMatch::new();
    // Alternating drops fill column 2 with six discs and no win.
    for _ in 0..6 {
        game.drop_disc(2).expect("drop failed");
    }
    assert!(game.is_column_full(2));

    let mover = game.current_player();
    let err = game.drop_disc(2).expect_err("seventh drop accepted");
    assert!(matches!(err, LocalMoveError::ColumnFull(_)));
    // Rejection changes nothing: same mover, same grid.
    assert_eq!(game.current_player(), mover);
    assert_eq!(game.grid().column_height(2), 6);
    assert_eq!(game.result(), MatchResult::InProgress);
}

#[test]
fn test_draw_when_grid_fills_without_a_winner() {
    let mut game = LocalMatch::new();
    let mover_before_last = if DRAW_SEQUENCE.len() % 2 == 0 {
        Player::Two
    } else {
        Player::One
    };
    for col in DRAW_SEQUENCE {
        assert_eq!(game.result(), MatchResult::InProgress);
        game.drop_disc(col).expect("drop failed");
    }

    assert_eq!(game.result(), MatchResult::Draw);
    assert_eq!(game.scores().player_one_wins, 0);
    assert_eq!(game.scores().player_two_wins, 0);
    // Turn marker freezes on the player who completed the grid.
    assert_eq!(game.current_player(), mover_before_last);
    assert!(game.open_columns().is_empty());
}

#[test]
fn test_reset_match_keeps_scores() {
    let mut game = LocalMatch::new();
    for _ in 0..3 {
        game.drop_disc(3).expect("drop failed");
        game.drop_disc(0).expect("drop failed");
    }
    game.drop_disc(3).expect("winning drop failed");
    // Winner keeps the frozen turn; reset hands the first move back to
    // player one regardless of who won.
    game.reset_match();

    assert_eq!(game.result(), MatchResult::InProgress);
    assert_eq!(game.current_player(), Player::One);
    assert_eq!(game.grid().occupied_cells(), 0);
    assert!(game.winning_line().is_none());
    assert!(game.last_move().is_none());
    assert_eq!(game.scores().player_one_wins, 1);
}

#[test]
fn test_reset_scores_leaves_board_alone() {
    let mut game = LocalMatch::new();
    for _ in 0..3 {
        game.drop_disc(3).expect("drop failed");
        game.drop_disc(0).expect("drop failed");
    }
    game.drop_disc(3).expect("winning drop failed");
    game.reset_scores();

    assert_eq!(game.scores().player_one_wins, 0);
    assert_eq!(game.result(), MatchResult::WonBy(Player::One));
    assert_eq!(game.grid().occupied_cells(), 7);
}
