//! Tests for the room synchronization service.

use fourline::{
    MatchResult, Player, RoomError, RoomFollower, RoomService, RoomStatus, RoomStore, RoomView,
};
use tokio::sync::broadcast::error::TryRecvError;

fn service() -> RoomService {
    RoomService::new(RoomStore::new())
}

fn hosted_pair(service: &RoomService) -> fourline::RoomRecord {
    let room = service
        .create_room("host".to_string())
        .expect("create failed");
    service
        .join_room(room.code(), "guest".to_string())
        .expect("join failed")
}

#[test]
fn test_create_room_waits_for_guest() {
    let service = service();
    let room = service
        .create_room("host".to_string())
        .expect("create failed");

    assert_eq!(*room.status(), RoomStatus::WaitingForGuest);
    assert_eq!(room.seat_of("host"), Some(Player::One));
    assert!(room.guest().is_none());
    assert_eq!(*room.version(), 1);
    assert_eq!(room.code().as_str().len(), 6);
}

#[test]
fn test_join_flips_room_to_in_progress() {
    let service = service();
    let created = service
        .create_room("host".to_string())
        .expect("create failed");
    let joined = service
        .join_room(created.code(), "guest".to_string())
        .expect("join failed");

    assert_eq!(*joined.status(), RoomStatus::InProgress);
    assert_eq!(joined.seat_of("guest"), Some(Player::Two));
    assert!(*joined.version() > *created.version());
}

#[test]
fn test_third_identity_is_rejected() {
    let service = service();
    let room = hosted_pair(&service);

    let err = service
        .join_room(room.code(), "interloper".to_string())
        .expect_err("third join accepted");
    assert_eq!(err, RoomError::RoomFull);
    // The rejected join changed nothing.
    let current = service.room(*room.id()).expect("room missing");
    assert_eq!(current.guest().as_deref(), Some("guest"));
    assert_eq!(*current.version(), *room.version());
}

#[test]
fn test_rejoin_is_idempotent() {
    let service = service();
    let room = hosted_pair(&service);
    let version = *room.version();

    for rejoiner in ["host", "guest"] {
        let record = service
            .join_room(room.code(), rejoiner.to_string())
            .expect("re-join failed");
        assert_eq!(record.seat_of("host"), Some(Player::One));
        assert_eq!(record.seat_of("guest"), Some(Player::Two));
        assert_eq!(*record.version(), version, "re-join must not commit");
    }
}

#[test]
fn test_join_unknown_code() {
    let service = service();
    let code = "ZZZZZZ".parse().expect("code invalid");
    assert_eq!(
        service.join_room(&code, "guest".to_string()),
        Err(RoomError::RoomNotFound)
    );
}

#[test]
fn test_moves_alternate_and_replicate() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    let after_host = service
        .apply_move(id, &"host".to_string(), 3)
        .expect("host move failed");
    assert_eq!(*after_host.current_player(), Player::Two);
    assert_eq!(after_host.grid().column_height(3), 1);

    let after_guest = service
        .apply_move(id, &"guest".to_string(), 3)
        .expect("guest move failed");
    assert_eq!(*after_guest.current_player(), Player::One);
    assert_eq!(after_guest.grid().column_height(3), 2);
    assert!(after_guest.version() > after_host.version());
}

#[test]
fn test_move_out_of_turn_is_rejected() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    let err = service
        .apply_move(id, &"guest".to_string(), 0)
        .expect_err("out-of-turn move accepted");
    assert_eq!(err, RoomError::NotYourTurn);

    let err = service
        .apply_move(id, &"stranger".to_string(), 0)
        .expect_err("stranger move accepted");
    assert_eq!(err, RoomError::NotYourTurn);

    let current = service.room(id).expect("room missing");
    assert_eq!(current.grid().occupied_cells(), 0);
}

#[test]
fn test_move_in_waiting_room_is_rejected() {
    let service = service();
    let room = service
        .create_room("host".to_string())
        .expect("create failed");

    let err = service
        .apply_move(*room.id(), &"host".to_string(), 0)
        .expect_err("move in waiting room accepted");
    assert_eq!(err, RoomError::RoomNotInProgress);
}

#[test]
fn test_move_into_full_column_is_rejected() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    // Alternating drops fill column 0 with six discs.
    for (mover, _) in ["host", "guest"].iter().cycle().zip(0..6) {
        service
            .apply_move(id, &mover.to_string(), 0)
            .expect("fill move failed");
    }

    let before = service.room(id).expect("room missing");
    let err = service
        .apply_move(id, &"host".to_string(), 0)
        .expect_err("seventh drop accepted");
    assert!(matches!(err, RoomError::ColumnFull(_)));
    assert_eq!(service.room(id).expect("room missing"), before);
}

#[test]
fn test_out_of_range_column_is_rejected() {
    let service = service();
    let room = hosted_pair(&service);

    let err = service
        .apply_move(*room.id(), &"host".to_string(), 7)
        .expect_err("out-of-range column accepted");
    assert_eq!(err, RoomError::InvalidColumn { column: 7 });
}

#[test]
fn test_win_finishes_room_and_bumps_tally() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    // Host stacks column 3, guest answers in column 0.
    for _ in 0..3 {
        service
            .apply_move(id, &"host".to_string(), 3)
            .expect("host move failed");
        service
            .apply_move(id, &"guest".to_string(), 0)
            .expect("guest move failed");
    }
    let record = service
        .apply_move(id, &"host".to_string(), 3)
        .expect("winning move failed");

    assert_eq!(*record.result(), MatchResult::WonBy(Player::One));
    assert_eq!(*record.status(), RoomStatus::Finished);
    assert_eq!(record.scores().player_one_wins, 1);
    assert!(record.winning_line().is_some());

    // Nobody can move in a finished room.
    let err = service
        .apply_move(id, &"guest".to_string(), 0)
        .expect_err("move after win accepted");
    assert_eq!(err, RoomError::RoomNotInProgress);
}

#[test]
fn test_reset_match_preserves_tally() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    for _ in 0..3 {
        service
            .apply_move(id, &"host".to_string(), 3)
            .expect("host move failed");
        service
            .apply_move(id, &"guest".to_string(), 0)
            .expect("guest move failed");
    }
    service
        .apply_move(id, &"host".to_string(), 3)
        .expect("winning move failed");

    let record = service.reset_match(id).expect("reset failed");
    assert_eq!(*record.status(), RoomStatus::InProgress);
    assert_eq!(*record.result(), MatchResult::InProgress);
    assert_eq!(*record.current_player(), Player::One);
    assert_eq!(record.grid().occupied_cells(), 0);
    assert!(record.winning_line().is_none());
    assert!(record.last_move().is_none());
    assert_eq!(record.scores().player_one_wins, 1);

    let record = service.reset_scores(id).expect("score reset failed");
    assert_eq!(record.scores().player_one_wins, 0);
}

#[test]
fn test_reset_match_requires_a_guest() {
    let service = service();
    let room = service
        .create_room("host".to_string())
        .expect("create failed");
    assert_eq!(
        service.reset_match(*room.id()),
        Err(RoomError::RoomNotInProgress)
    );
}

#[test]
fn test_feed_delivers_full_snapshots() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();
    let mut receiver = service.subscribe(id).expect("subscribe failed");

    let committed = service
        .apply_move(id, &"host".to_string(), 4)
        .expect("move failed");
    let snapshot = receiver.try_recv().expect("no snapshot delivered");
    assert_eq!(*snapshot, committed);

    // Rejected intents and idempotent re-joins emit nothing.
    let _ = service
        .apply_move(id, &"host".to_string(), 4)
        .expect_err("second host move accepted");
    let _ = service
        .join_room(room.code(), "host".to_string())
        .expect("re-join failed");
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Empty)));
}

#[test]
fn test_follower_tracks_feed() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();
    let mut receiver = service.subscribe(id).expect("subscribe failed");
    let mut follower = RoomFollower::new();

    service
        .apply_move(id, &"host".to_string(), 2)
        .expect("move failed");
    service
        .apply_move(id, &"guest".to_string(), 2)
        .expect("move failed");

    let first = receiver.try_recv().expect("first snapshot missing");
    let second = receiver.try_recv().expect("second snapshot missing");

    // Deliver out of order with a duplicate: only the newest applies.
    assert!(follower.observe(second.clone()));
    assert!(!follower.observe(first));
    assert!(!follower.observe(second));

    let view = follower.view("host").expect("view missing");
    assert!(view.is_my_turn());
    assert!(view.is_last_move(4, 2));
}

#[test]
fn test_leave_destroys_room_and_closes_feed() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();
    let mut receiver = service.subscribe(id).expect("subscribe failed");

    assert_eq!(
        service.leave_room(id, &"stranger".to_string()),
        Err(RoomError::RoomNotFound)
    );
    service
        .leave_room(id, &"guest".to_string())
        .expect("leave failed");

    assert!(service.room(id).is_none());
    assert!(service.room_by_code(room.code()).is_none());
    assert!(matches!(receiver.try_recv(), Err(TryRecvError::Closed)));
    assert_eq!(
        service.apply_move(id, &"host".to_string(), 0),
        Err(RoomError::RoomNotFound)
    );
}

#[test]
fn test_concurrent_moves_commit_exactly_once() {
    for _ in 0..20 {
        let service = service();
        let room = hosted_pair(&service);
        let id = *room.id();

        let results: Vec<_> = [(0usize, service.clone()), (6usize, service.clone())]
            .into_iter()
            .map(|(column, service)| {
                std::thread::spawn(move || service.apply_move(id, &"host".to_string(), column))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().expect("mover thread panicked"))
            .collect();

        let won = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(won, 1, "exactly one of two racing moves must commit");
        let lost = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("loser missing");
        assert_eq!(*lost, RoomError::NotYourTurn);

        let record = service.room(id).expect("room missing");
        assert_eq!(record.grid().occupied_cells(), 1, "exactly one disc lands");
        assert_eq!(*record.current_player(), Player::Two);
    }
}

#[test]
fn test_concurrent_joins_seat_exactly_one_guest() {
    for _ in 0..20 {
        let service = service();
        let room = service
            .create_room("host".to_string())
            .expect("create failed");
        let code = room.code().clone();

        let results: Vec<_> = ["alice", "bob"]
            .into_iter()
            .map(|joiner| {
                let service = service.clone();
                let code = code.clone();
                std::thread::spawn(move || service.join_room(&code, joiner.to_string()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().expect("joiner thread panicked"))
            .collect();

        let seated = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(seated, 1, "exactly one of two racing joins must win");
        assert_eq!(
            results.iter().find_map(|r| r.as_ref().err()),
            Some(&RoomError::RoomFull)
        );

        let record = service.room(*room.id()).expect("room missing");
        assert_eq!(*record.status(), RoomStatus::InProgress);
        assert!(record.guest().is_some());
    }
}

#[test]
fn test_projection_flags_follow_record() {
    let service = service();
    let room = hosted_pair(&service);
    let id = *room.id();

    let record = service
        .apply_move(id, &"host".to_string(), 6)
        .expect("move failed");
    let host_view = RoomView::new(&record, "host");
    let guest_view = RoomView::new(&record, "guest");

    assert!(!host_view.is_my_turn());
    assert!(guest_view.is_my_turn());
    assert!(host_view.is_last_move(5, 6));
    assert!(!host_view.is_column_full(6));
    assert!(!host_view.is_winning_cell(5, 6));
    assert_eq!(guest_view.my_seat(), Some(Player::Two));
}
