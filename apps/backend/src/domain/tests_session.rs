#![cfg(test)]

use uuid::Uuid;

use crate::domain::events::SessionEvent;
use crate::domain::player::{GameResult, GameType, PlayerHandle, Sign, ViewerRole};
use crate::domain::rules::GameConfig;
use crate::domain::session::{EndpointId, GameSession, Phase};
use crate::errors::domain::DomainError;

fn config() -> GameConfig {
    GameConfig {
        field_width: 3,
        field_height: 3,
        qty_to_win: 3,
        game_type: GameType::VsHum,
        host_char: Sign::X,
        start_player_handle: PlayerHandle::Host,
    }
}

fn endpoint() -> EndpointId {
    Uuid::new_v4()
}

/// Session with host and opponent attached and the game active.
fn active_session() -> (GameSession, EndpointId, EndpointId) {
    let mut session = GameSession::create(config()).unwrap();
    let host = endpoint();
    let opponent = endpoint();
    session.attach(host, None, true, None);
    session.attach(opponent, None, true, None);
    assert_eq!(session.phase(), Phase::Active);
    (session, host, opponent)
}

#[test]
fn create_validates_config() {
    assert!(GameSession::create(config()).is_ok());
    let bad = GameConfig {
        qty_to_win: 4,
        ..config()
    };
    assert!(matches!(
        GameSession::create(bad),
        Err(DomainError::InvalidConfig(_))
    ));
}

#[test]
fn first_two_attaches_bind_host_then_opponent() {
    let mut session = GameSession::create(config()).unwrap();
    assert_eq!(session.phase(), Phase::AwaitingOpponent);

    let first = session.attach(endpoint(), None, true, Some("g1".to_string()));
    assert_eq!(first.role, ViewerRole::Host);
    assert_eq!(
        first.events,
        vec![SessionEvent::PlayerJoined {
            player_handle: PlayerHandle::Host
        }]
    );
    // Host alone does not activate the game.
    assert_eq!(session.phase(), Phase::AwaitingOpponent);

    let second = session.attach(endpoint(), None, true, Some("g1".to_string()));
    assert_eq!(second.role, ViewerRole::Opponent);
    assert_eq!(session.phase(), Phase::Active);

    // Everyone after the movers spectates.
    let third = session.attach(endpoint(), None, true, Some("g1".to_string()));
    assert_eq!(third.role, ViewerRole::Spectator);
    assert!(third.events.is_empty());
}

#[test]
fn moves_rejected_until_active() {
    let mut session = GameSession::create(config()).unwrap();
    session.attach(endpoint(), None, true, None);
    assert_eq!(
        session.apply_move(PlayerHandle::Host, 0, 0),
        Err(DomainError::GameNotActive)
    );
    assert!(session.board().cell(0, 0).is_none());
}

#[test]
fn turn_alternates_strictly_from_start_player() {
    let (mut session, _, _) = active_session();
    assert_eq!(session.turn(), PlayerHandle::Host);

    session.apply_move(PlayerHandle::Host, 0, 0).unwrap();
    assert_eq!(session.turn(), PlayerHandle::Opponent);
    session.apply_move(PlayerHandle::Opponent, 1, 1).unwrap();
    assert_eq!(session.turn(), PlayerHandle::Host);
}

#[test]
fn opponent_can_start_when_configured() {
    let mut session = GameSession::create(GameConfig {
        start_player_handle: PlayerHandle::Opponent,
        ..config()
    })
    .unwrap();
    session.attach(endpoint(), None, true, None);
    session.attach(endpoint(), None, true, None);

    assert_eq!(
        session.apply_move(PlayerHandle::Host, 0, 0),
        Err(DomainError::NotYourTurn)
    );
    assert!(session.apply_move(PlayerHandle::Opponent, 0, 0).is_ok());
}

#[test]
fn out_of_turn_move_is_an_idempotent_rejection() {
    let (mut session, _, _) = active_session();
    session.apply_move(PlayerHandle::Host, 0, 0).unwrap();

    let before_turn = session.turn();
    assert_eq!(
        session.apply_move(PlayerHandle::Host, 1, 0),
        Err(DomainError::NotYourTurn)
    );
    assert_eq!(session.turn(), before_turn);
    assert!(session.board().cell(1, 0).is_none());
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn winning_move_emits_move_then_gameover_and_finishes() {
    // Host takes the top row.
    let (mut session, _, _) = active_session();
    session.apply_move(PlayerHandle::Host, 0, 0).unwrap();
    session.apply_move(PlayerHandle::Opponent, 1, 1).unwrap();
    session.apply_move(PlayerHandle::Host, 1, 0).unwrap();
    session.apply_move(PlayerHandle::Opponent, 0, 1).unwrap();

    let events = session.apply_move(PlayerHandle::Host, 2, 0).unwrap();
    assert_eq!(
        events,
        vec![
            SessionEvent::Move {
                player_handle: PlayerHandle::Host,
                x: 2,
                y: 0
            },
            SessionEvent::GameOver {
                result_of_move: GameResult::Win(PlayerHandle::Host)
            },
        ]
    );
    assert_eq!(
        session.phase(),
        Phase::Finished(GameResult::Win(PlayerHandle::Host))
    );

    // Terminal phase accepts no further moves.
    assert_eq!(
        session.apply_move(PlayerHandle::Opponent, 2, 2),
        Err(DomainError::GameNotActive)
    );
}

#[test]
fn full_board_without_winner_is_a_draw() {
    let (mut session, _, _) = active_session();
    // h o h / h o o / o h h column-major: no 3-run anywhere.
    let moves = [
        (PlayerHandle::Host, 0, 0),
        (PlayerHandle::Opponent, 1, 0),
        (PlayerHandle::Host, 2, 0),
        (PlayerHandle::Opponent, 1, 1),
        (PlayerHandle::Host, 0, 1),
        (PlayerHandle::Opponent, 2, 1),
        (PlayerHandle::Host, 1, 2),
        (PlayerHandle::Opponent, 0, 2),
        (PlayerHandle::Host, 2, 2),
    ];
    let mut gameovers = 0;
    for (handle, x, y) in moves {
        let events = session.apply_move(handle, x, y).unwrap();
        gameovers += events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    SessionEvent::GameOver {
                        result_of_move: GameResult::Draw
                    }
                )
            })
            .count();
    }
    assert_eq!(gameovers, 1);
    assert_eq!(session.phase(), Phase::Finished(GameResult::Draw));
}

#[test]
fn host_departure_closes_the_session_to_new_movers() {
    let (mut session, host, _) = active_session();
    let events = session.detach(host);
    assert_eq!(
        events,
        vec![SessionEvent::PlayerLeft {
            player_handle: PlayerHandle::Host
        }]
    );

    // Newcomers can still watch, but no mover slot opens again
    // without a reclaim.
    let late = session.attach(endpoint(), None, false, None);
    assert_eq!(late.role, ViewerRole::Spectator);
}

#[test]
fn opponent_departure_pauses_the_game_until_a_replacement_binds() {
    let (mut session, _, opponent) = active_session();
    session.apply_move(PlayerHandle::Host, 0, 0).unwrap();

    let events = session.detach(opponent);
    assert_eq!(
        events,
        vec![SessionEvent::PlayerLeft {
            player_handle: PlayerHandle::Opponent
        }]
    );
    assert_eq!(session.phase(), Phase::AwaitingOpponent);
    assert_eq!(
        session.apply_move(PlayerHandle::Opponent, 1, 1),
        Err(DomainError::GameNotActive)
    );

    // Board survives the departure; a replacement resumes the game.
    let replacement = session.attach(endpoint(), None, false, None);
    assert_eq!(replacement.role, ViewerRole::Opponent);
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.board().cell(0, 0), Some(PlayerHandle::Host));
}

#[test]
fn spectator_departure_is_silent() {
    let (mut session, _, _) = active_session();
    let spectator = endpoint();
    session.attach(spectator, None, true, None);
    assert!(session.detach(spectator).is_empty());
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn host_slot_reclaim_honors_the_policy() {
    // Reclaim on: the hint re-binds host and reopens the session.
    let (mut session, host, _) = active_session();
    session.detach(host);
    let back = session.attach(endpoint(), Some(PlayerHandle::Host), true, None);
    assert_eq!(back.role, ViewerRole::Host);
    assert_eq!(session.phase(), Phase::Active);

    // Reclaim off: the hint is ignored and the slot stays closed.
    let (mut session, host, _) = active_session();
    session.detach(host);
    let refused = session.attach(endpoint(), Some(PlayerHandle::Host), false, None);
    assert_eq!(refused.role, ViewerRole::Spectator);
}

#[test]
fn rejoin_hint_cannot_steal_a_connected_slot() {
    let (mut session, _, _) = active_session();
    let sneaky = session.attach(endpoint(), Some(PlayerHandle::Host), true, None);
    assert_eq!(sneaky.role, ViewerRole::Spectator);
}

#[test]
fn attach_after_finish_is_spectator_with_final_board() {
    let (mut session, _, _) = active_session();
    session.apply_move(PlayerHandle::Host, 0, 0).unwrap();
    session.apply_move(PlayerHandle::Opponent, 0, 1).unwrap();
    session.apply_move(PlayerHandle::Host, 1, 0).unwrap();
    session.apply_move(PlayerHandle::Opponent, 1, 1).unwrap();
    session.apply_move(PlayerHandle::Host, 2, 0).unwrap();
    assert!(matches!(session.phase(), Phase::Finished(_)));

    let late = session.attach(endpoint(), None, true, None);
    assert_eq!(late.role, ViewerRole::Spectator);
    assert_eq!(late.snapshot.field[2][0], Some(PlayerHandle::Host));
}

#[test]
fn snapshot_reflects_committed_state_exactly() {
    let (mut session, _, _) = active_session();
    session.apply_move(PlayerHandle::Host, 2, 1).unwrap();

    let snapshot = session.snapshot(ViewerRole::Spectator, Some("g7".to_string()));
    assert_eq!(snapshot.connection_game_id.as_deref(), Some("g7"));
    assert_eq!(snapshot.player_handle, ViewerRole::Spectator);
    assert_eq!(snapshot.field_width, 3);
    assert_eq!(snapshot.field_height, 3);
    assert_eq!(snapshot.field[2][1], Some(PlayerHandle::Host));
    assert_eq!(
        snapshot.field.iter().flatten().filter(|c| c.is_some()).count(),
        1
    );
    assert_eq!(snapshot.start_player_handle, PlayerHandle::Host);
    assert_eq!(snapshot.signs_map.host, Sign::X);
    assert_eq!(snapshot.signs_map.opponent, Sign::O);
}

#[test]
fn turn_is_derivable_from_snapshot_parity() {
    let derive = |snapshot: &crate::domain::snapshot::SetupSnapshot| {
        let marks = snapshot
            .field
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count();
        if marks % 2 == 0 {
            snapshot.start_player_handle
        } else {
            snapshot.start_player_handle.other()
        }
    };

    for start in [PlayerHandle::Host, PlayerHandle::Opponent] {
        let mut session = GameSession::create(GameConfig {
            start_player_handle: start,
            ..config()
        })
        .unwrap();
        session.attach(endpoint(), None, true, None);
        session.attach(endpoint(), None, true, None);

        let moves = [(0u8, 0u8), (1, 1), (1, 0), (2, 2)];
        let mut mover = start;
        for &(x, y) in &moves {
            let snapshot = session.snapshot(ViewerRole::Spectator, None);
            assert_eq!(derive(&snapshot), session.turn());
            session.apply_move(mover, x, y).unwrap();
            mover = mover.other();
        }
    }
}

#[test]
fn sockets_never_take_automaton_slots() {
    // vs_ai: the opponent slot belongs to the built-in mover.
    let mut session = GameSession::create(GameConfig {
        game_type: GameType::VsAi,
        ..config()
    })
    .unwrap();
    let human = session.attach(endpoint(), None, true, None);
    assert_eq!(human.role, ViewerRole::Host);
    let second = session.attach(endpoint(), None, true, None);
    assert_eq!(second.role, ViewerRole::Spectator);

    let automaton = session.attach_automaton(endpoint(), PlayerHandle::Opponent);
    assert_eq!(automaton.role, ViewerRole::Opponent);
    assert_eq!(session.phase(), Phase::Active);

    // ai_vs_ai: humans only ever spectate.
    let mut session = GameSession::create(GameConfig {
        game_type: GameType::AiVsAi,
        ..config()
    })
    .unwrap();
    session.attach_automaton(endpoint(), PlayerHandle::Host);
    session.attach_automaton(endpoint(), PlayerHandle::Opponent);
    let human = session.attach(endpoint(), None, true, None);
    assert_eq!(human.role, ViewerRole::Spectator);
}

#[test]
fn automaton_attach_to_taken_slot_is_refused() {
    let mut session = GameSession::create(GameConfig {
        game_type: GameType::VsAi,
        ..config()
    })
    .unwrap();
    session.attach_automaton(endpoint(), PlayerHandle::Opponent);
    let duplicate = session.attach_automaton(endpoint(), PlayerHandle::Opponent);
    assert_eq!(duplicate.role, ViewerRole::Spectator);
    assert!(duplicate.events.is_empty());
}
