//! Client adapter tests - a scripted server talking to `spawn_client`

mod common;

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use reversi::adapter::{run_player, spawn_client, ClientError, ClientEvent, GameOutcome};
use reversi::engine::MaxFlipSelector;
use reversi::types::{Color, MatchRequest, Move};

use common::Peer;

fn mv(row: u8, col: u8) -> Move {
    Move::new(row, col).unwrap()
}

async fn next_event(events: &mut UnboundedReceiver<ClientEvent>) -> ClientEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timeout waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_turn_cycle() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME true").await;
    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::Welcomed {
            color: Color::Black
        }
    );
    assert_eq!(client.handle.play(mv(2, 4)), Err(ClientError::NotYourTurn));

    server.send("MAKE_MOVE 2 4 3 5 4 2 5 3").await;
    let ClientEvent::TurnStarted { legal, board } = next_event(&mut client.events).await else {
        panic!("expected TurnStarted");
    };
    assert_eq!(legal.len(), 4);
    assert_eq!(board.current_player(), Color::Black);

    assert_eq!(
        client.handle.play(mv(0, 0)),
        Err(ClientError::IllegalMove(mv(0, 0)))
    );
    client.handle.play(mv(2, 4)).unwrap();
    server.expect("MOVE 2 4").await;

    server.send("PIECE_UPDATE 2 4 BLACK").await;
    server.send("PIECE_UPDATE 3 4 BLACK").await;
    server.send("MOVE_MADE 4 1").await;
    next_event(&mut client.events).await;
    next_event(&mut client.events).await;
    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::ScoreChanged { black: 4, white: 1 }
    );

    let state = client.handle.state();
    assert!(!state.my_turn);
    assert_eq!(state.board.get(mv(3, 4)), Some(Color::Black));
    assert_eq!((state.black, state.white), (4, 1));
    assert_eq!(client.handle.pass(), Err(ClientError::NotYourTurn));

    server.send("GAME_WON").await;
    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::GameEnded {
            outcome: GameOutcome::Won
        }
    );
    let result = tokio::time::timeout(Duration::from_secs(2), client.task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(result.unwrap(), GameOutcome::Won);
}

#[tokio::test]
async fn test_consent_round_trip() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME false").await;
    next_event(&mut client.events).await;
    assert_eq!(
        client.handle.respond(true),
        Err(ClientError::NoPendingRequest)
    );

    server.send("RESTART").await;
    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::ConsentRequested {
            request: MatchRequest::Restart
        }
    );
    client.handle.respond(false).unwrap();
    server.expect("RESTART false").await;
}

#[tokio::test]
async fn test_request_needs_turn() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME true").await;
    next_event(&mut client.events).await;
    assert_eq!(
        client.handle.request(MatchRequest::Save),
        Err(ClientError::NotYourTurn)
    );

    server.send("MAKE_MOVE 2 4").await;
    next_event(&mut client.events).await;
    client.handle.request(MatchRequest::Save).unwrap();
    server.expect("SAVE").await;
}

#[tokio::test]
async fn test_client_only_verb_from_server_ends_loop() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME true").await;
    next_event(&mut client.events).await;
    server.send("PASS").await;
    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::Disconnected
    );
    assert!(client.task.await.unwrap().is_err());
}

#[tokio::test]
async fn test_server_hangup_reports_disconnect() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    drop(server_end);

    assert_eq!(
        next_event(&mut client.events).await,
        ClientEvent::Disconnected
    );
    let err = client.task.await.unwrap().unwrap_err();
    assert!(err.is_stream_closed());
}

#[tokio::test]
async fn test_each_prompt_is_answered_once() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME true").await;
    server.send("MAKE_MOVE 2 4 3 5 4 2 5 3").await;
    next_event(&mut client.events).await;
    next_event(&mut client.events).await;

    client.handle.request(MatchRequest::Save).unwrap();
    assert_eq!(client.handle.play(mv(2, 4)), Err(ClientError::NotYourTurn));
    assert_eq!(client.handle.pass(), Err(ClientError::NotYourTurn));
    server.expect("SAVE").await;

    // Prompted again once the save went through.
    server.send("MAKE_MOVE 2 4 3 5 4 2 5 3").await;
    next_event(&mut client.events).await;
    client.handle.play(mv(5, 3)).unwrap();
    assert_eq!(client.handle.play(mv(2, 4)), Err(ClientError::NotYourTurn));
    server.expect("MOVE 5 3").await;
}

#[tokio::test]
async fn test_request_is_answered_once() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let mut client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME false").await;
    server.send("LOAD").await;
    next_event(&mut client.events).await;
    next_event(&mut client.events).await;

    client.handle.respond(true).unwrap();
    assert_eq!(
        client.handle.respond(false),
        Err(ClientError::NoPendingRequest)
    );
    server.expect("LOAD true").await;

    server.send("QUIT").await;
    next_event(&mut client.events).await;
    client.handle.respond(false).unwrap();
    server.expect("QUIT false").await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_player_ignores_repeated_prompt() {
    let (client_end, server_end) = tokio::io::duplex(1024);
    let client = spawn_client(client_end);
    let mut server = Peer::new(server_end);

    server.send("WELCOME true").await;
    server.send("MAKE_MOVE 2 4").await;
    server.send("MAKE_MOVE 2 4").await;
    let handle = client.handle;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while handle.state().prompts < 2 {
        assert!(tokio::time::Instant::now() < deadline, "prompts not mirrored");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let mut events = client.events;
    let player = tokio::task::spawn_blocking(move || {
        let mut selector = MaxFlipSelector::new();
        run_player(&mut selector, &handle, &mut events)
    });

    server.expect("MOVE 2 4").await;
    server.send("GAME_TIED").await;
    let outcome = tokio::time::timeout(Duration::from_secs(2), player)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, Some(GameOutcome::Tied));
    // The handle is gone, so the writer closes without a second MOVE.
    server.expect_eof().await;
}
