use std::sync::Arc;

use battlegrid::protocol::PROTOCOL_VERSION;
use battlegrid::{
    GameApi, GameError, GameId, GameStatus, GameStore, InMemoryTransport, InvalidMove, Message, Position,
    Skeleton, Stub, Symbol, Transport, UserId,
};
use tokio::task::JoinHandle;

const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

type Session = (Stub<InMemoryTransport>, JoinHandle<anyhow::Result<()>>);

fn connect(store: &Arc<GameStore>, user: UserId) -> Session {
    let (client, server) = InMemoryTransport::pair();
    let mut skeleton = Skeleton::new(store.clone(), server);
    let task = tokio::spawn(async move { skeleton.run().await });
    (Stub::new(client, user), task)
}

#[tokio::test]
async fn test_full_game_over_stub() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::with_seed(64, 1));
    let (mut alice, alice_task) = connect(&store, ALICE);
    let (mut bob, bob_task) = connect(&store, BOB);

    let game = alice.create_game().await?;
    assert_eq!(game.status, GameStatus::Pending);
    let joined = bob.join_game(game.id).await?;
    assert_eq!(joined.symbol, Symbol::O);

    // x takes the top row while o fills the second; one boat per row means
    // neither side can sink every boat first
    let mut board = game.board;
    for col in 0..5 {
        board = board.with(Position::new(0, col)?, Symbol::X.mark());
        let moved = alice.apply_move(game.id, board).await?;
        if col == 4 {
            assert!(moved.outcome.finished);
            assert_eq!(moved.game.winner, Some(Symbol::X));
            break;
        }
        assert!(!moved.outcome.finished);
        board = board.with(Position::new(1, col)?, Symbol::O.mark());
        let moved = bob.apply_move(game.id, board).await?;
        assert!(!moved.outcome.finished);
        assert_eq!(moved.game.turn, Symbol::X);
    }

    let seen = bob.get_game(game.id).await?.expect("game exists");
    assert_eq!(seen.status, GameStatus::Finished);
    assert_eq!(seen.winner, Some(Symbol::X));
    assert_eq!(seen.board, board);

    alice.close().await?;
    bob.close().await?;
    alice_task.await??;
    bob_task.await??;
    Ok(())
}

#[tokio::test]
async fn test_refusal_downcasts_to_game_error() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::new(16));
    let (mut alice, _task) = connect(&store, ALICE);
    let (mut bob, _bob_task) = connect(&store, BOB);

    let game = alice.create_game().await?;
    let err = alice.join_game(game.id).await.unwrap_err();
    assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameNotJoinable));

    bob.join_game(game.id).await?;
    let err = alice.apply_move(game.id, game.board).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<GameError>(),
        Some(&GameError::InvalidMove(InvalidMove::NoChange))
    );

    let err = bob.join_game(GameId(999)).await.unwrap_err();
    assert_eq!(err.downcast_ref::<GameError>(), Some(&GameError::GameNotFound));

    // the session survives refusals
    assert_eq!(alice.list_games().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_poll_events_sees_public_updates() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::new(16));
    let (mut watcher, _w) = connect(&store, UserId(9));
    // first request opens the session and subscribes
    assert!(watcher.poll_events().await?.is_empty());

    let (mut alice, _a) = connect(&store, ALICE);
    let (mut bob, _b) = connect(&store, BOB);
    let game = alice.create_game().await?;
    bob.join_game(game.id).await?;

    let events = watcher.poll_events().await?;
    let kinds: Vec<&str> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["ADD_GAME", "UPDATE_GAME"]);
    assert!(events
        .iter()
        .flat_map(|e| e.payload().players.iter().flatten())
        .all(|p| p.boats.is_none()));
    assert!(watcher.poll_events().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_handshake_version_mismatch() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::new(4));
    let (mut client, server) = InMemoryTransport::pair();
    let mut skeleton = Skeleton::new(store, server);
    let task = tokio::spawn(async move { skeleton.run().await });

    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION + 1,
            user: ALICE,
        })
        .await?;
    match client.recv().await? {
        Message::HelloAck { version } => assert_eq!(version, PROTOCOL_VERSION),
        other => panic!("expected HelloAck, got {:?}", other),
    }
    let result = task.await?;
    assert!(result.unwrap_err().to_string().contains("version mismatch"));
    Ok(())
}

#[tokio::test]
async fn test_request_before_hello_is_rejected() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::new(4));
    let (mut client, server) = InMemoryTransport::pair();
    let mut skeleton = Skeleton::new(store, server);
    let task = tokio::spawn(async move { skeleton.run().await });

    client.send(Message::ListGames).await?;
    assert!(task.await?.is_err());
    Ok(())
}

#[tokio::test]
async fn test_hangup_without_bye_is_an_error() -> anyhow::Result<()> {
    let store = Arc::new(GameStore::new(4));
    let (mut client, server) = InMemoryTransport::pair();
    let mut skeleton = Skeleton::new(store, server);
    let task = tokio::spawn(async move { skeleton.run().await });

    client
        .send(Message::Hello {
            version: PROTOCOL_VERSION,
            user: ALICE,
        })
        .await?;
    assert!(matches!(client.recv().await?, Message::HelloAck { .. }));
    drop(client);

    let err = task.await?.unwrap_err();
    assert!(err.to_string().contains("Channel closed"));
    Ok(())
}
