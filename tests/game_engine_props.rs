use battlegrid::{Cell, Game, GameError, GameId, GameStatus, Position, Symbol, UserId};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

fn rank(status: GameStatus) -> u8 {
    match status {
        GameStatus::Pending => 0,
        GameStatus::Started => 1,
        GameStatus::Finished => 2,
    }
}

/// One attempted action: who submits, which symbol they write, where.
fn attempt() -> impl Strategy<Value = (bool, bool, usize, usize)> {
    (any::<bool>(), any::<bool>(), 0..5usize, 0..5usize)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random submissions from both players: refusals never change the game,
    /// accepted non-final moves hand the turn over, and status only moves
    /// forward.
    #[test]
    fn random_play_respects_the_state_machine(
        seed in any::<u64>(),
        join_after in 0..3usize,
        attempts in prop::collection::vec(attempt(), 1..80),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Game::create(GameId(1), ALICE, &mut rng);

        for (i, (by_alice, write_x, r, c)) in attempts.into_iter().enumerate() {
            if i == join_after {
                game.join(BOB, &mut rng).unwrap();
            }
            let user = if by_alice { ALICE } else { BOB };
            let symbol = if write_x { Symbol::X } else { Symbol::O };
            let proposed = game.board().with(Position::new(r, c).unwrap(), symbol.mark());

            let before = game.clone();
            match game.apply_move(user, &proposed) {
                Err(e) => {
                    prop_assert_eq!(&game, &before);
                    match before.status() {
                        GameStatus::Pending if user == ALICE => {
                            prop_assert_eq!(e, GameError::GameNotStarted);
                        }
                        GameStatus::Finished => {
                            prop_assert_eq!(e, GameError::GameAlreadyFinished);
                        }
                        _ => {}
                    }
                }
                Ok(outcome) => {
                    prop_assert_eq!(before.status(), GameStatus::Started);
                    prop_assert_eq!(before.turn(), symbol);
                    prop_assert_eq!(before.board().get(outcome.position), Cell::Empty);
                    prop_assert_eq!(*game.board(), proposed);
                    if outcome.finished {
                        prop_assert_eq!(game.status(), GameStatus::Finished);
                        prop_assert_eq!(game.winner(), outcome.winner);
                    } else {
                        prop_assert_eq!(game.turn(), symbol.other());
                        prop_assert_eq!(game.winner(), None);
                    }
                }
            }
            prop_assert!(rank(game.status()) >= rank(before.status()));
        }
    }

    /// A move by whoever is not on turn is always refused with `NotYourTurn`.
    #[test]
    fn off_turn_moves_are_refused(seed in any::<u64>(), r in 0..5usize, c in 0..5usize) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut game = Game::create(GameId(1), ALICE, &mut rng);
        game.join(BOB, &mut rng).unwrap();
        let proposed = game.board().with(Position::new(r, c).unwrap(), Symbol::O.mark());
        prop_assert_eq!(game.apply_move(BOB, &proposed), Err(GameError::NotYourTurn));
    }
}
