#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::sync::Arc;
#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use battlegrid::{
    init_logging, serve, Cell, GameApi, GameStatus, GameStore, Grid, InMemoryTransport,
    Position, ServerConfig, Skeleton, Stub, Symbol, UserId,
};
#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use log::info;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::seq::IndexedRandom;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Serve games over TCP.
    Serve {
        #[arg(long, default_value = "127.0.0.1:7878")]
        bind: String,
        #[arg(long, default_value_t = 30, help = "Per-frame read/write timeout in seconds")]
        timeout: u64,
        #[arg(long, default_value_t = 1 << 20, help = "Largest accepted frame in bytes")]
        max_frame: u32,
        #[arg(long, help = "Fix RNG seed for reproducible boat layouts (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Play one game between two random players in this process.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            timeout,
            max_frame,
            seed,
        } => {
            let config = ServerConfig {
                bind,
                io_timeout: Duration::from_secs(timeout),
                max_frame_size: max_frame,
                ..ServerConfig::default()
            };
            let store = Arc::new(match seed {
                Some(s) => GameStore::with_seed(config.event_capacity, s),
                None => GameStore::new(config.event_capacity),
            });
            let listener = TcpListener::bind(&config.bind).await?;
            info!("listening on {}", listener.local_addr()?);
            serve(listener, store, config).await?;
        }
        Commands::Local { seed } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let store = Arc::new(match seed {
                Some(s) => GameStore::with_seed(ServerConfig::default().event_capacity, s),
                None => GameStore::default(),
            });
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_rng(&mut rand::rng()),
            };
            let mut alice = connect(&store, UserId(1));
            let mut bob = connect(&store, UserId(2));
            run_local(&mut alice, &mut bob, &mut rng).await?;
            alice.close().await?;
            bob.close().await?;
        }
    }
    Ok(())
}

/// A stub talking to its own skeleton task over an in-memory pair.
#[cfg(feature = "std")]
fn connect(store: &Arc<GameStore>, user: UserId) -> Stub<InMemoryTransport> {
    let (client, server) = InMemoryTransport::pair();
    let mut skeleton = Skeleton::new(store.clone(), server);
    tokio::spawn(async move {
        if let Err(e) = skeleton.run().await {
            log::error!("local session ended: {}", e);
        }
    });
    Stub::new(client, user)
}

#[cfg(feature = "std")]
async fn run_local(
    x: &mut Stub<InMemoryTransport>,
    o: &mut Stub<InMemoryTransport>,
    rng: &mut SmallRng,
) -> anyhow::Result<()> {
    let game = x.create_game().await?;
    o.join_game(game.id).await?;
    println!("{} started: {} plays x, {} plays o", game.id, x.user(), o.user());

    loop {
        let view = x
            .get_game(game.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("{} vanished", game.id))?;
        if view.status == GameStatus::Finished {
            print_board(&view.board);
            match view.winner {
                Some(symbol) => println!("{} wins", symbol),
                None => println!("draw"),
            }
            return Ok(());
        }
        let proposed = random_move(&view.board, view.turn, rng)?;
        let mover = match view.turn {
            Symbol::X => &mut *x,
            Symbol::O => &mut *o,
        };
        let moved = mover.apply_move(game.id, proposed).await?;
        println!(
            "{} marks {}{}",
            view.turn,
            moved.outcome.position,
            if moved.outcome.hit { " - hit!" } else { "" }
        );
    }
}

#[cfg(feature = "std")]
fn random_move(board: &Grid, symbol: Symbol, rng: &mut SmallRng) -> anyhow::Result<Grid> {
    let empty: Vec<Position> = Position::all()
        .filter(|p| board.get(*p) == Cell::Empty)
        .collect();
    let pos = empty
        .choose(rng)
        .ok_or_else(|| anyhow::anyhow!("no empty cell left"))?;
    Ok(board.with(*pos, symbol.mark()))
}

#[cfg(feature = "std")]
fn print_board(board: &Grid) {
    for row in board.rows() {
        let line: String = row
            .iter()
            .map(|c| match c.symbol() {
                Some(Symbol::X) => 'x',
                Some(Symbol::O) => 'o',
                None => '.',
            })
            .collect();
        println!("{}", line);
    }
}
