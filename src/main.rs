use std::path::PathBuf;
use std::time::Duration;

use chess_bot::config::{get_profiles, load_profile, save_profile, DEFAULT_PROFILES_DIR};
use chess_bot::game::board::uci;
use chess_bot::selfplay::{play_game, SelfPlayConfig};
use chess_bot::{ChessBot, GameBoard, SearchConfig, TimeLimit};
use clap::Parser;
use serde::Serialize;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Position to analyse, defaults to the starting position
    #[arg(long)]
    fen: Option<String>,

    /// UCI moves to play from the position before searching
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,

    /// Fixed time for this move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// White's remaining clock in milliseconds
    #[arg(long)]
    wtime: Option<u64>,

    /// Black's remaining clock in milliseconds
    #[arg(long)]
    btime: Option<u64>,

    #[arg(long, default_value_t = 0)]
    winc: u64,

    #[arg(long, default_value_t = 0)]
    binc: u64,

    /// The opponent has offered a draw
    #[arg(long)]
    draw_offered: bool,

    /// Search profile to load from the profiles directory
    #[arg(long)]
    profile: Option<String>,

    #[arg(long, default_value = DEFAULT_PROFILES_DIR)]
    profiles_dir: PathBuf,

    /// Save the active search settings under this profile name
    #[arg(long)]
    save_profile: Option<String>,

    /// List saved profiles and exit
    #[arg(long)]
    list_profiles: bool,

    /// Penalize the side ahead in material for repeating positions
    #[arg(long)]
    anti_repetition: bool,

    /// Play this many engine-vs-engine games instead of analysing
    #[arg(long)]
    selfplay: Option<usize>,

    /// Self-play clock per side in seconds
    #[arg(long, default_value_t = 60)]
    clock: u64,

    /// Self-play increment in seconds
    #[arg(long, default_value_t = 1)]
    increment: u64,

    /// Random opening plies in self-play
    #[arg(long, default_value_t = 0)]
    random_plies: usize,

    /// Self-play games are drawn after this many plies
    #[arg(long, default_value_t = 200)]
    max_plies: usize,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct MoveReport {
    fen: String,
    best_move: String,
    san: String,
    score: i32,
    depth: u8,
    draw_offer: bool,
}

fn time_limit(args: &Args) -> Option<TimeLimit> {
    if let Some(ms) = args.movetime {
        return Some(TimeLimit::PerMove(Duration::from_millis(ms)));
    }
    match (args.wtime, args.btime) {
        (None, None) => None,
        (white, black) => Some(TimeLimit::Clock {
            white: Duration::from_millis(white.or(black).unwrap_or_default()),
            black: Duration::from_millis(black.or(white).unwrap_or_default()),
            white_inc: Duration::from_millis(args.winc),
            black_inc: Duration::from_millis(args.binc),
        }),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    if args.list_profiles {
        for name in get_profiles(&args.profiles_dir)? {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = match &args.profile {
        Some(name) => load_profile(&args.profiles_dir, name)?,
        None => SearchConfig::default(),
    };
    if args.anti_repetition {
        config.anti_repetition = true;
    }
    if let Some(name) = &args.save_profile {
        save_profile(&args.profiles_dir, name, &config)?;
        tracing::info!(profile = %name, "saved profile");
    }

    if let Some(games) = args.selfplay {
        let settings = SelfPlayConfig {
            initial_clock: Duration::from_secs(args.clock),
            increment: Duration::from_secs(args.increment),
            random_plies: args.random_plies,
            max_plies: args.max_plies,
        };
        let mut rng = rand::thread_rng();
        for game in 1..=games {
            let record = play_game(config.clone(), config.clone(), &settings, &mut rng);
            println!("[Game \"{game}\"]\n[Result \"{}\"]\n\n{} {}\n", record.result, record.movetext, record.result);
        }
        return Ok(());
    }

    let mut board = match &args.fen {
        Some(fen) => GameBoard::from_fen(fen)?,
        None => GameBoard::new(),
    };
    for text in &args.moves {
        let m = board.parse_uci(text)?;
        board.push(m);
    }

    let limit = time_limit(&args);
    let mut bot = ChessBot::new(config);
    let Some(result) = bot.choose_move(&mut board, limit.as_ref(), false, args.draw_offered, None) else {
        return Err(format!("no legal moves in {}", board.fen()).into());
    };

    let report = MoveReport {
        fen: board.fen(),
        best_move: uci(&result.best_move),
        san: board.san(result.best_move),
        score: result.score,
        depth: result.depth,
        draw_offer: result.draw_offer,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
