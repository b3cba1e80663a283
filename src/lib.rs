pub mod board;
pub mod client;
pub mod planner;
pub mod state;

/// dimensional analysis types
type Ticks = u16;
type Score = u16;
type Cost = i32;

// maze dimensions
const ROWS: usize = 31;
const COLS: usize = 28;

// mode cadence (ticks per mode period)
const CHASE_STEPS: u8 = 175;
const SCATTER_STEPS: u8 = 65;
const ENDGAME_PELLETS: u32 = 20;

// fright and fruit parameters
const FRIGHT_STEPS: u8 = 40;
const FRUIT_STEPS: u8 = 30;
const FRUIT_CELL: (u8, u8) = (17, 13);
const FRUIT_SPAWN_COUNTS: [u32; 2] = [174, 74];

// planner parameters
const PLAN_DEPTH: usize = 8;
const VICTIM_BONUS: Cost = 50;
const PENALTY_RADIUS: u16 = 6;
const PENALTY_SCALE: f64 = 0.1;
const PENALTY_DECAY: f64 = 50.0;
const DANGER_RADIUS: u16 = 2;
const FRUIT_DIVISOR: u16 = 20;

// dispatcher parameters
const QUEUE_BOUND: usize = 64;
const ACK_POLL: std::time::Duration = std::time::Duration::from_millis(25);

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging and exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
