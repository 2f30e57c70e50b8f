use std::env;
use std::fs;
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use tabloop::render::MAX_COLUMNS;
use tabloop::{demo_tab, load_tab, render_tab, CapoPlayer, PlaybackConfig};

const USAGE: &str = "Usage: tabloop [--tab FILE] [--tap MEASURE:X] [--loop] [--seconds S] [--columns N] [--snapshot]";

struct Options {
    tab_path: Option<String>,
    tap: Option<(usize, f64)>,
    arm_loop: bool,
    seconds: f64,
    columns: usize,
    snapshot: bool,
}

fn usage_exit(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        tab_path: None,
        tap: None,
        arm_loop: false,
        seconds: 0.0,
        columns: 48,
        snapshot: false,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1);
        match flag {
            "--tab" => {
                let path = value.unwrap_or_else(|| usage_exit("--tab needs a file"));
                options.tab_path = Some(path.clone());
                i += 1;
            }
            "--tap" => {
                let tap = value.unwrap_or_else(|| usage_exit("--tap needs MEASURE:X"));
                let (measure, x) = tap
                    .split_once(':')
                    .unwrap_or_else(|| usage_exit("--tap expects MEASURE:X, e.g. 3:300"));
                let measure = measure
                    .parse::<usize>()
                    .ok()
                    .filter(|m| *m >= 1)
                    .unwrap_or_else(|| usage_exit("measure numbers start at 1"));
                let x: f64 = x
                    .parse()
                    .unwrap_or_else(|_| usage_exit("tap x must be a number"));
                options.tap = Some((measure - 1, x));
                i += 1;
            }
            "--loop" => options.arm_loop = true,
            "--seconds" => {
                options.seconds = value
                    .and_then(|v| v.parse().ok())
                    .filter(|s: &f64| s.is_finite() && *s >= 0.0)
                    .unwrap_or_else(|| usage_exit("--seconds needs a non-negative number"));
                i += 1;
            }
            "--columns" => {
                let columns = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or_else(|| usage_exit("--columns needs a whole number"));
                if columns > MAX_COLUMNS {
                    usage_exit(&format!("--columns may be at most {}", MAX_COLUMNS));
                }
                options.columns = columns;
                i += 1;
            }
            "--snapshot" => options.snapshot = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => usage_exit(&format!("Unknown argument '{}'", other)),
        }
        i += 1;
    }

    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    let (tab, config) = match &options.tab_path {
        Some(path) => {
            let source = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading file '{}': {}", path, e);
                    process::exit(1);
                }
            };
            match load_tab(&source) {
                Ok(loaded) => loaded,
                Err(e) => {
                    eprintln!("Error loading tab: {}", e);
                    process::exit(1);
                }
            }
        }
        None => (demo_tab(), PlaybackConfig::default()),
    };

    let mut player = match CapoPlayer::new(tab, config) {
        Ok(player) => player,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Some((measure, x)) = options.tap {
        player.on_tap(measure, x);
    }
    if options.arm_loop {
        player.toggle_active_loop();
    }

    let geometry = player.config().fretboard;
    if options.seconds > 0.0 {
        if player.active_measure().is_none() {
            eprintln!("Nothing to play: pass --tap MEASURE:X to place the capo first");
        } else {
            player.toggle_playback();
            let interval = player.config().tick_interval();
            let started = Instant::now();
            let mut last_frame = started;
            player.pump(started);

            while started.elapsed().as_secs_f64() < options.seconds {
                thread::sleep(interval);
                let now = Instant::now();
                player.pump(now);
                if now.duration_since(last_frame) >= Duration::from_secs(1) {
                    println!("{}", render_tab(&player.snapshot(), &geometry, options.columns));
                    last_frame = now;
                }
            }
            player.teardown();
        }
    }

    println!("{}", render_tab(&player.snapshot(), &geometry, options.columns));

    if options.snapshot {
        match serde_yaml::to_string(&player.snapshot()) {
            Ok(yaml) => println!("{}", yaml),
            Err(e) => {
                eprintln!("Error writing snapshot: {}", e);
                process::exit(1);
            }
        }
    }
}
