//! Random-policy driver for the four-rooms environment.
//!
//! Examples:
//!   fourrooms-cli
//!   fourrooms-cli --envs 8 --steps 100000 --json
//!   fourrooms-cli --size 11 --render --steps 200
//!   fourrooms-cli --config fourrooms.json
//!
//! Logging honours `RUST_LOG` (e.g. `RUST_LOG=fourrooms=debug`).

use fourrooms::prelude::*;
use std::process;
use tracing::{error, info};

#[derive(Debug, Clone)]
struct Args {
    config: VecEnvConfig,
    steps: u64,
    render: bool,
    json: bool,
}

fn usage() -> ! {
    eprintln!("fourrooms-cli: run a random policy in the four-rooms grid world\n");
    eprintln!("Usage: fourrooms-cli [options]\n");
    eprintln!("Options:");
    eprintln!("  --size <N>              Map side length (>= 6, default 19)");
    eprintln!("  --seed <S>              Base seed (default 0)");
    eprintln!("  --envs <N>              Number of independent instances (default 1)");
    eprintln!("  --steps <N>             Host steps to run (default 10000)");
    eprintln!("  --log-interval <N>      Steps between log reports (default 128)");
    eprintln!("  --see-through-walls     Disable line-of-sight occlusion");
    eprintln!("  --config <file.json>    Load a VecEnvConfig; later flags override it");
    eprintln!("  --render                Print instance 0 as text after every step");
    eprintln!("  --json                  Print log summaries as JSON lines");
    process::exit(1);
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    process::exit(2);
}

fn parse_num<T: std::str::FromStr>(flag: &str, value: Option<String>) -> T {
    let Some(value) = value else {
        fail(&format!("{flag} needs a value"));
    };
    value
        .parse()
        .unwrap_or_else(|_| fail(&format!("{flag} must be a number, got '{value}'")))
}

fn parse_args() -> Args {
    let mut args = Args {
        config: VecEnvConfig::default(),
        steps: 10_000,
        render: false,
        json: false,
    };

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => usage(),
            "--config" => {
                let Some(path) = it.next() else {
                    fail("--config needs a path");
                };
                let text = std::fs::read_to_string(&path)
                    .unwrap_or_else(|e| fail(&format!("read {path}: {e}")));
                args.config = VecEnvConfig::from_json(&text)
                    .unwrap_or_else(|e| fail(&format!("{path}: {e}")));
            }
            "--size" => args.config.env.size = parse_num("--size", it.next()),
            "--seed" => args.config.seed = parse_num("--seed", it.next()),
            "--envs" => args.config.num_envs = parse_num("--envs", it.next()),
            "--steps" => args.steps = parse_num("--steps", it.next()),
            "--log-interval" => args.config.log_interval = parse_num("--log-interval", it.next()),
            "--see-through-walls" => args.config.env.see_through_walls = true,
            "--render" => args.render = true,
            "--json" => args.json = true,
            other => {
                eprintln!("Unknown option: {other}");
                usage();
            }
        }
    }
    args
}

fn print_summary(tick: u64, s: &LogSummary, json: bool) {
    if json {
        match serde_json::to_string(s) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("serialize log: {e}"),
        }
    } else {
        println!(
            "step={:<8} episodes={:<6} perf={:.3} score={:.3} return={:.3} length={:.1}",
            tick, s.episodes, s.perf, s.score, s.episode_return, s.episode_length,
        );
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = parse_args();
    let mut envs = match VecEnv::new(args.config.clone()) {
        Ok(v) => v,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!(steps = args.steps, "starting random rollout");

    // The driver's own randomness stays separate from the environments'.
    let mut policy = Prng::new(args.config.seed ^ 0x504F_4C49_4359);
    let mut actions = vec![0i32; envs.num_envs()];

    for tick in 1..=args.steps {
        for a in actions.iter_mut() {
            // Only left, right and forward do anything.
            *a = policy.below(3) as i32;
        }
        if let Err(e) = envs.step(&actions) {
            error!("{e}");
            process::exit(1);
        }

        if args.render {
            if let Some(env) = envs.env(0) {
                let snap = EnvAdapter::new(env).snapshot();
                println!("tick {} reward {:.1}\n{}", snap.tick, envs.rewards()[0], snap.to_ascii());
            }
        }

        if envs.should_log(tick) {
            if let Some(summary) = envs.log() {
                print_summary(tick, &summary, args.json);
            }
        }
    }

    if let Some(summary) = envs.log() {
        print_summary(args.steps, &summary, args.json);
    }
    envs.close();
    info!("done");
}
