#[macro_use]
extern crate log;

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufWriter};
use std::process::ExitCode;
use std::thread;

use env_logger::Env;
use imu_stream::config::{pathset, Config};
use imu_stream::link::{self, channel};
use imu_stream::pipeline::{exit_code, Pipeline};
use imu_stream::sync::{Event, Notifier};
use imu_stream::telemetry::{JsonLines, LogPublisher, Publisher};
use simulator::{spawn, Motion};

fn load_config(matches: &clap::ArgMatches) -> Result<Config, String> {
    let mut config = match matches.value_of("config") {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Read config file {} failed: {}", path, e))?;
            Config::from_json(&json).map_err(|e| format!("Parse config file {} failed: {}", path, e))?
        }
        None => Config::default(),
    };
    for assignment in matches.values_of("set").into_iter().flatten() {
        pathset::apply(&mut config, assignment).map_err(|e| format!("{}: {}", assignment, e))?;
    }
    if matches.is_present("blocking") {
        config.link.queue.blocking = true;
    }
    Ok(config)
}

fn stream<P>(receiver: link::Receiver, publisher: P, cancel: Event) -> u8
where
    P: Publisher,
    P::Error: Display,
{
    let mut pipeline = Pipeline::new(receiver, publisher, cancel).with_status(io::stdout());
    let code = exit_code(&pipeline.run());
    info!("{} batches, {} frames streamed", pipeline.batches(), pipeline.frames());
    code
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let matches = clap::App::new("simulator")
        .version("0.1")
        .author("qiuchengxuan")
        .about("IMU stream simulator")
        .arg(clap::Arg::with_name("config").long("config").help("Config file").takes_value(true))
        .arg(clap::Arg::with_name("rate").long("rate").help("Frame rate").takes_value(true))
        .arg(clap::Arg::with_name("output").long("output").help("Telemetry file").takes_value(true))
        .arg(clap::Arg::with_name("frames").long("frames").help("Frames to produce").takes_value(true))
        .arg(clap::Arg::with_name("blocking").long("blocking").help("Never drop frames"))
        .arg(
            clap::Arg::with_name("set")
                .long("set")
                .help("Override config, path=value")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(error) => {
            println!("{}", error);
            return ExitCode::FAILURE;
        }
    };
    let rate = match matches.value_of("rate").map(str::parse::<u16>) {
        None => config.sensors.frame_rate(),
        Some(Ok(rate)) if rate > 0 => rate,
        Some(_) => {
            println!("Rate not a positive number");
            return ExitCode::FAILURE;
        }
    };
    let frames = match matches.value_of("frames").map(str::parse::<usize>) {
        None => None,
        Some(Ok(frames)) => Some(frames),
        Some(Err(_)) => {
            println!("Frames not a number");
            return ExitCode::FAILURE;
        }
    };

    let output = match matches.value_of("output") {
        Some(path) => match File::create(path) {
            Ok(file) => Some(BufWriter::new(file)),
            Err(error) => {
                println!("Create telemetry file {} failed: {}", path, error);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let (reporter, receiver) = match channel(&config.link) {
        Ok(link) => link,
        Err(error) => {
            println!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let cancel = Event::default();
    let notifier = cancel.clone();
    if let Err(error) = ctrlc::set_handler(move || notifier.notify()) {
        warn!("Unable to install Ctrl-C handler: {}", error);
    }
    let notifier = cancel.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim_start().starts_with('q') => return notifier.notify(),
                Ok(_) => continue,
                Err(_) => return,
            }
        }
    });

    let stop = Event::default();
    let producer = spawn(reporter, Motion::new(rate), stop.clone(), frames);
    info!("Streaming at {} Hz, press q or Ctrl-C to stop", rate);

    let recording = config.telemetry.recording.as_str();
    let code = match output {
        Some(writer) => stream(receiver, JsonLines::new(writer, recording), cancel),
        None => stream(receiver, LogPublisher::new(recording), cancel),
    };

    stop.notify();
    match producer.join() {
        Ok(Ok(_)) => (),
        Ok(Err(error)) => debug!("Producer stopped: {}", error),
        Err(_) => error!("Producer panicked"),
    }
    ExitCode::from(code)
}
