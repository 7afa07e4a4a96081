// simulation_main.rs
use clap::Parser;
use std::error::Error;
use tokio::time::{sleep, Duration};
use traffic_network::config::SimulationArgs;
use traffic_network::file_loader::load_network;
use traffic_network::monitoring::{log_to_csv, CongestionReport};

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = SimulationArgs::parse();
    if let Err(e) = run_simulation(args).await {
        eprintln!("Simulation error: {}", e);
        std::process::exit(1);
    }
}

async fn run_simulation(args: SimulationArgs) -> Result<(), Box<dyn Error>> {
    let mut network = load_network(&args.network)?;
    log::info!(
        "Loaded {} with {} intersections, running {} seconds",
        args.network.display(),
        network.intersections().count(),
        args.ticks
    );

    for tick in 1..=args.ticks {
        if args.tick_ms > 0 {
            sleep(Duration::from_millis(args.tick_ms)).await;
        }
        network.one_second();

        let report = CongestionReport::from_network(&network, tick);
        if let Some(worst) = report.most_congested() {
            log::info!(
                "[{}s] most congested route {}:{} at {}%",
                tick,
                worst.from,
                worst.to,
                worst.congestion
            );
        }
        if let Some(path) = &args.csv {
            log_to_csv(path, &report.routes)?;
        }
    }

    println!("{}", network);
    if args.json {
        println!("{}", CongestionReport::from_network(&network, args.ticks).to_json()?);
    }
    Ok(())
}
