use clap::Parser;
use traffic_network::config::CheckArgs;
use traffic_network::file_loader::load_network;

fn main() {
    env_logger::init();

    let args = CheckArgs::parse();
    match load_network(&args.network) {
        Ok(network) => println!("{}", network),
        Err(e) => {
            eprintln!("{}: {}", args.network.display(), e);
            std::process::exit(1);
        }
    }
}
