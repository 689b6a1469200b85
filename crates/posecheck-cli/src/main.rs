use clap::Parser;
use posecheck_cli::cli::Cli;
use posecheck_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    let common = cli.command.common();

    if let Err(err) = init_logging(common) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    match posecheck_cli::run(&cli.command) {
        Ok(result) => {
            if !common.silent {
                println!("{result}");
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
