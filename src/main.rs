mod cli;
mod repl;

use clap::Parser;
use cli::{Args, Command};
use repl::repl_loop;

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.resolver_config();
    log::debug!("Resolver configuration: {:?}", config);

    let registry = match symcalc::standard_registry(config) {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    };

    match args.command.unwrap_or(Command::Repl) {
        Command::Repl => {
            println!("symcalc REPL v0.1.0");
            println!("Type expressions to evaluate, :fib N, :len-sq X Y, :ext X Y Z or :lex TEXT.");
            println!("Press Ctrl+D to quit.");
            println!();
            repl_loop(&registry);
        }
        command => match cli::run(command, &registry) {
            Ok(output) => println!("{}", output),
            Err(error) => {
                eprintln!("Error: {}", error);
                std::process::exit(1);
            }
        },
    }
}
