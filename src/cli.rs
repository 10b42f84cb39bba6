/// Command line interface
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use symcalc::bake::{self, ConstantThunk};
use symcalc::{calculator, lexer, numeric, Registry, ResolverConfig};

/// Resolves expressions by pattern dispatch and bakes the results into machine code
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Maximum number of nested rule resolutions
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Log resolution steps at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a calculator expression, e.g. "1 + 2 * 3 / 4 - 5"
    Eval { expression: String },

    /// Fibonacci by value dispatch
    #[command(allow_negative_numbers = true)]
    Fib { n: i64 },

    /// x*x + y*y by destructuring Vec2<x, y>
    #[command(allow_negative_numbers = true)]
    LenSq { x: i64, y: i64 },

    /// Extend Vec2<x, y> to Vec3<x, y, z>
    #[command(allow_negative_numbers = true)]
    Ext { x: i64, y: i64, z: i64 },

    /// Show the Cons/Nil list a string lexes to
    Lex { text: String },

    /// Evaluate an expression and write the result into an ELF object file
    Bake {
        expression: String,

        /// Object file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Name of the exported data symbol
        #[arg(long, default_value = "calc_result")]
        symbol: String,
    },

    /// Evaluate an expression, then read the result back from generated machine code
    Jit { expression: String },

    /// Interactive loop (the default)
    Repl,
}

impl Args {
    pub fn resolver_config(&self) -> ResolverConfig {
        let config = ResolverConfig::from_env();
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }
}

/// Runs a one-shot command, returning the text to print.
pub fn run(command: Command, registry: &Registry) -> Result<String, String> {
    match command {
        Command::Eval { expression } => {
            let value = calculator::evaluate_with(registry, &expression).map_err(|e| e.to_string())?;
            Ok(format!("Result of '{}' = {}", expression, value))
        }
        Command::Fib { n } => {
            let value = numeric::fib_with(registry, n).map_err(|e| e.to_string())?;
            Ok(format!("fib({}) = {}", n, value))
        }
        Command::LenSq { x, y } => {
            let value = numeric::len_sq_with(registry, x, y).map_err(|e| e.to_string())?;
            Ok(format!("len_sq(Vec2<{}, {}>) = {}", x, y, value))
        }
        Command::Ext { x, y, z } => {
            let value = numeric::ext_with(registry, x, y, z).map_err(|e| e.to_string())?;
            Ok(format!("ext(Vec2<{}, {}>, {}) = {}", x, y, z, value))
        }
        Command::Lex { text } => Ok(lexer::show_list(&lexer::lex_to_list(&text))),
        Command::Bake { expression, output, symbol } => {
            let value = calculator::evaluate_with(registry, &expression).map_err(|e| e.to_string())?;
            bake::write_object(&output, &symbol, value).map_err(|e| e.to_string())?;
            Ok(format!(
                "Baked '{}' = {} into '{}' as {} and {}{}",
                expression,
                value,
                output.display(),
                symbol,
                symbol,
                bake::GETTER_SUFFIX
            ))
        }
        Command::Jit { expression } => {
            let value = calculator::evaluate_with(registry, &expression).map_err(|e| e.to_string())?;
            let thunk = ConstantThunk::compile(value).map_err(|e| e.to_string())?;
            Ok(format!("Result of '{}' = {}", expression, thunk.call()))
        }
        Command::Repl => Err("the REPL is started from main".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        symcalc::standard_registry(ResolverConfig::default()).expect("standard families register")
    }

    #[test]
    fn test_parse_subcommands() {
        let args = Args::parse_from(["symcalc", "--max-depth", "40", "len-sq", "-3", "4"]);
        assert_eq!(args.max_depth, Some(40));
        assert!(matches!(args.command, Some(Command::LenSq { x: -3, y: 4 })));

        let args = Args::parse_from(["symcalc", "fib", "-1"]);
        assert!(matches!(args.command, Some(Command::Fib { n: -1 })));

        let args = Args::parse_from(["symcalc", "--max-depth", "10000000", "fib", "5"]);
        assert_eq!(args.resolver_config().max_depth, symcalc::config::MAX_DEPTH_CEILING);

        let args = Args::parse_from(["symcalc"]);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_run_commands() {
        let registry = registry();
        assert_eq!(
            run(Command::Eval { expression: "1 + 2 * 3 / 4 - 5".to_string() }, &registry),
            Ok("Result of '1 + 2 * 3 / 4 - 5' = -3".to_string())
        );
        assert_eq!(run(Command::Fib { n: 7 }, &registry), Ok("fib(7) = 13".to_string()));
        assert_eq!(run(Command::LenSq { x: 3, y: 4 }, &registry), Ok("len_sq(Vec2<3, 4>) = 25".to_string()));
        assert_eq!(run(Command::Ext { x: 1, y: 2, z: 3 }, &registry), Ok("ext(Vec2<1, 2>, 3) = Vec3<1, 2, 3>".to_string()));
        assert_eq!(run(Command::Lex { text: "foo".to_string() }, &registry), Ok("Cons<'f', Cons<'o', Cons<'o', Nil>>>".to_string()));
    }

    #[test]
    fn test_run_reports_errors() {
        let registry = registry();
        assert_eq!(run(Command::Eval { expression: "1 / 0".to_string() }, &registry), Err("Division by zero".to_string()));
        assert!(run(Command::Fib { n: -1 }, &registry).is_err());
    }
}
