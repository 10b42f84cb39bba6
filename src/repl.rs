/// REPL (Read-Eval-Print-Loop) over a shared registry
///
/// Plain lines are calculator expressions. Lines starting with `:` are
/// commands: `:fib N`, `:len-sq X Y`, `:ext X Y Z`, `:lex TEXT`.
use std::io::{self, BufRead, Write};
use symcalc::{calculator, lexer, numeric, Registry};

/// Main REPL loop
pub fn repl_loop(registry: &Registry) {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("symcalc> ");
        if let Err(error) = io::stdout().flush() {
            println!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!("Goodbye!");
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(['\n', '\r']);
                if line.trim().is_empty() {
                    continue;
                }
                match respond(line, registry) {
                    Ok(output) => println!("{}", output),
                    Err(error) => println!("Error: {}", error),
                }
            }
            Err(error) => {
                println!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn parse_ints<const N: usize>(args: &str, usage: &str) -> Result<[i64; N], String> {
    let parsed: Vec<i64> = args
        .split_whitespace()
        .map(|arg| arg.parse::<i64>().map_err(|_| format!("'{}' is not an integer; usage: {}", arg, usage)))
        .collect::<Result<_, _>>()?;
    parsed.try_into().map_err(|_| format!("usage: {}", usage))
}

/// Evaluates one line of input.
pub fn respond(line: &str, registry: &Registry) -> Result<String, String> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return calculator::evaluate_with(registry, line).map(|value| value.to_string()).map_err(|e| e.to_string());
    };

    let (name, args) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "fib" => {
            let [n] = parse_ints::<1>(args, ":fib N")?;
            numeric::fib_with(registry, n).map(|value| value.to_string()).map_err(|e| e.to_string())
        }
        "len-sq" => {
            let [x, y] = parse_ints::<2>(args, ":len-sq X Y")?;
            numeric::len_sq_with(registry, x, y).map(|value| value.to_string()).map_err(|e| e.to_string())
        }
        "ext" => {
            let [x, y, z] = parse_ints::<3>(args, ":ext X Y Z")?;
            numeric::ext_with(registry, x, y, z).map(|value| value.to_string()).map_err(|e| e.to_string())
        }
        "lex" => Ok(lexer::show_list(&lexer::lex_to_list(args))),
        other => Err(format!("Unknown command: :{}", other)),
    }
}
