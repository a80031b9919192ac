use std::{env, fs, io, path::Path};

use flex::{
    runtime::{
        eval::{DEFAULT_MAX_CALL_DEPTH, Evaluator},
        natives::HELP_LINES,
        output::ConsoleSink,
    },
    session::{Reply, Session, read_entry, run_source},
    syntax::program::{Instruction, Program},
};

fn main() {
    let mut args: Vec<String> = env::args().collect();
    let trace = args.iter().any(|arg| arg == "--trace");
    if trace {
        args.retain(|arg| arg != "--trace");
    }
    let max_depth = match extract_max_depth(&mut args) {
        Some(depth) => depth,
        None => std::process::exit(1),
    };

    if args.len() < 2 {
        print_help();
        return;
    }

    if is_json_file(&args[1]) {
        run_file(&args[1], trace, max_depth);
        return;
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => {
            print_help();
        }
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: flex run <file.json>");
                std::process::exit(1);
            }
            run_file(&args[2], trace, max_depth);
        }
        "tokens" => {
            if args.len() < 3 {
                eprintln!("Usage: flex tokens <file.json>");
                std::process::exit(1);
            }
            show_tokens(&args[2]);
        }
        "repl" => {
            repl(trace, max_depth);
        }
        other => {
            eprintln!("Error: unknown command `{}'", other);
            print_help();
            std::process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        "\
FLEX stack-language evaluator

Usage:
  flex <file.json>
  flex run <file.json>
  flex tokens <file.json>
  flex repl

Flags:
  --trace            Print every instruction and the stack before it runs
  --max-depth <n>    Limit nested program calls (default: {})
  -h, --help         Show this help message",
        DEFAULT_MAX_CALL_DEPTH
    );
}

fn extract_max_depth(args: &mut Vec<String>) -> Option<usize> {
    let mut max_depth = DEFAULT_MAX_CALL_DEPTH;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--max-depth" {
            if i + 1 >= args.len() {
                eprintln!("Usage: flex <file.json> --max-depth <n>");
                return None;
            }
            let value = args.remove(i + 1);
            args.remove(i);
            match value.parse::<usize>() {
                Ok(parsed) if parsed > 0 => max_depth = parsed,
                _ => {
                    eprintln!("Error: --max-depth expects a positive integer.");
                    return None;
                }
            }
            continue;
        }
        i += 1;
    }
    Some(max_depth)
}

fn is_json_file(path: &str) -> bool {
    Path::new(path).extension().and_then(|ext| ext.to_str()) == Some("json")
}

fn new_evaluator(trace: bool, max_depth: usize) -> Evaluator<ConsoleSink> {
    let mut evaluator = Evaluator::new(ConsoleSink);
    evaluator.set_trace(trace);
    evaluator.set_max_call_depth(max_depth);
    evaluator
}

fn run_file(path: &str, trace: bool, max_depth: usize) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut evaluator = new_evaluator(trace, max_depth);
    match run_source(&source, &mut evaluator) {
        Ok(()) => {}
        Err(err) if err.is_termination() => println!("{}", err),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

fn show_tokens(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            std::process::exit(1);
        }
    };
    let program = match Program::parse(&source) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    println!("Instructions from {}:", path);
    println!("{}", "─".repeat(50));
    for (i, instruction) in program.instructions().iter().enumerate() {
        println!(
            "{:>4} {:<10} {}",
            i,
            instruction.kind_label(),
            instruction.text()
        );
        if let Instruction::Invalid { error, .. } = instruction {
            println!(
                "{:>4} {:<10} [{} {}] {}",
                "",
                "",
                error.kind().code(),
                error.kind().title(),
                error
            );
        }
    }
}

fn repl(trace: bool, max_depth: usize) {
    use io::Write;

    println!(
        "FLEX REPL v{} (type :help for help, :quit to exit)",
        env!("CARGO_PKG_VERSION")
    );

    let mut session = Session::with_evaluator(new_evaluator(trace, max_depth));

    loop {
        print!("> ");
        io::stdout().flush().unwrap_or_default();

        // The lock is released between entries: `read-line` prompts read
        // stdin while a program runs.
        let input = match read_entry(&mut io::stdin().lock(), continuation_prompt) {
            Some(input) => input,
            None => break,
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        match trimmed {
            ":quit" | ":q" => break,
            ":help" | ":h" => {
                print_repl_help();
                continue;
            }
            _ => {}
        }

        let reply = session.submit(trimmed);
        println!("{}", reply);
        if reply == Reply::Dead {
            break;
        }
    }

    println!("Goodbye!");
}

fn continuation_prompt() {
    use io::Write;

    print!("... ");
    io::stdout().flush().unwrap_or_default();
}

fn print_repl_help() {
    println!(
        "\
Commands:
  :quit, :q    Exit the REPL
  :help, :h    Show this help message

Enter a program as a JSON array; it runs in the session context.
Multi-line input: unmatched brackets trigger continuation prompt.
The `help' function lists the language basics:"
    );
    for line in HELP_LINES {
        println!("  {}", line);
    }
}
