use file_commands::env::LOG_FILTER_VAR;
use file_commands::{Environment, Interpreter, InvalidArgs, parse_args};
use std::ffi::OsString;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_FILTER_VAR))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let env = Environment::new();
    let mut args = std::env::args_os();
    let program = args
        .next()
        .and_then(|p| p.into_string().ok())
        .unwrap_or_else(|| "file_commands".to_string());
    let rest: Result<Vec<String>, OsString> = args.map(OsString::into_string).collect();

    let mut sh = Interpreter::from_environment(&env);

    let parsed = match &rest {
        Ok(rest) => {
            let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
            parse_args(&program, &rest)
        }
        Err(bad) => Err(InvalidArgs {
            output: format!("Argument is not valid UTF-8: {}\n", bad.to_string_lossy()),
            is_error: true,
        }),
    };

    let code = match parsed {
        Ok(command) => {
            let completed = sh.run(&command, &mut std::io::stdout().lock());
            sh.exit_code(&completed)
        }
        Err(invalid) => {
            if invalid.is_error {
                eprint!("{}", invalid.output);
            } else {
                print!("{}", invalid.output);
            }
            invalid.exit_code()
        }
    };

    std::io::stdout().flush()?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
