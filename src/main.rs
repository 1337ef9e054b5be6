use calq::{Calculator, Settings, SymbolTable, MAX_DECIMAL_PLACES};
use clap::Parser;
use env_logger::Env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const HELP: &str = "\
Type a formula such as `v^2 = u^2 + 2*a*s` to solve it for every symbol.
A formula without `=` is solved as `a = <formula>`.
Saved values are referenced as \\V1, \\V2, ..., constants as \\c, \\hbar, ...

Commands:
  :save               save the first result value as the next V<n>
  :clear              clear the variable memory
  :memory             show the variable memory
  :constants [query]  list constants, optionally filtered
  :decimals <n>       set the number of decimals (0 to 10)
  :help               show this message";

#[derive(Parser)]
#[command(
    name = "calq",
    version = env!("CARGO_PKG_VERSION"),
    about = "Solve formulas for every symbol, one formula per line",
    after_help = r#"
Environment Variables:
  CALQ_CONFIG=<path>   Path to the settings file
  CALQ_DECIMALS=<n>    Number of decimals in results
  RUST_LOG=<filter>    Log filter (default: warn)
"#
)]
struct Cli {
    /// Settings file, created by `:decimals`
    #[arg(long, env = "CALQ_CONFIG", default_value = "calq.toml")]
    config: PathBuf,

    /// Number of decimals in results, overriding the settings file
    #[arg(long, env = "CALQ_DECIMALS", value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_DECIMAL_PLACES)))]
    decimals: Option<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    let mut settings = Settings::load_or_default(&cli.config);
    if let Some(decimals) = cli.decimals {
        if let Err(err) = settings.set_decimal_places(decimals) {
            log::warn!("{}", err);
        }
    }
    log::debug!("Settings: {:?}", settings);

    let mut calculator = Calculator::new(settings);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("cannot read standard input: {}", err);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let reply = match line.strip_prefix(':') {
            Some(command) => run_command(&mut calculator, command, &cli.config),
            None => calculator.solve(line).to_string(),
        };
        if writeln!(out, "{}", reply).is_err() {
            break;
        }
    }
}

/// Run a `:command` and return the text to print
fn run_command(calculator: &mut Calculator, command: &str, config: &Path) -> String {
    let (name, argument) = command
        .trim()
        .split_once(char::is_whitespace)
        .map_or((command.trim(), ""), |(name, arg)| (name, arg.trim()));
    match name {
        "save" => match calculator.save_to_memory() {
            Ok(name) => format!("Saved to memory as {}", name),
            Err(err) => format!("Error: {}", err),
        },
        "clear" => {
            calculator.clear_memory();
            calculator.display().to_string()
        }
        "memory" => {
            let memory = calculator.memory_display();
            if memory.is_empty() {
                "Variable memory is empty.".to_string()
            } else {
                memory
            }
        }
        "constants" => legend(calculator.symbols(), argument),
        "decimals" => set_decimals(calculator, argument, config),
        "help" => HELP.to_string(),
        _ => format!("Error: unknown command ':{}', try :help", name),
    }
}

fn legend(symbols: &SymbolTable, query: &str) -> String {
    let lines: Vec<String> = symbols
        .constants()
        .search(query)
        .into_iter()
        .map(calq::Constant::legend_line)
        .collect();
    if lines.is_empty() {
        format!("No constant matches '{}'", query)
    } else {
        lines.join("\n")
    }
}

fn set_decimals(calculator: &mut Calculator, argument: &str, config: &Path) -> String {
    if argument.is_empty() {
        return format!("decimals = {}", calculator.settings().decimal_places());
    }
    let places = match argument.parse::<u8>() {
        Ok(places) => places,
        Err(_) => return format!("Error: '{}' is not a number of decimals", argument),
    };
    if let Err(err) = calculator.settings_mut().set_decimal_places(places) {
        return format!("Error: {}", err);
    }
    match calculator.settings().save_to_file(config) {
        Ok(()) => format!("decimals = {}", places),
        Err(err) => format!("decimals = {} (not saved: {})", places, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> (Calculator, TempDir) {
        (Calculator::default(), TempDir::new().unwrap())
    }

    #[test]
    fn memory_commands() {
        let (mut calculator, dir) = session();
        let config = dir.path().join("calq.toml");
        calculator.solve("x + 1 = 5");
        assert_eq!(run_command(&mut calculator, "save", &config), "Saved to memory as V1");
        assert_eq!(run_command(&mut calculator, "memory", &config), "V1: 4.000000");
        assert_eq!(run_command(&mut calculator, "clear", &config), "Variable memory cleared.");
        assert_eq!(run_command(&mut calculator, "memory", &config), "Variable memory is empty.");
        assert_eq!(
            run_command(&mut calculator, "save", &config),
            "Error: Invalid solution format. Unable to save."
        );
    }

    #[test]
    fn decimals_are_validated_and_persisted() {
        let (mut calculator, dir) = session();
        let config = dir.path().join("calq.toml");

        let reply = run_command(&mut calculator, "decimals 11", &config);
        assert!(reply.starts_with("Error: settings: decimal_places must be between 0 and 10"), "{}", reply);
        assert!(run_command(&mut calculator, "decimals two", &config).starts_with("Error: "));
        assert!(!config.exists());
        assert_eq!(calculator.settings().decimal_places(), 6);

        assert_eq!(run_command(&mut calculator, "decimals 3", &config), "decimals = 3");
        assert_eq!(Settings::load_from_file(&config).unwrap().decimal_places(), 3);
        assert_eq!(run_command(&mut calculator, "decimals", &config), "decimals = 3");
        assert_eq!(calculator.solve("1/3"), "a = 0.333");
    }

    #[test]
    fn other_commands() {
        let (mut calculator, dir) = session();
        let config = dir.path().join("calq.toml");
        assert_eq!(run_command(&mut calculator, "help", &config), HELP);
        assert_eq!(
            run_command(&mut calculator, "frobnicate", &config),
            "Error: unknown command ':frobnicate', try :help"
        );
        assert_eq!(
            run_command(&mut calculator, "constants zzzz", &config),
            "No constant matches 'zzzz'"
        );
        assert!(run_command(&mut calculator, "constants hbar", &config).contains("hbar (hbar): "));
    }
}
