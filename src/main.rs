use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use dictfier::Options;
use dictfier::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "dictfier")]
#[command(about = "dictfier - shape JSON documents into nested maps with declarative queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MissingArg {
    /// Abort on the first absent attribute
    Fail,
    /// Insert null for absent attributes
    Null,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and execute a query
    Check {
        /// The query, in JSON notation (e.g. '["name", {"address": ["city"]}]')
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate the query shape, don't execute
        #[arg(long)]
        syntax_only: bool,

        /// What to do when an attribute is absent
        #[arg(long, value_enum, default_value = "fail")]
        missing: MissingArg,

        /// JSON literal inserted for absent attributes (overrides --missing)
        #[arg(long)]
        default: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            pretty,
            syntax_only,
            missing,
            default,
        } => cli::missing_policy(missing == MissingArg::Null, default.as_deref()).and_then(
            |missing| {
                let options = CheckOptions {
                    query,
                    input: None,
                    syntax_only,
                    options: Options {
                        missing,
                        ..Default::default()
                    },
                };
                run_check(options, input, pretty)
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions, input: Option<String>, pretty: bool) -> Result<(), CliError> {
    options.input = match input {
        Some(s) => Some(s),
        None if !options.syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Query is valid"),
        CheckResult::Success(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
