use clap::Parser;
use prjrem::cli::commands::set::SetArgs;
use prjrem::cli::{Cli, Commands};

fn main() {
    prjrem::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Gen { ref length } => {
            prjrem::cli::commands::gen::execute(&cli, length.as_deref())
        }
        Commands::Info => prjrem::cli::commands::info::execute(&cli),
        Commands::Location { ref path } => prjrem::cli::commands::location::execute(&cli, path),
        Commands::Set {
            ref key,
            ref secret,
            ask,
            ref length,
            ref description,
        } => prjrem::cli::commands::set::execute(
            &cli,
            &SetArgs {
                key,
                secret: secret.as_deref(),
                ask,
                length: length.as_deref(),
                description: description.as_deref(),
            },
        ),
        Commands::Get {
            ref identifier,
            copy,
        } => prjrem::cli::commands::get::execute(&cli, identifier, copy),
        Commands::List => prjrem::cli::commands::list::execute(&cli),
        Commands::Delete { ref key, force } => {
            prjrem::cli::commands::delete::execute(&cli, key, force)
        }
        Commands::Describe {
            ref identifier,
            ref description,
        } => prjrem::cli::commands::describe::execute(&cli, identifier, description.as_deref()),
        Commands::Export { ref output } => {
            prjrem::cli::commands::export::execute(&cli, output.as_deref())
        }
        Commands::Import { ref file } => prjrem::cli::commands::import_cmd::execute(&cli, file),
        Commands::Edit => prjrem::cli::commands::edit::execute(&cli),
        Commands::Passwd => prjrem::cli::commands::passwd::execute(&cli),
    };

    if let Err(e) = result {
        prjrem::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
