mod cli;

use tfcomponents::{Config, Diagnostics};

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TFCOMPONENTS_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Validate(validate_cli) => validate(validate_cli),
        cli::Command::Inspect(inspect_cli) => inspect(inspect_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn validate(cli: cli::ValidateCommand) -> anyhow::Result<()> {
    let (configs, diagnostics) = load(&cli.input)?;

    report(&diagnostics);
    if diagnostics.has_errors() {
        return Err(diagnostics.into());
    }

    eprintln!("{} configuration file(s) are valid", configs.len());
    Ok(())
}

pub fn inspect(cli: cli::InspectCommand) -> anyhow::Result<()> {
    let (config, diagnostics) = tfcomponents::load_config_file(&cli.file);
    report(&diagnostics);

    let Some(config) = config else {
        return Err(diagnostics.into());
    };

    match cli.output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &config)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), &config)?,
    };

    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<(Vec<Config>, Diagnostics)> {
    let mut configs = vec![];
    let mut diagnostics = Diagnostics::new();

    let mut directories = input.directories.clone();
    if input.workdir {
        directories.push(std::env::current_dir()?);
    }

    for file_path in &input.files {
        let (config, file_diagnostics) = tfcomponents::load_config_file(file_path);
        configs.extend(config);
        diagnostics.extend(file_diagnostics);
    }

    for dir_path in &directories {
        let (dir_configs, dir_diagnostics) = tfcomponents::load_config_dir(dir_path);
        configs.extend(dir_configs);
        diagnostics.extend(dir_diagnostics);
    }

    anyhow::ensure!(
        !configs.is_empty() || diagnostics.has_errors(),
        "No files loaded"
    );

    Ok((configs, diagnostics))
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        eprintln!("{diagnostic}");
    }
}
