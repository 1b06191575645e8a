use super::*;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = AppConfig::load_with_env(&config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;
    if let Commands::Serve(args) = &cli.command
        && let Some(bind) = &args.bind
    {
        config.bind_address = bind.clone();
    }
    config.validate()?;

    logging::init(&config);
    info!(
        command = command_label(&cli.command),
        config = %config_path.display(),
        "Running command"
    );

    match cli.command {
        Commands::Serve(_) => server::serve(config).await,
        Commands::Import(args) => handle_import(args, &config).await,
        Commands::Scope(args) => handle_scope(args),
    }
}
