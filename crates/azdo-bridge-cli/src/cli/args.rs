use super::*;

#[derive(Parser)]
#[command(author, version, about = "Imports Azure DevOps repositories into Wharf")]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Path to config.json")]
    pub(super) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve(ServeArgs),
    #[command(about = "Run one import without the server and print the summary")]
    Import(ImportArgs),
    #[command(about = "Show how a Wharf group and project map to an Azure DevOps scope")]
    Scope(ScopeArgs),
}

#[derive(Parser)]
pub(super) struct ServeArgs {
    #[arg(long, help = "Listen address, overrides BIND_ADDRESS")]
    pub(super) bind: Option<String>,
}

#[derive(Parser)]
pub(super) struct ImportArgs {
    #[arg(long)]
    pub(super) group: String,
    #[arg(long)]
    pub(super) project: Option<String>,
    #[arg(long, default_value = "")]
    pub(super) url: String,
    #[arg(long)]
    pub(super) user: Option<String>,
    #[arg(long)]
    pub(super) token: Option<String>,
    #[arg(long)]
    pub(super) token_id: Option<u64>,
    #[arg(long)]
    pub(super) provider_id: Option<u64>,
    #[arg(long)]
    pub(super) upload_url: Option<String>,
    #[arg(long, help = "Authorization header value sent to the Wharf API")]
    pub(super) auth: Option<String>,
}

impl ImportArgs {
    pub(super) fn to_request(&self) -> ImportRequest {
        ImportRequest {
            token_id: self.token_id,
            token: self.token.clone(),
            user_name: self.user.clone(),
            url: self.url.clone(),
            upload_url: self.upload_url.clone(),
            provider_id: self.provider_id,
            project_id: None,
            project: self.project.clone(),
            group: self.group.clone(),
        }
    }
}

#[derive(Parser)]
pub(super) struct ScopeArgs {
    #[arg(long)]
    pub(super) group: String,
    #[arg(long)]
    pub(super) project: Option<String>,
}

pub(super) fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Serve(_) => "serve",
        Commands::Import(_) => "import",
        Commands::Scope(_) => "scope",
    }
}
