//! capstan-mcp server: entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use capstan_mcp::protocol::ProtocolHandler;
use capstan_mcp::session::SessionStore;
use capstan_mcp::transport::StdioTransport;
use capstan_mcp::{McpServer, ServerConfig};

#[derive(Parser)]
#[command(
    name = "capstan-mcp",
    about = "MCP server with per-session handshake tracking and capability dispatch",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Readiness policy: relaxed admits requests before the handshake
    /// completes, strict rejects them. Also reads CAPSTAN_READINESS.
    #[arg(long)]
    readiness: Option<String>,

    /// Server name advertised in initialize. Also reads CAPSTAN_SERVER_NAME.
    #[arg(long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server identity, capabilities and catalog as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   capstan-mcp completions bash > ~/.local/share/bash-completion/completions/capstan-mcp
    ///   capstan-mcp completions zsh > ~/.zfunc/_capstan-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::resolve(cli.name.as_deref(), cli.readiness.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!(
                "{} v{} (readiness: {})",
                config.server_info.name,
                config.server_info.version,
                config.readiness
            );
            let server = McpServer::builtin(config);
            let handler = ProtocolHandler::new(server, SessionStore::new());
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Info => {
            let server = McpServer::builtin(config);
            let config = server.config();
            let names = |items: Vec<String>| serde_json::json!(items);
            let info = serde_json::json!({
                "server": config.server_info,
                "protocol_version": config.protocol_version,
                "capabilities": config.capabilities,
                "readiness": config.readiness,
                "tools": names(server.tools().list_tools().into_iter().map(|t| t.name).collect()),
                "prompts": names(server.prompts().list_prompts().into_iter().map(|p| p.name).collect()),
                "resources": names(server.resources().list_resources().into_iter().map(|r| r.uri).collect()),
                "resource_templates": names(
                    server.resources().list_templates().into_iter().map(|t| t.uri_template).collect()
                ),
                "completions": server.completions().keys(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "capstan-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
