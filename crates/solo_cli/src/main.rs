use anyhow::Context;
use clap::{Parser, Subcommand};
use solo_core::{CharacterProfile, Mood, Responder, ResponseEngine, SoloConfig};
use solo_gateway::GatewayServer;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "solo", author, version, about, long_about = None)]
struct Args {
    /// Path to the service config file (TOML)
    #[arg(short, long, env = "SOLO_CONFIG", default_value = "solo.toml", global = true)]
    config: PathBuf,

    /// Character YAML file; overrides the config file and CHAR_YAML_PATH
    #[arg(long, global = true)]
    character: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load a character file and report template problems
    Check,
    /// Print one reply as JSON
    Say {
        /// Message to reply to
        message: String,
    },
    /// Talk to the character on stdin
    Chat,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_json);

    let mut config = SoloConfig::load_or_default(&args.config);
    if let Some(path) = args.character {
        config.character.path = path;
    }

    let command = args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    info!("Loading character from {}...", config.character.path.display());
    let profile = CharacterProfile::load(&config.character.path)
        .with_context(|| "Failed to load character profile")?;

    match command {
        Command::Serve { host, port } => {
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            serve(profile, &config).await
        }
        Command::Check => check(&profile),
        Command::Say { message } => {
            let engine = ResponseEngine::new(profile);
            let reply = engine.respond(&message)?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
        Command::Chat => chat(ResponseEngine::new(profile)),
    }
}

async fn serve(profile: CharacterProfile, config: &SoloConfig) -> anyhow::Result<()> {
    info!(
        "Solo Character RP v{} serving '{}'",
        env!("CARGO_PKG_VERSION"),
        profile.name
    );
    let engine: Arc<dyn Responder> = Arc::new(ResponseEngine::new(profile));
    let server = GatewayServer::new(engine, &config.server.host, config.server.port);

    server
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutting down...");
        })
        .await
}

fn check(profile: &CharacterProfile) -> anyhow::Result<()> {
    println!("Character: {}", profile.name);
    for mood in Mood::ALL {
        println!("{}", template_line(profile, mood));
    }

    let problems = profile.validate();
    for (mood, err) in &problems {
        println!("  ! {}: {}", mood, err);
    }
    if !profile.has_neutral() {
        println!("  ! no neutral template; unmatched messages are echoed back");
    }
    if !problems.is_empty() {
        anyhow::bail!("{} template(s) will fail to render", problems.len());
    }
    println!("OK");
    Ok(())
}

/// One `check` line: the template in effect for `mood`, or where it falls back to.
fn template_line(profile: &CharacterProfile, mood: Mood) -> String {
    match profile.templates().get(&mood).map(String::as_str) {
        // An empty neutral is used as-is at runtime
        Some("") if mood == Mood::Neutral => format!("  {:<8} (empty)", mood),
        Some(t) if !t.is_empty() => format!("  {:<8} {}", mood, t),
        _ => format!(
            "  {:<8} (falls back to: {})",
            mood,
            profile.template_for(mood)
        ),
    }
}

fn chat(engine: ResponseEngine) -> anyhow::Result<()> {
    let name = engine.profile().name.clone();
    println!("Talking to {}. Type 'quit' to exit, 'reset' to reset.", name);
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();

        match trimmed {
            "quit" | "exit" => break,
            "reset" => engine.reset(),
            "" => {}
            msg => match engine.respond(msg) {
                Ok(reply) => println!("\n{} [{}]: {}\n", name, reply.mood, reply.reply),
                Err(e) => {
                    error!("Failed to render reply: {}", e);
                    println!("\n[System Error]: {}\n", e);
                }
            },
        }

        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
