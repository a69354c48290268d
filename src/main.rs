use clap::{Parser, Subcommand};
use linkdraw::{
    ConfigError, DrawConfig, DrawEngine, DrawOutcome, DrawState, LinkBuilder, LinkError, LinkMode,
    PoolItem, StateCodec, now_ms,
};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot publish link: {0}")]
    Link(#[from] LinkError),
    #[error("unrecognized draw link: {0}")]
    InvalidLink(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "linkdraw",
    about = "Fair one-at-a-time draws carried entirely in share links"
)]
struct Cli {
    #[arg(long, env = "DRAW_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "DRAW_QUERY_PARAM")]
    param: Option<String>,

    #[arg(long, env = "DRAW_POOL", help = "Comma-separated item labels")]
    pool: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List pool items with their indices.
    Pool,
    /// Start a new draw and print its share link.
    Host {
        #[arg(long, default_value_t = false, help = "Emit a legacy base64 token")]
        legacy: bool,
    },
    /// Draw one item from a link or token and print the next link.
    Draw { link: String },
    /// Show what a link or token holds.
    Inspect { link: String },
    /// Re-encode a link or token in the legacy grammar.
    Legacy { link: String },
}

struct CliContext {
    codec: StateCodec,
    engine: DrawEngine,
    links: LinkBuilder,
}

fn main() -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DrawConfig::from_sources(cli.base_url, cli.param, cli.pool)?;
    tracing::debug!(
        base_url = %config.base_url,
        param = %config.query_param,
        items = config.pool.len(),
        "config loaded"
    );

    let ctx = CliContext {
        codec: StateCodec::new(config.pool.clone()),
        engine: DrawEngine::new(config.pool.clone()),
        links: LinkBuilder::from_config(&config),
    };

    match cli.command {
        Command::Pool => run_pool(&ctx),
        Command::Host { legacy } => run_host(&ctx, legacy),
        Command::Draw { link } => run_draw(&ctx, &link),
        Command::Inspect { link } => run_inspect(&ctx, &link),
        Command::Legacy { link } => run_legacy(&ctx, &link),
    }
}

fn run_pool(ctx: &CliContext) -> Result<(), CliError> {
    let items: Vec<Value> = ctx
        .codec
        .pool()
        .iter()
        .enumerate()
        .map(|(index, item)| json!({ "index": index, "id": item.id, "label": item.label }))
        .collect();
    print_json(&Value::Array(items))
}

fn run_host(ctx: &CliContext, legacy: bool) -> Result<(), CliError> {
    let state = DrawState::fresh(ctx.codec.pool(), Some(now_ms()));
    let token = if legacy {
        ctx.codec.encode_legacy(&state)
    } else {
        ctx.codec.encode(&state)
    };
    let link = ctx.links.link_for(&token)?;

    tracing::info!(items = state.remaining_count(), "new draw created");
    print_json(&json!({
        "link": link.as_str(),
        "token": token,
        "remaining": state.remaining_count(),
    }))
}

fn run_draw(ctx: &CliContext, input: &str) -> Result<(), CliError> {
    let state = resolve_state(ctx, input)?;

    match ctx.engine.draw_random(&state) {
        DrawOutcome::Picked(pick) => {
            let link = ctx.links.publish(&ctx.codec, &pick.next)?;
            tracing::info!(index = pick.index, left = pick.next.remaining_count(), "item drawn");
            print_json(&json!({
                "picked": { "index": pick.index, "id": pick.item.id, "label": pick.item.label },
                "remaining": pick.next.remaining_count(),
                "link": link.as_str(),
            }))
        }
        DrawOutcome::Exhausted => {
            tracing::info!("draw is already complete");
            print_json(&json!({ "exhausted": true, "remaining": 0 }))
        }
    }
}

fn run_inspect(ctx: &CliContext, input: &str) -> Result<(), CliError> {
    let state = resolve_state(ctx, input)?;
    let pool = ctx.codec.pool();

    print_json(&json!({
        "remaining": labels(&state.remaining_items(pool)),
        "drawn": labels(&state.drawn_items(pool)),
        "created_at": state.created_at,
        "exhausted": state.is_exhausted(),
        "token": ctx.codec.encode(&state),
    }))
}

fn run_legacy(ctx: &CliContext, input: &str) -> Result<(), CliError> {
    let state = resolve_state(ctx, input)?;
    let token = ctx.codec.encode_legacy(&state);
    let link = ctx.links.link_for(&token)?;
    print_json(&json!({ "link": link.as_str(), "token": token }))
}

fn resolve_state(ctx: &CliContext, input: &str) -> Result<DrawState, CliError> {
    match ctx.links.resolve(&ctx.codec, Some(input), now_ms()) {
        LinkMode::Host(state) => {
            tracing::info!("link carries no token; starting a new draw");
            Ok(state)
        }
        LinkMode::Participant(state) => Ok(state),
        LinkMode::Invalid => Err(CliError::InvalidLink(input.to_owned())),
    }
}

fn labels(items: &[&PoolItem]) -> Vec<String> {
    items.iter().map(|item| item.label.clone()).collect()
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
