use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::Style;
use gpu_pilot_core::{
    catalog::{parse_candidates, CatalogClient},
    config::{load_config, PilotConfig},
    corpus,
    leaderboard,
    profile::CapabilityProfile,
    rank::{rank, TradeoffMode, MEMORY_SAFETY_MARGIN},
    resolve::resolve_or_estimate,
    select::{select, Selection},
    sync,
};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_tree() -> Style   { Style::new().color256(245) }         // mid gray
fn s_ok() -> Style     { Style::new().color256(114) }         // green
fn s_err() -> Style    { Style::new().color256(167) }         // red
fn s_accent() -> Style { Style::new().color256(109) }         // teal
fn s_label() -> Style  { Style::new().color256(146) }         // muted lavender
fn s_bold() -> Style   { Style::new().bold() }

fn sep(width: usize) -> String {
    s_tree().apply_to("\u{2500}".repeat(width)).to_string()
}

fn fmt_mb(mb: f64) -> String {
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else {
        format!("{mb:.0} MB")
    }
}

fn fmt_age(last_modified_ms: Option<i64>) -> String {
    let Some(ms) = last_modified_ms else {
        return "-".to_string();
    };
    let days = (chrono::Utc::now().timestamp_millis() - ms) / 86_400_000;
    match days {
        d if d < 1 => "today".to_string(),
        d if d < 30 => format!("{d}d ago"),
        d if d < 365 => format!("{}mo ago", d / 30),
        d => format!("{}y ago", d / 365),
    }
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "gpu-pilot",
    about = "Resolve GPU capability from noisy name strings and auto-select a local LLM that fits",
    version,
    after_help = "examples:\n  \
        gpu-pilot resolve \"NVIDIA GeForce RTX 4090\"\n  \
        gpu-pilot select \"Apple M3\" --tier 3\n  \
        gpu-pilot select \"Radeon RX 6600\" --tier 2 --mode quality\n  \
        gpu-pilot models --budget 8192 --mode speed\n  \
        gpu-pilot generate ./benchmarks -o gpu-database.json\n  \
        gpu-pilot sync"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a gpu-pilot.toml config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, short, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a GPU name to its capability profile.
    Resolve {
        /// Raw GPU name as reported by the platform.
        gpu: String,
        /// Hardware tier (0-3) used when the database has no entry.
        #[arg(long, short, default_value_t = 1)]
        tier: u8,
    },
    /// Pick the best model for a GPU from the remote catalog.
    Select {
        gpu: String,
        #[arg(long, short, default_value_t = 1)]
        tier: u8,
        /// speed, balanced or quality.
        #[arg(long, short)]
        mode: Option<String>,
        /// Skip the catalog fetch and rank the fallback list only.
        #[arg(long)]
        offline: bool,
    },
    /// List catalog models ranked against a memory budget.
    Models {
        /// Memory budget in MB.
        #[arg(long, short)]
        budget: u32,
        #[arg(long, short)]
        mode: Option<String>,
    },
    /// Build a reference database from a benchmark corpus directory.
    Generate {
        /// Directory of detect-gpu style benchmark JSON files.
        corpus_dir: PathBuf,
        /// Output path for the database artifact.
        #[arg(long, short, default_value = "gpu-database.json")]
        out: PathBuf,
    },
    /// Refresh the cached reference database.
    Sync,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => load_config(path)?,
        None => PilotConfig::default(),
    };

    match &cli.command {
        Commands::Resolve { gpu, tier } => cmd_resolve(gpu, *tier, cli.json)?,
        Commands::Select {
            gpu,
            tier,
            mode,
            offline,
        } => {
            let mode = parse_mode(mode.as_deref(), &cfg)?;
            cmd_select(&cfg, gpu, *tier, mode, *offline, cli.json).await?;
        }
        Commands::Models { budget, mode } => {
            let mode = parse_mode(mode.as_deref(), &cfg)?;
            cmd_models(&cfg, *budget, mode, cli.json).await?;
        }
        Commands::Generate { corpus_dir, out } => cmd_generate(corpus_dir, out)?,
        Commands::Sync => cmd_sync(&cfg).await?,
    }
    Ok(())
}

fn parse_mode(arg: Option<&str>, cfg: &PilotConfig) -> anyhow::Result<TradeoffMode> {
    match arg {
        Some(s) => TradeoffMode::from_str(s).map_err(|e| anyhow::anyhow!(e)),
        None => Ok(cfg.selection.mode),
    }
}

// ── Resolve ──────────────────────────────────────────────────────────

fn cmd_resolve(gpu: &str, tier: u8, json: bool) -> anyhow::Result<()> {
    let db = sync::load_database_cached()?;
    let Some(profile) = resolve_or_estimate(&db, gpu, tier) else {
        eprintln!("{}", s_err().apply_to("error: empty GPU name"));
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    print_profile(gpu, &profile);
    Ok(())
}

fn print_profile(gpu: &str, p: &CapabilityProfile) {
    let budget = p.budget_mb().unwrap_or(0);
    let mem_kind = if p.memory.vram.is_some() { "vram" } else { "unified" };

    println!();
    println!(
        "{} {} {} · {}",
        s_header().apply_to(gpu),
        s_tree().apply_to("\u{2500}"),
        s_accent().apply_to(p.vendor.to_string()),
        s_label().apply_to(p.platform.to_string()),
    );
    println!("{}", sep(56));
    println!(
        "  {:<14} {} ({}{})",
        s_dim().apply_to("memory"),
        s_bold().apply_to(fmt_mb(budget as f64)),
        mem_kind,
        p.memory
            .kind
            .as_deref()
            .map(|k| format!(", {k}"))
            .unwrap_or_default(),
    );
    println!(
        "  {:<14} {}    {:<6} {}",
        s_dim().apply_to("tier"),
        p.performance.tier,
        s_dim().apply_to("fps"),
        p.performance.fps,
    );
    if let Some(arch) = &p.architecture {
        let year = p.year.map(|y| format!(" ({y})")).unwrap_or_default();
        println!("  {:<14} {arch}{year}", s_dim().apply_to("arch"));
    }
    println!(
        "  {:<14} {}",
        s_dim().apply_to("model budget"),
        s_accent().apply_to(fmt_mb(budget as f64 * MEMORY_SAFETY_MARGIN)),
    );
    println!();
}

// ── Select ───────────────────────────────────────────────────────────

async fn cmd_select(
    cfg: &PilotConfig,
    gpu: &str,
    tier: u8,
    mode: TradeoffMode,
    offline: bool,
    json: bool,
) -> anyhow::Result<()> {
    let db = sync::load_database_cached()?;

    let candidates = if offline {
        Vec::new()
    } else {
        eprintln!("{}", s_dim().apply_to("fetching catalog..."));
        let client = CatalogClient::new();
        match client.fetch_models(&cfg.catalog.author, cfg.catalog.limit).await {
            Ok(raw) => parse_candidates(&raw),
            Err(err) => {
                eprintln!(
                    "{}",
                    s_dim().apply_to(format!("catalog unavailable ({err}), using fallback models"))
                );
                Vec::new()
            }
        }
    };

    let now_ms = chrono::Utc::now().timestamp_millis();
    let selection = match select(&db, gpu, tier, mode, candidates, now_ms) {
        Ok(sel) => sel,
        Err(err) => {
            eprintln!("{}", s_err().apply_to(format!("error: {err}")));
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
        return Ok(());
    }

    print_profile(gpu, &selection.profile);
    print_selection(&selection, mode);
    Ok(())
}

fn print_selection(sel: &Selection, mode: TradeoffMode) {
    let mut ranked = sel.ranked.clone();
    leaderboard::enrich(&mut ranked);

    println!(
        "{} {}",
        s_header().apply_to("ranked candidates"),
        s_label().apply_to(format!("({mode} mode)")),
    );

    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(""),
            Cell::new("model").fg(Color::Grey),
            Cell::new("params").fg(Color::Grey),
            Cell::new("est. memory").fg(Color::Grey),
            Cell::new("updated").fg(Color::Grey),
            Cell::new("score").fg(Color::Grey),
        ]);

    for (i, c) in ranked.iter().enumerate() {
        let marker = if i == 0 { "\u{25cf}" } else { " " };
        let quality = c
            .quality_score
            .map(|s| format!("{s:.0}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(marker).fg(Color::Green),
            Cell::new(&c.id),
            Cell::new(format!("{:.1}B", c.params_b)),
            Cell::new(fmt_mb(c.estimated_memory_mb)),
            Cell::new(fmt_age(c.last_modified_ms)),
            Cell::new(quality),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} {}",
        s_ok().apply_to("selected:"),
        s_bold().apply_to(&sel.chosen),
    );
    println!();
}

// ── Models ───────────────────────────────────────────────────────────

async fn cmd_models(
    cfg: &PilotConfig,
    budget: u32,
    mode: TradeoffMode,
    json: bool,
) -> anyhow::Result<()> {
    eprintln!("{}", s_dim().apply_to("fetching catalog..."));
    let client = CatalogClient::new();
    let raw = client
        .fetch_models(&cfg.catalog.author, cfg.catalog.limit)
        .await?;
    let candidates = parse_candidates(&raw);
    let total = candidates.len();

    let now_ms = chrono::Utc::now().timestamp_millis();
    let mut ranked = rank(candidates, budget as f64, mode, now_ms);
    leaderboard::enrich(&mut ranked);

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    println!();
    println!(
        "{} {}",
        s_header().apply_to(format!("{} of {total} models fit", ranked.len())),
        s_label().apply_to(format!(
            "(budget {}, cutoff {})",
            fmt_mb(budget as f64),
            fmt_mb(budget as f64 * MEMORY_SAFETY_MARGIN),
        )),
    );
    println!("{}", sep(72));
    for (i, c) in ranked.iter().enumerate() {
        println!(
            "  {:>2}. {:<48} {:>7} {:>10} {:>9}",
            i + 1,
            s_bold().apply_to(&c.id),
            s_accent().apply_to(format!("{:.1}B", c.params_b)),
            fmt_mb(c.estimated_memory_mb),
            s_dim().apply_to(fmt_age(c.last_modified_ms)),
        );
    }
    println!("{}", sep(72));
    Ok(())
}

// ── Generate ─────────────────────────────────────────────────────────

fn cmd_generate(corpus_dir: &Path, out: &Path) -> anyhow::Result<()> {
    let mut files: Vec<(String, String)> = Vec::new();
    for entry in std::fs::read_dir(corpus_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "json") {
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push((name, std::fs::read_to_string(&path)?));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    if files.is_empty() {
        anyhow::bail!("no .json corpus files in {}", corpus_dir.display());
    }

    eprintln!(
        "{}",
        s_dim().apply_to(format!("processing {} corpus files...", files.len()))
    );
    let db = corpus::build_database(&files)?;
    std::fs::write(out, db.to_json()?)?;

    println!(
        "{} {} GPUs written to {}",
        s_ok().apply_to("\u{2713}"),
        s_bold().apply_to(db.len().to_string()),
        out.display(),
    );

    // Vendor breakdown.
    let mut counts: std::collections::BTreeMap<String, usize> = Default::default();
    for (_, p) in db.iter() {
        *counts.entry(p.vendor.to_string()).or_default() += 1;
    }
    for (vendor, count) in counts {
        println!("  {:<12} {count}", s_dim().apply_to(vendor));
    }
    Ok(())
}

// ── Sync ─────────────────────────────────────────────────────────────

async fn cmd_sync(cfg: &PilotConfig) -> anyhow::Result<()> {
    eprintln!("{}", s_dim().apply_to("downloading reference database..."));
    let result = sync::sync_database(&cfg.database.url).await?;
    println!(
        "{} database refreshed: {} GPUs",
        s_ok().apply_to("\u{2713}"),
        s_bold().apply_to(result.entry_count.to_string()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_formatting() {
        let now = chrono::Utc::now().timestamp_millis();
        assert_eq!(fmt_age(None), "-");
        assert_eq!(fmt_age(Some(now)), "today");
        assert_eq!(fmt_age(Some(now - 5 * 86_400_000)), "5d ago");
        assert_eq!(fmt_age(Some(now - 90 * 86_400_000)), "3mo ago");
        assert_eq!(fmt_age(Some(now - 800 * 86_400_000)), "2y ago");
    }

    #[test]
    fn mb_formatting() {
        assert_eq!(fmt_mb(512.0), "512 MB");
        assert_eq!(fmt_mb(24576.0), "24.0 GB");
        assert_eq!(fmt_mb(5600.0), "5.5 GB");
    }
}
