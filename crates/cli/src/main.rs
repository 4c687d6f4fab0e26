use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tarotboard_core::{
    board_preset, fallback_image, hex_to_color, render_svg, BoardMode, CardPalette,
    FilterSelection, ThemePair, BOARD_PRESETS, MAX_SLOT_CAPACITY,
};
use tarotboard_data::{load_board, load_board_config, resolve_assets_dir, BoardConfig};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Cui,
    Web,
    List,
    Palette,
    Placeholder,
    Slots,
    Help,
}

impl Command {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "cui" => Some(Self::Cui),
            "web" => Some(Self::Web),
            "list" | "ls" => Some(Self::List),
            "palette" => Some(Self::Palette),
            "placeholder" => Some(Self::Placeholder),
            "slots" => Some(Self::Slots),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CliOptions {
    command: Option<Command>,
    positional: Vec<String>,
    assets: Option<PathBuf>,
    preset: Option<String>,
    addr: Option<String>,
    log: Option<PathBuf>,
    out: Option<PathBuf>,
    category: Option<String>,
    stage: Option<String>,
    base: Option<String>,
    accent: Option<String>,
    verbose: bool,
    json: bool,
    data_uri: bool,
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        match arg {
            "--assets" | "-a" => options.assets = Some(PathBuf::from(take_value(args, &mut idx)?)),
            "--preset" | "-p" => options.preset = Some(take_value(args, &mut idx)?),
            "--addr" => options.addr = Some(take_value(args, &mut idx)?),
            "--log" => options.log = Some(PathBuf::from(take_value(args, &mut idx)?)),
            "--out" | "-o" => options.out = Some(PathBuf::from(take_value(args, &mut idx)?)),
            "--category" => options.category = Some(take_value(args, &mut idx)?),
            "--stage" => options.stage = Some(take_value(args, &mut idx)?),
            "--base" => options.base = Some(take_value(args, &mut idx)?),
            "--accent" => options.accent = Some(take_value(args, &mut idx)?),
            "--verbose" | "-v" => options.verbose = true,
            "--json" => options.json = true,
            "--data-uri" => options.data_uri = true,
            "--help" | "-h" => options.command = Some(Command::Help),
            flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
            value => {
                if options.command.is_none() {
                    options.command = Some(
                        Command::parse(value)
                            .with_context(|| format!("unknown command {value}"))?,
                    );
                } else {
                    options.positional.push(value.to_string());
                }
            }
        }
        idx += 1;
    }
    Ok(options)
}

/// The value after the flag at `idx`; advances `idx` past it.
fn take_value(args: &[String], idx: &mut usize) -> Result<String> {
    let flag = &args[*idx];
    let Some(value) = args.get(*idx + 1) else {
        bail!("{flag} needs a value");
    };
    *idx += 1;
    Ok(value.clone())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err:#}");
            print_help();
            std::process::exit(2);
        }
    };
    let command = options.command.unwrap_or(Command::Cui);
    // The terminal board owns the screen, so it only logs when given a file.
    let to_stderr = command != Command::Cui;
    if let Err(err) = init_logging(options.verbose, options.log.as_deref(), to_stderr) {
        eprintln!("logging setup error: {err:#}");
        std::process::exit(1);
    }
    if let Err(err) = run_command(command, &options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>, to_stderr: bool) -> Result<()> {
    let filter = if verbose { "debug" } else { "info" };
    let file_layer = match log_file {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("create log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = (to_stderr && log_file.is_none())
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

fn run_command(command: Command, options: &CliOptions) -> Result<()> {
    debug!(?command, "running command");
    match command {
        Command::Cui => tarotboard_cui::run(tarotboard_cui::LaunchOptions {
            assets: options.assets.clone(),
            preset: options.preset.clone(),
        }),
        Command::Web => tarotboard_web::run(tarotboard_web::LaunchOptions {
            assets: options.assets.clone(),
            preset: options.preset.clone(),
            addr: options.addr.clone(),
        }),
        Command::List => list_cards(options),
        Command::Palette => print_palettes(options),
        Command::Placeholder => write_placeholder(options),
        Command::Slots => print_slots(options),
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

fn list_cards(options: &CliOptions) -> Result<()> {
    let dir = resolve_assets_dir(options.assets.as_deref());
    let loaded = load_board(&dir, options.preset.as_deref())?;
    let selection = FilterSelection::new(
        options.category.as_deref().unwrap_or_default(),
        options.stage.as_deref().unwrap_or_default(),
    );
    let cards = tarotboard_core::visible(&loaded.catalog, &selection);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    for warning in &loaded.warnings {
        eprintln!("warning: {warning}");
    }
    for card in &cards {
        let image = if card.logo.is_some() { "logo" } else { "placeholder" };
        println!(
            "{:<10} {:<28} {:<14} {:<16} {}",
            card.id.as_str(),
            card.name,
            card.category,
            card.stage.as_deref().unwrap_or("-"),
            image
        );
    }
    println!(
        "{} of {} cards (category {}, stage {})",
        cards.len(),
        loaded.catalog.len(),
        selection.category.label(),
        selection.stage.label()
    );
    Ok(())
}

/// `palette <base> <accent>` derives from raw colors; otherwise every card
/// (or the ids given) in the dataset is shown.
fn print_palettes(options: &CliOptions) -> Result<()> {
    if let [base, accent] = options.positional.as_slice() {
        if let (Some(base), Some(accent)) = (hex_to_color(base), hex_to_color(accent)) {
            let config = BoardConfig::default();
            let palette = CardPalette::derive(&ThemePair { base, accent }, &config.catalog.tones);
            print_palette_line("custom", &ThemePair { base, accent }, &palette);
            return Ok(());
        }
    }
    let dir = resolve_assets_dir(options.assets.as_deref());
    let loaded = load_board(&dir, None)?;
    for card in loaded.catalog.cards() {
        let wanted = options.positional.is_empty()
            || options
                .positional
                .iter()
                .any(|id| id == card.id.as_str() || *id == card.source_id.to_string());
        if wanted {
            print_palette_line(card.id.as_str(), &card.theme, &card.palette);
        }
    }
    Ok(())
}

fn print_palette_line(label: &str, theme: &ThemePair, palette: &CardPalette) {
    println!(
        "{label:<10} base {} accent {} -> gradient {} {} aura {}",
        theme.base, theme.accent, palette.gradient_base, palette.gradient_accent, palette.aura
    );
}

fn write_placeholder(options: &CliOptions) -> Result<()> {
    let name = options.positional.join(" ");
    let config = match options.assets.as_deref() {
        Some(dir) => load_board_config(dir)?,
        None => BoardConfig::default(),
    };
    let theme = placeholder_theme(options, &config)?;
    let catalog = &config.catalog;
    let body = if options.data_uri {
        fallback_image(&name, &theme, &catalog.tones, &catalog.placeholder)
    } else {
        render_svg(&name, &theme, &catalog.tones, &catalog.placeholder)
    };
    match options.out.as_deref() {
        Some(path) => {
            fs::write(path, &body).with_context(|| format!("write {}", path.display()))?;
            println!("wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

/// `--base`/`--accent`, falling back to the configured theme defaults.
fn placeholder_theme(options: &CliOptions, config: &BoardConfig) -> Result<ThemePair> {
    let defaults = config.catalog.theme.resolve();
    Ok(ThemePair {
        base: parse_color_flag("--base", options.base.as_deref(), defaults.base)?,
        accent: parse_color_flag("--accent", options.accent.as_deref(), defaults.accent)?,
    })
}

fn parse_color_flag(
    flag: &str,
    value: Option<&str>,
    default: tarotboard_core::Color,
) -> Result<tarotboard_core::Color> {
    match value {
        None => Ok(default),
        Some(raw) => match hex_to_color(raw) {
            Some(color) => Ok(color),
            None => bail!("{flag} expects a hex color, got {raw:?}"),
        },
    }
}

fn print_slots(options: &CliOptions) -> Result<()> {
    let mode = match options.preset.as_deref() {
        Some(name) => board_preset(name).with_context(|| {
            format!("unknown preset {name} (known: {})", BOARD_PRESETS.join(", "))
        })?,
        None => {
            let dir = resolve_assets_dir(options.assets.as_deref());
            load_board_config(&dir)?.mode
        }
    };
    match mode {
        BoardMode::Free => println!("free board: one ordered sequence, no slots"),
        BoardMode::Slotted { slots } => {
            println!("slotted board, capacity 1..={MAX_SLOT_CAPACITY} per slot");
            for (idx, slot) in slots.iter().enumerate() {
                println!(
                    "{:>2}. {:<12} {:<16} capacity {}",
                    idx + 1,
                    slot.id.as_str(),
                    slot.label,
                    slot.capacity
                );
            }
        }
    }
    println!("presets: {}", BOARD_PRESETS.join(", "));
    Ok(())
}

fn print_help() {
    println!("usage: tarotboard [command] [options]");
    println!();
    println!("commands:");
    println!("  cui                      terminal board (default)");
    println!("  web                      JSON API over HTTP (--addr, default 127.0.0.1:7878)");
    println!("  list                     print cards (--category, --stage, --json)");
    println!("  palette [ids|base accent] derived card colors");
    println!("  placeholder <name>       fallback SVG (--base, --accent, --data-uri, --out)");
    println!("  slots                    slot layout of the board or a preset");
    println!();
    println!("options:");
    println!("  -a, --assets <dir>       dataset directory (else TAROTBOARD_ASSETS, else ./assets)");
    println!("  -p, --preset <name>      slot layout preset: {}", BOARD_PRESETS.join(", "));
    println!("  --log <path>             write logs to a file");
    println!("  -v, --verbose            debug logging (RUST_LOG overrides)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_and_flags_in_any_order() {
        let options =
            parse_cli_options(&args(&["-v", "list", "--category", "VC", "--json"])).expect("parse");
        assert_eq!(options.command, Some(Command::List));
        assert_eq!(options.category.as_deref(), Some("VC"));
        assert!(options.verbose);
        assert!(options.json);
    }

    #[test]
    fn positionals_follow_the_command() {
        let options = parse_cli_options(&args(&["placeholder", "Union", "Square", "--base", "#123"]))
            .expect("parse");
        assert_eq!(options.command, Some(Command::Placeholder));
        assert_eq!(options.positional, vec!["Union", "Square"]);
        assert_eq!(options.base.as_deref(), Some("#123"));
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(parse_cli_options(&args(&["dance"])).is_err());
        assert!(parse_cli_options(&args(&["list", "--bogus"])).is_err());
        assert!(parse_cli_options(&args(&["web", "--addr"])).is_err());
    }

    #[test]
    fn color_flags_default_and_validate() {
        let fallback = ThemePair::default().base;
        assert_eq!(parse_color_flag("--base", None, fallback).expect("default"), fallback);
        assert!(parse_color_flag("--base", Some("teal"), fallback).is_err());
    }

    #[test]
    fn placeholder_colors_default_to_configured_theme() {
        let mut config = BoardConfig::default();
        config.catalog.theme.base = "#224466".to_string();
        config.catalog.theme.accent = "not-a-color".to_string();
        let options =
            parse_cli_options(&args(&["placeholder", "Acme", "--accent", "#fff"])).expect("parse");
        let theme = placeholder_theme(&options, &config).expect("theme");
        assert_eq!(theme.base.to_hex(), "#224466");
        assert_eq!(theme.accent.to_hex(), "#ffffff");

        let options = parse_cli_options(&args(&["placeholder", "Acme"])).expect("parse");
        let theme = placeholder_theme(&options, &config).expect("theme");
        assert_eq!(theme.accent, ThemePair::default().accent);
    }
}
