use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use instint::config::PaletteConfig;
use instint::gradient::GradientAttr;
use instint::logging::{init_logging, LogConfig, LogFormat};
use instint::report::{JsonFormatter, PaletteFormatter, PaletteReport, TextFormatter};
use instint::{Hswl, Palette, RawAction};

#[derive(Parser, Debug)]
#[command(name = "instint", about = "Derive an accessible color palette from a base color")]
struct Cli {
    /// JSON palette configuration. Missing fields take defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random source (random roots and `random_color`).
    #[arg(long)]
    seed: Option<u64>,

    /// JSON array of actions to apply, e.g. `[{"type": "changed_hue", "value": 120}]`.
    #[arg(short, long)]
    actions: Option<PathBuf>,

    /// Root color as `#rrggbb` or `#rgb`.
    #[arg(short, long, conflicts_with = "preset")]
    base: Option<String>,

    /// Start from one of the curated root colors.
    #[arg(long)]
    preset: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also print gradient stops varying this attribute (h, s, wl or con).
    #[arg(short, long)]
    gradient: Option<GradientAttr>,

    /// Increase log verbosity (-v, -vv, -vvv). From -vv on, events carry
    /// their module path.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_format(cli.log_format)
        .with_ansi(io::stderr().is_terminal())
        .with_target(cli.verbose >= 2);
    init_logging(&log_config).wrap_err("failed to initialise logging")?;

    let config = match &cli.config {
        Some(path) => PaletteConfig::load(path)
            .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
        None => PaletteConfig::default(),
    };
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut palette = match &cli.base {
        Some(hex) => {
            let root = Hswl::from_hex(hex).wrap_err("bad --base color")?;
            Palette::new(root, config, rng)?
        }
        None if cli.preset => Palette::preset(config, rng)?,
        None => Palette::random(config, rng)?,
    };
    info!(root = %palette.swatches().get(palette.root_id()).map_or(String::new(), |s| s.hswl.to_hex()), "palette ready");

    if let Some(path) = &cli.actions {
        apply_actions(&mut palette, path)?;
    }

    let mut report = PaletteReport::from_swatches(palette.swatches(), palette.root_id());
    if let Some(attr) = cli.gradient {
        report = report.with_gradients(palette.swatches(), attr, palette.config().gradient_stops);
    }

    let output = match cli.format {
        OutputFormat::Text => TextFormatter.format(&report)?,
        OutputFormat::Json => JsonFormatter.format(&report)?,
    };
    print!("{output}");
    Ok(())
}

fn apply_actions(palette: &mut Palette, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let actions: Vec<RawAction> =
        serde_json::from_str(&text).wrap_err_with(|| format!("failed to parse actions in {}", path.display()))?;

    for (i, action) in actions.into_iter().enumerate() {
        let kind = action.kind.clone();
        if let Err(err) = palette.dispatch_raw(action) {
            if err.is_configuration() {
                error!(index = i, action = %kind, "configuration defect in action script");
            }
            return Err(err).wrap_err_with(|| format!("action #{i} ({kind}) failed"));
        }
    }
    info!(count = palette.swatches().len(), "actions applied");
    Ok(())
}
