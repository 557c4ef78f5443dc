use anyhow::{bail, Context, Result};
use cadpage_core::convert::{ConvertOptions, DEFAULT_PAGE_HEIGHT, DEFAULT_PAGE_WIDTH};
use cadpage_core::transform::{PageRect, SourceRect};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cadpage")]
#[command(about = "Converts 2D CAD drawings into a page of vector drawing items.")]
struct Cli {
    /// Log filter, overridden by RUST_LOG.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Convert {
        input: PathBuf,
        /// Where to write the page model as JSON; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_PAGE_WIDTH)]
        page_width: f64,
        #[arg(long, default_value_t = DEFAULT_PAGE_HEIGHT)]
        page_height: f64,
        /// Inches per drawing unit.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Drawing region as LEFT,BOTTOM,RIGHT,TOP.
        #[arg(long, value_parser = parse_rect)]
        source_rect: Option<[f64; 4]>,
        /// Page region in points as LEFT,BOTTOM,RIGHT,TOP.
        #[arg(long, value_parser = parse_rect)]
        page_rect: Option<[f64; 4]>,
        #[arg(long)]
        font: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    match cli.cmd {
        Command::Convert {
            input,
            output,
            page_width,
            page_height,
            scale,
            source_rect,
            page_rect,
            font,
        } => {
            let options = if source_rect.is_some() || page_rect.is_some() {
                ConvertOptions::with_rects(
                    page_width,
                    page_height,
                    source_rect.map(|[l, b, r, t]| SourceRect::new(l, b, r, t)),
                    page_rect.map(|[l, b, r, t]| PageRect::new(l, b, r, t)),
                )?
            } else {
                ConvertOptions::new(page_width, page_height, scale)
            };
            let options = match font {
                Some(font) => options.with_font(font),
                None => options,
            };
            convert(&input, output.as_deref(), options)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn convert(input: &Path, output: Option<&Path>, options: ConvertOptions) -> Result<()> {
    ensure_input_file(input)?;

    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let document = match ext.as_str() {
        "dxf" => cadpage_import_dxf::import_dxf(input)?,
        "dwg" => bail!("DWG input is not supported; convert it to DXF first."),
        _ => bail!("Unsupported input extension: .{ext}"),
    };

    let base_dir = input
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let options = options.with_content_resolver(move |path: &str| read_image(&base_dir, path));

    let page = cadpage_core::convert(&document, &options).context("convert drawing")?;
    info!(
        entities = document.entities.len(),
        items = page.items.len(),
        "converted drawing"
    );

    let json = serde_json::to_string_pretty(&page).context("serialize page")?;
    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        std::fs::write(path, &json).with_context(|| format!("write page: {path:?}"))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

/// Image paths are tried as written, then relative to the drawing's directory.
fn read_image(base_dir: &Path, path: &str) -> Option<Vec<u8>> {
    let direct = Path::new(path);
    let candidates = [direct.to_path_buf(), base_dir.join(direct.file_name()?)];
    candidates.iter().find_map(|p| std::fs::read(p).ok())
}

fn parse_rect(s: &str) -> Result<[f64; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[f64; 4]>::try_from(parts).map_err(|_| "expected LEFT,BOTTOM,RIGHT,TOP".to_string())
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}
