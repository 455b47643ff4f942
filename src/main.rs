use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use glyphgrid::converter::{self, ColorMode, ConvertOptions};
use glyphgrid::decoder;
use glyphgrid::format;
use glyphgrid::grid::{Coord, Grid, Selection};
use glyphgrid::renderer::{display, DisplayManager, DisplayMode};
use glyphgrid::transform::{self, MirrorDirection, RotateDirection};
use glyphgrid::utils::config::Config;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./glyphgrid.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Text,
    Ansi,
}

#[derive(clap::Args)]
struct SelectionArgs {
    /// Selected cell as ROW,COL (repeatable)
    #[arg(short, long = "select", value_name = "ROW,COL")]
    select: Vec<String>,
    /// Selected rectangle as ROW0,COL0,ROW1,COL1 (inclusive)
    #[arg(long, value_name = "R0,C0,R1,C1")]
    rect: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image into a character grid
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        /// Grid rows (defaults to the terminal height)
        #[arg(short, long)]
        rows: Option<usize>,
        /// Grid columns (defaults to the terminal width)
        #[arg(short, long)]
        cols: Option<usize>,
        #[arg(short, long, value_enum)]
        mode: Option<ColorMode>,
        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        brightness: Option<f64>,
        #[arg(long, default_value_t = false)]
        invert: bool,
        /// Save the grid as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Save the grid as plain text
        #[arg(long)]
        text: Option<PathBuf>,
        /// Print the grid even when saving it
        #[arg(long, default_value_t = false)]
        preview: bool,
        #[arg(short, long, value_enum, default_value_t = DisplayMode::Rgb)]
        display: DisplayMode,
    },
    /// Print the bounding box of a grid's non-space cells
    Bbox {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Trim a grid down to its bounding box
    Crop {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Rotate selected cells a quarter turn
    Rotate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum)]
        direction: RotateDirection,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Mirror selected cells, or the whole grid when nothing is selected
    Mirror {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum)]
        direction: MirrorDirection,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Resize a grid, keeping the top-left overlap
    Resize {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, allow_hyphen_values = true)]
        rows: i64,
        #[arg(short, long, allow_hyphen_values = true)]
        cols: i64,
    },
    /// Print a saved grid to the terminal
    Show {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t = DisplayMode::Rgb)]
        mode: DisplayMode,
        /// Show centered on the alternate screen until a key is pressed
        #[arg(short, long, default_value_t = false)]
        fullscreen: bool,
    },
    /// Write a saved grid as plain or ANSI-colored text
    Export {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },
    /// Turn a plain text file into a grid
    Import {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Query the terminal size as crossterm sees it
    TerminalSize,
}

fn main() -> Result<()> {
    glyphgrid::utils::logger::init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let theme = config.theme;

    match cli.command {
        Commands::Convert {
            input,
            rows,
            cols,
            mode,
            contrast,
            brightness,
            invert,
            output,
            text,
            preview,
            display,
        } => {
            let options = ConvertOptions {
                color_mode: mode.unwrap_or(config.convert.color_mode),
                contrast: contrast.unwrap_or(config.convert.contrast),
                brightness: brightness.unwrap_or(config.convert.brightness),
                invert: invert || config.convert.invert,
            };
            let (term_cols, term_rows) = display::terminal_size_chars();
            let rows = rows.unwrap_or_else(|| term_rows.saturating_sub(1).max(1) as usize);
            let cols = cols.unwrap_or(term_cols as usize);

            let image = decoder::load_image(&input)?;
            glyphgrid::utils::logger::info(&format!(
                "convert {} -> {}x{} ({:?}, contrast {}, brightness {}, invert {})",
                input.display(),
                rows,
                cols,
                options.color_mode,
                options.contrast,
                options.brightness,
                options.invert
            ));
            let grid = converter::convert(&image, rows, cols, &options, &theme)?;

            if let Some(path) = &output {
                save(path, &grid)?;
            }
            if let Some(path) = &text {
                std::fs::write(path, format::to_plain_text(&grid))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            if preview || (output.is_none() && text.is_none()) {
                DisplayManager::new(std::io::stdout(), display).render(&grid)?;
            }
        }
        Commands::Bbox { input } => {
            let grid = load(&input)?;
            let bbox = transform::bounding_box(&grid);
            if bbox.is_empty() {
                println!("empty");
            } else {
                println!(
                    "rows {}..={} cols {}..={} ({}x{})",
                    bbox.min_row,
                    bbox.max_row,
                    bbox.min_col,
                    bbox.max_col,
                    bbox.height(),
                    bbox.width()
                );
            }
        }
        Commands::Crop { input, output } => {
            let grid = load(&input)?;
            let bbox = transform::bounding_box(&grid);
            if bbox.is_empty() {
                bail!("{} has no non-space cells to crop to", input.display());
            }
            save(&output, &transform::extract_subgrid(&grid, &bbox))?;
        }
        Commands::Rotate {
            input,
            output,
            direction,
            selection,
        } => {
            let grid = load(&input)?;
            let selection = parse_selection(&selection)?;
            let (rotated, placed) =
                transform::rotate_selection(&grid, &selection, direction, &theme);
            report_dropped(selection.len(), placed.len());
            save(&output, &rotated)?;
        }
        Commands::Mirror {
            input,
            output,
            direction,
            selection,
        } => {
            let grid = load(&input)?;
            let selection = parse_selection(&selection)?;
            let (mirrored, placed) =
                transform::mirror_selection(&grid, &selection, direction, &theme);
            if let Some(placed) = placed {
                report_dropped(selection.len(), placed.len());
            }
            save(&output, &mirrored)?;
        }
        Commands::Resize {
            input,
            output,
            rows,
            cols,
        } => {
            if rows <= 0 || cols <= 0 {
                bail!("resize needs positive dimensions, got {}x{}", rows, cols);
            }
            let grid = load(&input)?;
            save(&output, &transform::resize_grid(&grid, rows as usize, cols as usize, &theme))?;
        }
        Commands::Show {
            input,
            mode,
            fullscreen,
        } => {
            let grid = load(&input)?;
            if fullscreen {
                display::show_fullscreen(&grid, mode)?;
            } else {
                DisplayManager::new(std::io::stdout(), mode).render(&grid)?;
            }
        }
        Commands::Export {
            input,
            output,
            format: export_format,
        } => {
            let grid = load(&input)?;
            let text = match export_format {
                ExportFormat::Text => format::to_plain_text(&grid),
                ExportFormat::Ansi => format::to_ansi_text(&grid),
            };
            std::fs::write(&output, text)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Commands::Import { input, output } => {
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            save(&output, &format::from_plain_text(&text, &theme))?;
        }
        Commands::TerminalSize => {
            let (cols, rows) = display::terminal_size_chars();
            println!("{}x{}", cols, rows);
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<Grid> {
    format::load_grid(path).with_context(|| format!("Failed to load grid {}", path.display()))
}

fn save(path: &Path, grid: &Grid) -> Result<()> {
    format::save_grid(path, grid)
        .with_context(|| format!("Failed to save grid {}", path.display()))?;
    glyphgrid::utils::logger::info(&format!(
        "saved {}x{} grid to {}",
        grid.rows(),
        grid.cols(),
        path.display()
    ));
    Ok(())
}

fn report_dropped(selected: usize, placed: usize) {
    if placed < selected {
        eprintln!("{} selected cell(s) moved off the grid and were dropped", selected - placed);
    }
}

fn parse_numbers(text: &str, expected: usize) -> Result<Vec<usize>> {
    let numbers = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("'{}' is not a cell index", part.trim()))
        })
        .collect::<Result<Vec<_>>>()?;
    if numbers.len() != expected {
        bail!("expected {} comma-separated numbers, got '{}'", expected, text);
    }
    Ok(numbers)
}

fn parse_selection(args: &SelectionArgs) -> Result<Selection> {
    let mut selection = Selection::new();
    for cell in &args.select {
        let n = parse_numbers(cell, 2)?;
        selection.insert(Coord::new(n[0], n[1]));
    }
    if let Some(rect) = &args.rect {
        let n = parse_numbers(rect, 4)?;
        let (r0, r1) = (n[0].min(n[2]), n[0].max(n[2]));
        let (c0, c1) = (n[1].min(n[3]), n[1].max(n[3]));
        for row in r0..=r1 {
            for col in c0..=c1 {
                selection.insert(Coord::new(row, col));
            }
        }
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection_merges_cells_and_rect() {
        let args = SelectionArgs {
            select: vec!["0,0".to_string(), " 5 , 7 ".to_string()],
            rect: Some("2,3,1,2".to_string()),
        };
        let selection = parse_selection(&args).unwrap();
        assert_eq!(selection.len(), 6);
        assert!(selection.contains(&Coord::new(5, 7)));
        assert!(selection.contains(&Coord::new(1, 2)));
        assert!(selection.contains(&Coord::new(2, 3)));
    }

    #[test]
    fn test_parse_selection_rejects_garbage() {
        let args = SelectionArgs {
            select: vec!["1;2".to_string()],
            rect: None,
        };
        assert!(parse_selection(&args).is_err());

        let args = SelectionArgs {
            select: Vec::new(),
            rect: Some("1,2,3".to_string()),
        };
        assert!(parse_selection(&args).is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "glyphgrid",
            "rotate",
            "-i",
            "a.json",
            "-o",
            "b.json",
            "-d",
            "left",
            "--rect",
            "0,0,1,1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Rotate {
                direction: RotateDirection::Left,
                ..
            }
        ));
    }
}
