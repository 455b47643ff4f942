use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use std::io::{BufWriter, Write};

use crate::grid::{Grid, RgbColor};
use crate::shared::constants;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, clap::ValueEnum)]
pub enum DisplayMode {
    /// Glyphs only, no color
    Ascii,
    /// 24-bit foreground and background colors
    Rgb,
}

/// Writes grids to a terminal (or any writer) as escape-coded text.
pub struct DisplayManager<W: Write> {
    out: BufWriter<W>,
    mode: DisplayMode,
    render_buffer: Vec<u8>,
}

impl<W: Write> DisplayManager<W> {
    pub fn new(out: W, mode: DisplayMode) -> Self {
        Self {
            out: BufWriter::with_capacity(256 * 1024, out),
            mode,
            render_buffer: Vec::with_capacity(256 * 1024),
        }
    }

    /// Writes the grid inline, one terminal line per row.
    pub fn render(&mut self, grid: &Grid) -> Result<()> {
        let start = std::time::Instant::now();

        self.render_buffer.clear();
        encode_into(&mut self.render_buffer, grid, self.mode, None);
        self.out.write_all(&self.render_buffer)?;
        self.out.flush()?;

        crate::utils::logger::debug(&format!(
            "RENDER: {}x{} grid, {} bytes in {}us",
            grid.rows(),
            grid.cols(),
            self.render_buffer.len(),
            start.elapsed().as_micros()
        ));
        Ok(())
    }

    /// Writes the grid centered inside a `term_cols` x `term_rows` screen, clipping what
    /// does not fit.
    pub fn render_centered(&mut self, grid: &Grid, term_cols: u16, term_rows: u16) -> Result<()> {
        self.render_buffer.clear();
        self.render_buffer.extend_from_slice(b"\x1b[2J");
        let screen = Screen::centered(grid, term_cols, term_rows);
        encode_into(&mut self.render_buffer, grid, self.mode, Some(screen));
        self.out.write_all(&self.render_buffer)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner().map_err(|e| anyhow::anyhow!("failed to flush output: {}", e))
    }
}

/// Shows `grid` full-screen on the alternate screen until any key is pressed.
pub fn show_fullscreen(grid: &Grid, mode: DisplayMode) -> Result<()> {
    let (cols, rows) = terminal_size_chars();
    let mut stdout = std::io::stdout();

    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(cursor::Hide)?;

    let result = (|| -> Result<()> {
        let mut display = DisplayManager::new(std::io::stdout(), mode);
        display.render_centered(grid, cols, rows)?;
        loop {
            if let Event::Key(_) = event::read()? {
                return Ok(());
            }
        }
    })();

    let _ = stdout.execute(cursor::Show);
    let _ = stdout.execute(LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    result
}

/// Return terminal size in character columns and rows, converting from pixels when needed.
pub fn terminal_size_chars() -> (u16, u16) {
    let (mut term_cols, mut term_rows) =
        terminal::size().unwrap_or(constants::FALLBACK_TERMINAL_SIZE);
    if let (Ok(cw_str), Ok(ch_str)) = (std::env::var("CHAR_WIDTH"), std::env::var("CHAR_HEIGHT")) {
        if let (Ok(cw), Ok(ch)) = (cw_str.parse::<u16>(), ch_str.parse::<u16>()) {
            // Some terminals report pixels instead of cells.
            if cw > 0 && term_cols > cw * 16 {
                term_cols = (term_cols / cw).max(1);
            }
            if ch > 0 && term_rows > ch * 8 {
                term_rows = (term_rows / ch).max(1);
            }
        }
    }
    (term_cols, term_rows)
}

/// The whole grid as escape-coded bytes, one line per row.
pub fn encode_grid(grid: &Grid, mode: DisplayMode) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(grid.rows() * (grid.cols() * 4 + 8));
    encode_into(&mut buffer, grid, mode, None);
    buffer
}

#[derive(Clone, Copy)]
struct Screen {
    offset_x: u16,
    offset_y: u16,
    cols: u16,
    rows: u16,
}

impl Screen {
    fn centered(grid: &Grid, cols: u16, rows: u16) -> Self {
        let content_w = grid.cols().min(u16::MAX as usize) as u16;
        let content_h = grid.rows().min(u16::MAX as usize) as u16;
        Self {
            offset_x: cols.saturating_sub(content_w) / 2,
            offset_y: rows.saturating_sub(content_h) / 2,
            cols,
            rows,
        }
    }
}

fn encode_into(buffer: &mut Vec<u8>, grid: &Grid, mode: DisplayMode, screen: Option<Screen>) {
    for (y, row) in grid.rows_iter().enumerate() {
        let mut last_fg: Option<RgbColor> = None;
        let mut last_bg: Option<RgbColor> = None;

        let visible = match screen {
            Some(s) => {
                let target_y = y + s.offset_y as usize;
                if target_y >= s.rows as usize {
                    break;
                }
                // Zero-Allocation Cursor Move
                buffer.extend_from_slice(b"\x1b[");
                write_u16_fast(buffer, target_y as u16 + 1);
                buffer.push(b';');
                write_u16_fast(buffer, s.offset_x + 1);
                buffer.push(b'H');
                (s.cols - s.offset_x) as usize
            }
            None => row.len(),
        };

        for cell in row.iter().take(visible) {
            if mode == DisplayMode::Rgb {
                // FG: \x1b[38;2;R;G;Bm
                if Some(cell.fg) != last_fg {
                    write_color(buffer, b"\x1b[38;2;", cell.fg);
                    last_fg = Some(cell.fg);
                }
                // BG: \x1b[48;2;R;G;Bm
                if Some(cell.bg) != last_bg {
                    write_color(buffer, b"\x1b[48;2;", cell.bg);
                    last_bg = Some(cell.bg);
                }
            }
            let mut b_dst = [0u8; 4];
            buffer.extend_from_slice(cell.ch.encode_utf8(&mut b_dst).as_bytes());
        }

        if mode == DisplayMode::Rgb {
            buffer.extend_from_slice(b"\x1b[0m");
        }
        if screen.is_none() {
            buffer.push(b'\n');
        }
    }
}

fn write_color(buffer: &mut Vec<u8>, prefix: &[u8], color: RgbColor) {
    buffer.extend_from_slice(prefix);
    write_u8_fast(buffer, color.0);
    buffer.push(b';');
    write_u8_fast(buffer, color.1);
    buffer.push(b';');
    write_u8_fast(buffer, color.2);
    buffer.push(b'm');
}

// Helper for zero-allocation integer writing
#[inline(always)]
fn write_u8_fast(buffer: &mut Vec<u8>, n: u8) {
    if n >= 100 {
        buffer.push(b'0' + n / 100);
    }
    if n >= 10 {
        buffer.push(b'0' + (n / 10) % 10);
    }
    buffer.push(b'0' + n % 10);
}

#[inline(always)]
fn write_u16_fast(buffer: &mut Vec<u8>, n: u16) {
    let mut digits = [0u8; 5];
    let mut len = 0;
    let mut rest = n;
    loop {
        digits[len] = b'0' + (rest % 10) as u8;
        len += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    buffer.extend(digits[..len].iter().rev());
}
