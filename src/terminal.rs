//! Terminal host: presents preview surfaces as half-block cells and drives
//! the frame queue.

use crate::animation::{FrameQueue, SharedCanvas, SurfaceProvider};
use crate::error::{PreviewError, PreviewResult};
use crate::graphics::Surface;
use crate::logging::DeferredStderr;
use crate::state::AnimationClock;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    fn blank() -> Self {
        Cell {
            ch: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Puts the terminal into raw alternate-screen mode and restores it on drop.
///
/// Log records written to `logs` meanwhile are held back and printed after
/// the terminal is restored.
pub struct TerminalGuard {
    out: Stdout,
    logs: DeferredStderr,
}

impl TerminalGuard {
    pub fn enter(logs: DeferredStderr) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        logs.hold();
        // from here on, a failed setup is undone by drop
        let mut guard = TerminalGuard {
            out: io::stdout(),
            logs,
        };
        execute!(guard.out, EnterAlternateScreen, DisableLineWrap, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
        let _ = self.logs.release();
    }
}

/// Terminal size in cells, falling back to `termsize` when crossterm cannot ask
pub fn measure_terminal() -> io::Result<(u16, u16)> {
    match terminal::size() {
        Ok(size) => Ok(size),
        Err(err) => termsize::get()
            .map(|size| (size.cols, size.rows))
            .ok_or(err),
    }
}

/// Splits `cols` into `count` side-by-side panes as `(offset, width)` pairs
pub fn pane_columns(cols: u16, count: usize) -> Vec<(u16, u16)> {
    if count == 0 {
        return Vec::new();
    }
    let width = cols / count as u16;
    (0..count as u16).map(|i| (i * width, width)).collect()
}

/// Logical surface size of a pane: one pixel wide and two tall per cell
pub fn pane_surface_size(pane_cols: u16, rows: u16) -> (f64, f64) {
    (pane_cols as f64, rows as f64 * 2.0)
}

struct Pane {
    name: &'static str,
    slot: usize,
    surface: SharedCanvas<Surface>,
}

/// Owns the screen buffers and the surfaces handed to the previews
pub struct TerminalHost {
    panes: Vec<Pane>,
    slots: usize,
    size: (u16, u16),
    prev: Vec<Cell>,
    cur: Vec<Cell>,
}

impl TerminalHost {
    /// Host with `slots` equal panes sized for the current terminal
    pub fn new(slots: usize) -> io::Result<Self> {
        let size = measure_terminal()?;
        info!("terminal is {}x{} cells, {slots} panes", size.0, size.1);
        Ok(Self::with_size(slots, size))
    }

    fn with_size(slots: usize, size: (u16, u16)) -> Self {
        let cells = size.0 as usize * size.1 as usize;
        TerminalHost {
            panes: Vec::new(),
            slots,
            size,
            prev: vec![Cell::blank(); cells],
            cur: vec![Cell::blank(); cells],
        }
    }

    /// Applies a terminal resize. Only called between frames.
    fn relayout(&mut self, size: (u16, u16)) {
        debug!("terminal resized to {}x{}", size.0, size.1);
        self.size = size;
        let cells = size.0 as usize * size.1 as usize;
        self.prev = vec![Cell::blank(); cells];
        self.cur = vec![Cell::blank(); cells];
        let columns = pane_columns(size.0, self.slots);
        for pane in &self.panes {
            let (_, width) = columns[pane.slot];
            let (w, h) = pane_surface_size(width, size.1);
            if let Err(err) = pane.surface.borrow_mut().resize(w, h, 1.0) {
                warn!("{} pane keeps its previous size: {err}", pane.name);
            }
        }
    }

    fn compose(&mut self) {
        for c in self.cur.iter_mut() {
            *c = Cell::blank();
        }
        let (cols, rows) = self.size;
        let columns = pane_columns(cols, self.slots);
        for pane in &self.panes {
            let (offset, width) = columns[pane.slot];
            let surface = pane.surface.borrow();
            compose_pane(&surface, &mut self.cur, cols, rows, offset, width);
        }
    }

    /// Runs frames until a quit key is pressed or every animation has stopped
    pub fn run(
        &mut self,
        frames: &mut FrameQueue,
        clock: &AnimationClock,
        frame_interval: Duration,
    ) -> io::Result<()> {
        let mut out = io::stdout();
        execute!(out, terminal::Clear(terminal::ClearType::All))?;
        let names: Vec<&str> = self.panes.iter().map(|p| p.name).collect();
        info!("running previews: {}", names.join(", "));

        loop {
            let frame_start = Instant::now();
            if quit_requested()? {
                info!("quit requested");
                return Ok(());
            }

            let size = measure_terminal()?;
            if size != self.size {
                self.relayout(size);
                execute!(out, terminal::Clear(terminal::ClearType::All))?;
            }

            if frames.run_frame(clock.elapsed_ms()) == 0 {
                warn!("no preview animations left running");
                return Ok(());
            }

            self.compose();
            execute!(out, BeginSynchronizedUpdate)?;
            render_diff(&mut out, self.size.0, self.size.1, &mut self.prev, &self.cur)?;
            execute!(out, EndSynchronizedUpdate)?;
            out.flush()?;

            std::thread::sleep(remaining_frame_time(frame_interval, frame_start.elapsed()));
        }
    }
}

impl SurfaceProvider for TerminalHost {
    type Canvas = Surface;

    /// Creates the surface for pane `slot`, failing if the pane has no columns
    fn acquire_surface(
        &mut self,
        slot: usize,
        name: &'static str,
    ) -> PreviewResult<SharedCanvas<Surface>> {
        let (_, width) = pane_columns(self.size.0, self.slots)
            .get(slot)
            .copied()
            .unwrap_or((0, 0));
        if width == 0 || self.size.1 == 0 {
            return Err(PreviewError::SurfaceUnavailable(name));
        }
        let (w, h) = pane_surface_size(width, self.size.1);
        let surface = Rc::new(RefCell::new(Surface::new(w, h, 1.0)?));
        debug!("{name} surface acquired at {w}x{h}");
        self.panes.push(Pane {
            name,
            slot,
            surface: Rc::clone(&surface),
        });
        Ok(surface)
    }
}

/// Sleep left in a frame of `interval` after `spent` went into drawing it
pub fn remaining_frame_time(interval: Duration, spent: Duration) -> Duration {
    interval.saturating_sub(spent)
}

fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::from_millis(0))? {
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = event::read()?
        {
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(true),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true)
                }
                _ => {}
            }
        }
    }
    Ok(false)
}

fn rgb(pixel: [u8; 3]) -> Color {
    Color::Rgb {
        r: pixel[0],
        g: pixel[1],
        b: pixel[2],
    }
}

/// Copies a surface into the cell buffer, two pixel rows per cell row
fn compose_pane(surface: &Surface, buf: &mut [Cell], cols: u16, rows: u16, offset: u16, width: u16) {
    let cols = cols as usize;
    for y in 0..rows as usize {
        for x in 0..width as usize {
            let cx = offset as usize + x;
            if cx >= cols {
                break;
            }
            let (Some(top), Some(bottom)) = (surface.pixel(x, y * 2), surface.pixel(x, y * 2 + 1))
            else {
                continue;
            };
            buf[y * cols + cx] = Cell {
                ch: HALF_BLOCK,
                fg: rgb(top),
                bg: rgb(bottom),
            };
        }
    }
}

fn render_diff(out: &mut Stdout, w: u16, h: u16, prev: &mut [Cell], cur: &[Cell]) -> io::Result<()> {
    let mut cur_fg = Color::Reset;
    let mut cur_bg = Color::Reset;

    for y in 0..h as usize {
        for x in 0..w as usize {
            let i = y * (w as usize) + x;
            if prev[i] == cur[i] {
                continue;
            }
            prev[i] = cur[i];

            let c = cur[i];
            queue!(out, cursor::MoveTo(x as u16, y as u16))?;

            if c.bg != cur_bg {
                cur_bg = c.bg;
                queue!(out, SetBackgroundColor(cur_bg))?;
            }
            if c.fg != cur_fg {
                cur_fg = c.fg;
                queue!(out, SetForegroundColor(cur_fg))?;
            }
            queue!(out, Print(c.ch))?;
        }
    }
    queue!(out, ResetColor)?;

    Ok(())
}
