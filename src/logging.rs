//! Log output for the process.
//!
//! Records go to stderr, except while the terminal host owns the screen:
//! then they are held in memory and flushed once the terminal is restored.

use std::io::{self, Write};
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

#[derive(Default)]
struct Held {
    holding: bool,
    buffer: Vec<u8>,
}

/// Stderr writer that can be told to buffer instead of write
#[derive(Clone, Default)]
pub struct DeferredStderr {
    held: Arc<Mutex<Held>>,
}

impl DeferredStderr {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Held> {
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Buffers every write until the next release
    pub fn hold(&self) {
        self.lock().holding = true;
    }

    pub fn is_holding(&self) -> bool {
        self.lock().holding
    }

    /// Bytes waiting for the next release
    pub fn held_len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Stops buffering and writes everything held so far to stderr
    pub fn release(&self) -> io::Result<()> {
        self.release_into(&mut io::stderr())
    }

    pub fn release_into<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        let held = {
            let mut held = self.lock();
            held.holding = false;
            mem::take(&mut held.buffer)
        };
        out.write_all(&held)?;
        out.flush()
    }
}

impl Write for DeferredStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut held = self.lock();
        if held.holding {
            held.buffer.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.lock().holding {
            Ok(())
        } else {
            io::stderr().flush()
        }
    }
}

/// The sink every log record of the process is written to
pub fn sink() -> &'static DeferredStderr {
    static SINK: OnceLock<DeferredStderr> = OnceLock::new();
    SINK.get_or_init(DeferredStderr::new)
}

fn builder(target: DeferredStderr) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Pipe(Box::new(target)));
    builder
}

/// Installs `env_logger`, configured from `RUST_LOG`, writing through [`sink`]
pub fn init() {
    builder(sink().clone()).init();
}
