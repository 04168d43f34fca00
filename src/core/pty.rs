//! The `Pty` capability trait (§6.1) and its `portable-pty` implementation.
//!
//! Grounded on the donor's `tab/mod.rs::Tab::spawn`, which opens a
//! pseudo-console via `portable_pty::native_pty_system()` and builds the
//! shell command line the same way this crate's `Surface::spawn` does.

use std::io::{Read, Write};

use portable_pty::{CommandBuilder, MasterPty, PtySize};

use crate::core::error::{PhanttyError, Result};

/// The pseudo-console capability the core needs (§6.1).
pub trait Pty: Send {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize>;
    fn resize(&mut self, cols: u16, rows: u16) -> std::io::Result<()>;
    /// Close the underlying pipe so any blocked `read` returns with an
    /// EOF-like result, unblocking the IO reader thread.
    fn close(&mut self);
}

/// Pseudo-console backed by `portable-pty`'s cross-platform abstraction
/// (ConPTY on Windows).
pub struct PortablePty {
    master: Box<dyn MasterPty + Send>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn portable_pty::Child + Send + Sync>,
    closed: bool,
}

impl PortablePty {
    pub fn spawn(
        cmdline: &str,
        cols: u16,
        rows: u16,
        cwd: Option<&str>,
    ) -> Result<Self> {
        let pty_system = portable_pty::native_pty_system();
        let pair = pty_system
            .openpty(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| PhanttyError::Spawn(std::io::Error::other(e)))?;

        let mut parts = cmdline.split_whitespace();
        let program = parts.next().unwrap_or("sh").to_owned();
        let args: Vec<&str> = parts.collect();
        let mut cmd = CommandBuilder::new(&program);
        for arg in &args {
            cmd.arg(arg);
        }
        if let Some(dir) = cwd {
            cmd.cwd(dir);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| PhanttyError::Spawn(std::io::Error::other(e)))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| PhanttyError::Spawn(std::io::Error::other(e)))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| PhanttyError::Spawn(std::io::Error::other(e)))?;

        Ok(Self {
            master: pair.master,
            reader,
            writer,
            child,
            closed: false,
        })
    }
}

impl Pty for PortablePty {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }

    fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        self.writer.write(bytes)
    }

    fn resize(&mut self, cols: u16, rows: u16) -> std::io::Result<()> {
        self.master
            .resize(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
            .map_err(std::io::Error::other)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.child.kill();
    }
}

impl Drop for PortablePty {
    fn drop(&mut self) {
        self.close();
    }
}
