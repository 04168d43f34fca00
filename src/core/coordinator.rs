//! Process-wide shared config, window-thread lifecycle, shutdown
//! broadcast (§4.8).
//!
//! Grounded on the donor's `app/mod.rs::App::run` (startup sequencing,
//! panic hook, config load) and `app/window_management.rs` (per-window
//! thread-local GPU/font setup this component's window-thread entry point
//! mirrors). The donor runs a single winit event loop driving every
//! window from one thread; this component's window threads are genuinely
//! separate OS threads per §4.8, so the coordinator owns a mutex-guarded
//! window registry instead of a single event loop's window map.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

/// Configuration resolved once at startup and treated as read-only by
/// every window thread afterward.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    pub resolved_shell_command: String,
    pub scrollback_limit: usize,
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: f32,
    pub cursor_style: crate::core::terminal::CursorStyle,
    pub cursor_blink: bool,
    pub theme: String,
    pub shader_path: Option<std::path::PathBuf>,
    pub initial_cols: usize,
    pub initial_rows: usize,
    pub window_opacity: f32,
    pub window_blur: bool,
}

/// A one-shot cascade request consumed by exactly one spawned window
/// thread.
#[derive(Debug, Clone, Default)]
struct PendingWindow {
    cascade_from: Option<(i32, i32)>,
    cwd: Option<String>,
}

struct Registry {
    next_window_id: u64,
    windows: Vec<u64>,
    pending: Vec<(u64, PendingWindow)>,
}

/// Process-wide coordinator: read-only shared config plus the
/// mutex-guarded window list and one-shot cascade fields (§4.8 thread
/// safety rule).
pub struct AppCoordinator {
    pub config: SharedConfig,
    registry: Mutex<Registry>,
    shutdown: Arc<AtomicBool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl AppCoordinator {
    pub fn new(config: SharedConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: Mutex::new(Registry { next_window_id: 1, windows: Vec::new(), pending: Vec::new() }),
            shutdown: Arc::new(AtomicBool::new(false)),
            handles: Mutex::new(Vec::new()),
        })
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Broadcast a close signal to every registered window.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Snapshot the cascade target and CWD, spawn a window thread whose
    /// entry point runs `make_window` to completion, and register/
    /// deregister it around that call.
    pub fn request_new_window<F>(
        self: &Arc<Self>,
        parent_rect: Option<(i32, i32, u32, u32)>,
        cwd: Option<String>,
        make_window: F,
    ) where
        F: FnOnce(Arc<Self>, u64, Option<(i32, i32)>, Option<String>) + Send + 'static,
    {
        let cascade_from = parent_rect.map(|(x, y, _, _)| {
            (x + crate::core::window::CASCADE_OFFSET.0, y + crate::core::window::CASCADE_OFFSET.1)
        });

        let window_id = {
            let mut reg = self.registry.lock();
            let id = reg.next_window_id;
            reg.next_window_id += 1;
            reg.pending.push((id, PendingWindow { cascade_from, cwd: cwd.clone() }));
            id
        };

        let coordinator = Arc::clone(self);
        let handle = std::thread::spawn(move || {
            coordinator.register_window(window_id);
            make_window(Arc::clone(&coordinator), window_id, cascade_from, cwd);
            coordinator.deregister_window(window_id);
        });
        self.handles.lock().push(handle);
    }

    fn register_window(&self, id: u64) {
        let mut reg = self.registry.lock();
        reg.windows.push(id);
        reg.pending.retain(|(pid, _)| *pid != id);
    }

    fn deregister_window(&self, id: u64) {
        let mut reg = self.registry.lock();
        reg.windows.retain(|&w| w != id);
    }

    pub fn window_count(&self) -> usize {
        self.registry.lock().windows.len()
    }

    /// Owns the first window on the calling (main) thread via
    /// `run_first_window`, then joins every spawned window thread.
    pub fn run<F>(self: &Arc<Self>, run_first_window: F)
    where
        F: FnOnce(Arc<Self>),
    {
        self.register_window(0);
        run_first_window(Arc::clone(self));
        self.deregister_window(0);

        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            let _ = handle.join();
        }
    }
}
