//! winit `ApplicationHandler` entry point wiring every other `core::`
//! component into a running window (§4.8, §7).
//!
//! Grounded on the donor's `app/event_loop.rs` (the `ApplicationHandler`
//! shape, keyboard dispatch, redraw coalescing via `about_to_wait`) and
//! `app/window_management.rs` (per-window GPU surface + font setup on
//! first `resumed`). Unlike the donor, window threads here are genuine OS
//! threads owned by `AppCoordinator` rather than all windows sharing one
//! event loop; this module is the per-window event loop that
//! `AppCoordinator::run`/`request_new_window` spawns onto each thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::core::atlas::GlyphRegion;
use crate::core::coordinator::{AppCoordinator, SharedConfig};
use crate::core::font_impl::{FontdueRasterizer, RustybuzzShaper, SystemFontDiscovery};
use crate::core::fonts::{FontDiscovery, compute_metrics};
use crate::core::pty::PortablePty;
use crate::core::render_pipeline::{CellInstance, Rgba, RenderPipeline, ResizeCoalescer, cursor_visible};
use crate::core::scrollbar::Scrollbar;
use crate::core::sprites::SpriteSynthesizer;
use crate::core::terminal::TermBackend;
use crate::core::window::WindowCore;
use crate::gpu::{CoreRenderer, GpuState};
use crate::key_encoding::{self, KeyEventType, Modifiers as KeyModifiers};
use crate::term_mode::TermMode;

/// Resolved font face bytes + metrics, loaded once at window creation.
struct LoadedFont {
    rasterizer: FontdueRasterizer,
    shaper: RustybuzzShaper,
    cell_width: i32,
    cell_height: i32,
    baseline: i32,
}

fn load_font(discovery: &SystemFontDiscovery, family: &str, size_px: f32) -> Option<LoadedFont> {
    let (path, face_index) = discovery.resolve_family(family, 400)?;
    let bytes = crate::core::font_impl::load_face_bytes(&path).ok()?;
    let face = crate::core::font_impl::parse_face(&bytes, face_index)?;
    let metrics = compute_metrics(&face, (size_px * 0.6).round().max(1.0) as u32);
    let rasterizer = FontdueRasterizer::from_bytes(&bytes, size_px)?;
    let shaper = RustybuzzShaper::from_bytes(bytes, face_index);
    Some(LoadedFont {
        rasterizer,
        shaper,
        cell_width: metrics.cell_width as i32,
        cell_height: metrics.cell_height.max(1) as i32,
        baseline: metrics.cell_baseline as i32,
    })
}

struct LiveWindow {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: CoreRenderer,
    core: WindowCore,
    pipeline: RenderPipeline,
    font: LoadedFont,
    discovery: SystemFontDiscovery,
    resize: ResizeCoalescer,
    started_at: Instant,
    scrollbar: Scrollbar,
    last_frame_ms: u64,
}

/// Per-window winit application. One instance drives exactly one OS
/// window on the thread `AppCoordinator` spawned it on.
pub struct WindowApp {
    coordinator: Arc<AppCoordinator>,
    gpu: Arc<GpuState>,
    cwd: Option<String>,
    live: Option<LiveWindow>,
    window_id: Option<WindowId>,
}

impl WindowApp {
    pub fn new(coordinator: Arc<AppCoordinator>, gpu: Arc<GpuState>, cwd: Option<String>) -> Self {
        Self { coordinator, gpu, cwd, live: None, window_id: None }
    }

    fn build_window(&mut self, event_loop: &ActiveEventLoop) {
        let cfg = &self.coordinator.config;
        let attrs = Window::default_attributes()
            .with_title("phantty")
            .with_transparent(self.gpu.supports_transparency());
        let Ok(window) = event_loop.create_window(attrs) else { return };
        apply_window_effects(&window, cfg.window_opacity, cfg.window_blur);
        let window = Arc::new(window);

        let Ok((surface, surface_config)) = self.gpu.create_surface(Arc::clone(&window)) else {
            return;
        };
        let renderer = CoreRenderer::new(&self.gpu);

        let discovery = SystemFontDiscovery;
        let Some(font) = load_font(&discovery, &cfg.font_family, cfg.font_size) else { return };

        let cols = (surface_config.width as i32 / font.cell_width).max(1) as usize;
        let rows = (surface_config.height as i32 / font.cell_height).max(1) as usize;

        let Ok(pty) = PortablePty::spawn(&cfg.resolved_shell_command, cols as u16, rows as u16, self.cwd.as_deref())
        else {
            return;
        };
        let terminal = TermBackend::new(rows, cols, cfg.scrollback_limit);
        let surface_state = crate::core::surface::Surface::spawn(Box::new(pty), Box::new(terminal));

        let mut core = WindowCore::new();
        let _ = core.push_tab(surface_state);

        let sprites = SpriteSynthesizer::new(font.rasterizer.metrics().box_thickness as i32);
        let pipeline = RenderPipeline::new(sprites);

        self.window_id = Some(window.id());
        self.live = Some(LiveWindow {
            window,
            surface,
            surface_config,
            renderer,
            core,
            pipeline,
            font,
            discovery,
            resize: ResizeCoalescer::new(),
            started_at: Instant::now(),
            scrollbar: Scrollbar::new(),
            last_frame_ms: 0,
        });
    }

    fn draw(&mut self) {
        let Some(live) = &mut self.live else { return };
        let Some(tab) = live.core.active_tab() else { return };
        let surface = &tab.surface;

        let mut state = surface.render_state().lock();
        let blink = state.terminal.cursor_blinking_mode();
        let elapsed_ms = live.started_at.elapsed().as_millis() as u64;
        let visible = cursor_visible(elapsed_ms, blink);

        let (offset, visible_lines, total_lines) = state.terminal.scrollback_metrics();
        live.scrollbar.set_metrics(offset, visible_lines, total_lines);
        let dt_ms = elapsed_ms.saturating_sub(live.last_frame_ms) as f32;
        live.last_frame_ms = elapsed_ms;
        live.scrollbar.tick(dt_ms);

        let mut batches = live.pipeline.build_frame(
            state.terminal.as_ref(),
            state.selection.as_ref(),
            &mut live.font.rasterizer,
            &live.font.shaper,
            &live.discovery,
            live.font.cell_width,
            live.font.cell_height,
            live.font.baseline,
            visible,
            0.0,
            0.0,
        );
        drop(state);

        let track_h = live.surface_config.height as f32;
        let opacity = live.scrollbar.opacity();
        if opacity > 0.0 {
            let track_w = 4.0;
            let track_x = live.surface_config.width as f32 - track_w;
            let thumb_h = live.scrollbar.thumb_height(track_h);
            let thumb_top = live.scrollbar.thumb_top(track_h, 0.0);
            batches.background.push(CellInstance {
                x: track_x,
                y: thumb_top,
                w: track_w,
                h: thumb_h,
                uv: GlyphRegion { x: 0, y: 0, w: 0, h: 0 },
                color: Rgba(0.6, 0.6, 0.65, opacity),
            });
        }

        live.renderer.draw_frame(
            &self.gpu,
            &live.surface,
            &live.surface_config,
            live.pipeline.glyphs.grayscale_atlas(),
            live.pipeline.glyphs.color_atlas(),
            &batches,
            [0.08, 0.08, 0.1, 1.0],
        );
        surface.clear_dirty();
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        let Some(live) = &mut self.live else { return };
        if width == 0 || height == 0 {
            return;
        }
        live.surface_config.width = width;
        live.surface_config.height = height;
        live.surface.configure(&self.gpu.device, &live.surface_config);

        let cols = (width as i32 / live.font.cell_width).max(1) as usize;
        let rows = (height as i32 / live.font.cell_height).max(1) as usize;
        let now_ms = live.started_at.elapsed().as_millis() as u64;
        live.resize.request(cols, rows, now_ms);
    }

    /// Apply a coalesced resize once `ResizeCoalescer` releases it — called
    /// every tick from `about_to_wait` since `request` never resolves
    /// synchronously.
    fn poll_resize(&mut self) {
        let Some(live) = &mut self.live else { return };
        let now_ms = live.started_at.elapsed().as_millis() as u64;
        if let Some((cols, rows)) = live.resize.poll(now_ms) {
            if let Some(tab) = live.core.active_tab() {
                tab.surface.resize(cols, rows);
            }
        }
    }
}

impl ApplicationHandler for WindowApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.live.is_none() {
            self.build_window(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                self.coordinator.request_shutdown();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.draw();
            }
            WindowEvent::Resized(size) => {
                self.handle_resize(size.width, size.height);
                if let Some(live) = &self.live {
                    live.window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if matches!(event.logical_key, Key::Named(NamedKey::Escape))
                    && self.coordinator.shutdown_requested()
                {
                    event_loop.exit();
                    return;
                }
                let Some(live) = &mut self.live else { return };
                let Some(tab) = live.core.active_tab() else { return };
                let bytes = key_encoding::encode_key(
                    &event.logical_key,
                    KeyModifiers::empty(),
                    TermMode::default(),
                    event.text.as_ref().map(winit::keyboard::SmolStr::as_str),
                    event.location,
                    KeyEventType::Press,
                );
                if !bytes.is_empty() {
                    tab.surface.write(&bytes);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.coordinator.shutdown_requested() {
            event_loop.exit();
            return;
        }
        self.poll_resize();
        if let Some(live) = &self.live {
            if let Some(tab) = live.core.active_tab() {
                if tab.surface.is_dirty() {
                    live.window.request_redraw();
                }
            }
            let deadline = Instant::now() + Duration::from_millis(16);
            event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}

/// Build the process-wide coordinator + shared GPU state from config, run
/// the first window on this (main) thread, and join every window thread
/// spawned afterward (§4.8 startup sequencing).
pub fn run() -> crate::core::Result<()> {
    let config = load_shared_config();
    let coordinator = AppCoordinator::new(config);
    let gpu = Arc::new(GpuState::new().ok_or(crate::core::PhanttyError::NoAdapter)?);

    coordinator.run(|coordinator| {
        let Ok(event_loop) = EventLoop::new() else { return };
        event_loop.set_control_flow(ControlFlow::Wait);
        let mut app = WindowApp::new(coordinator, Arc::clone(&gpu), None);
        let _ = event_loop.run_app(&mut app);
    });
    Ok(())
}

fn load_shared_config() -> SharedConfig {
    let cfg = crate::config::Config::load();
    // `parse_cursor_style` only ever returns Block/Beam/Underline.
    let cursor_style = match crate::config::parse_cursor_style(&cfg.terminal.cursor_style) {
        vte::ansi::CursorShape::Underline => crate::core::terminal::CursorStyle::Underline,
        vte::ansi::CursorShape::Beam => crate::core::terminal::CursorStyle::Bar,
        _ => crate::core::terminal::CursorStyle::Block,
    };
    SharedConfig {
        resolved_shell_command: cfg.terminal.shell.clone().unwrap_or_else(default_shell),
        scrollback_limit: cfg.terminal.scrollback * 256,
        font_family: cfg.font.family.clone().unwrap_or_else(|| "monospace".to_owned()),
        font_weight: 400,
        font_size: cfg.font.size,
        cursor_style,
        cursor_blink: cfg.terminal.cursor_blink,
        theme: cfg.colors.scheme.clone(),
        shader_path: None,
        initial_cols: cfg.window.columns,
        initial_rows: cfg.window.rows,
        window_opacity: cfg.window.effective_opacity(),
        window_blur: cfg.window.blur,
    }
}

/// Applies compositor blur/vibrancy when opacity < 1.0.
///
/// With DX12 + `DirectComposition` (`DxgiFromVisual`), the swapchain supports
/// `PreMultiplied` alpha — the compositor reads our alpha channel directly.
/// Acrylic/vibrancy provides the frosted glass blur behind transparent areas.
fn apply_window_effects(window: &Window, opacity: f32, blur: bool) {
    if opacity >= 1.0 || !blur {
        return;
    }

    #[cfg(target_os = "windows")]
    {
        let alpha = (opacity * 255.0) as u8;
        let color = Some((30_u8, 30, 46, alpha));
        if let Err(e) = window_vibrancy::apply_acrylic(window, color) {
            crate::log(&format!("vibrancy: acrylic failed: {e}"));
        } else {
            crate::log("vibrancy: acrylic applied");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Err(e) = window_vibrancy::apply_vibrancy(
            window,
            window_vibrancy::NSVisualEffectMaterial::UnderWindowBackground,
            None,
            None,
        ) {
            crate::log(&format!("vibrancy: macOS vibrancy failed: {e}"));
        } else {
            crate::log("vibrancy: macOS UnderWindowBackground applied");
        }
    }

    #[cfg(target_os = "linux")]
    {
        window.set_blur(true);
        crate::log("transparency: blur enabled on Linux");
    }
}

#[cfg(target_os = "windows")]
fn default_shell() -> String {
    "powershell.exe".to_owned()
}

#[cfg(not(target_os = "windows"))]
fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_owned())
}
