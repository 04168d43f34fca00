//! Device/queue/surface bootstrap shared by every window's renderer.

use winit::window::Window;

/// Owns the wgpu instance handles a window's renderer draws through.
/// One `GpuState` is created once at startup and shared by every window
/// thread's renderer (each window brings its own `wgpu::Surface`).
pub struct GpuState {
    pub instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub render_format: wgpu::TextureFormat,
    pub pipeline_cache: Option<wgpu::PipelineCache>,
    alpha_mode: wgpu::CompositeAlphaMode,
}

impl GpuState {
    pub fn new() -> Option<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;
        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("phantty_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        }))
        .ok()?;

        Some(Self {
            instance,
            adapter,
            device,
            queue,
            render_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            pipeline_cache: None,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
        })
    }

    /// Create and configure a surface for `window`, sized to its current
    /// physical size.
    pub fn create_surface(
        &self,
        window: std::sync::Arc<Window>,
    ) -> Result<(wgpu::Surface<'static>, wgpu::SurfaceConfiguration), wgpu::CreateSurfaceError> {
        let size = window.inner_size();
        let surface = self.instance.create_surface(window)?;
        let caps = surface.get_capabilities(&self.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(self.render_format);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: self.alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&self.device, &config);
        Ok((surface, config))
    }

    /// Whether the adapter supports a transparent compositing mode.
    pub fn supports_transparency(&self) -> bool {
        matches!(
            self.alpha_mode,
            wgpu::CompositeAlphaMode::PreMultiplied | wgpu::CompositeAlphaMode::PostMultiplied
        )
    }

    /// Persist the Vulkan pipeline cache to disk, if one was created.
    /// No-op until pipeline cache persistence is wired up (`pipeline_cache`
    /// is always `None` today, built fresh every run).
    pub fn save_pipeline_cache(&self) {}
}
