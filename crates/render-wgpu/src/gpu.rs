use spincube_render::{RenderError, Result};

/// wgpu core objects: adapter, device and queue.
pub struct GpuContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Instance with every backend enabled; wgpu picks the platform's best.
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        })
    }

    /// Request an adapter (compatible with `surface` when given) and a device.
    pub async fn request(
        instance: &wgpu::Instance,
        surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::resource("adapter", "no compatible GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("spincube_device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::resource("device", e))?;

        // Errors raised outside an error scope are logged instead of panicking.
        device.on_uncaptured_error(Box::new(|e| {
            tracing::error!("uncaptured wgpu error: {e}");
        }));

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = info.backend.to_str(),
            "GPU initialized"
        );

        Ok(Self {
            adapter,
            device,
            queue,
        })
    }

    /// Context with no surface, for offscreen rendering.
    pub fn headless() -> Result<Self> {
        let instance = Self::create_instance();
        pollster::block_on(Self::request(&instance, None))
    }
}

/// Run `f` inside an error scope and return what it produced together with
/// the scope's error message, if any.
pub(crate) fn scoped<T>(
    device: &wgpu::Device,
    filter: wgpu::ErrorFilter,
    f: impl FnOnce() -> T,
) -> (T, Option<String>) {
    device.push_error_scope(filter);
    let value = f();
    let error = pollster::block_on(device.pop_error_scope());
    (value, error.map(|e| describe(&e)))
}

/// Create a GPU resource under a validation scope, reporting a rejection as
/// a resource-creation error for `resource`.
pub(crate) fn allocate<T>(
    device: &wgpu::Device,
    resource: &'static str,
    f: impl FnOnce() -> T,
) -> Result<T> {
    match scoped(device, wgpu::ErrorFilter::Validation, f) {
        (value, None) => Ok(value),
        (_, Some(reason)) => Err(RenderError::resource(resource, reason)),
    }
}

fn describe(error: &wgpu::Error) -> String {
    match error {
        wgpu::Error::Validation { description, .. } => description.clone(),
        other => other.to_string(),
    }
}

/// Headless context for GPU tests, or `None` on machines without an adapter.
#[cfg(test)]
pub(crate) fn test_context() -> Option<GpuContext> {
    match GpuContext::headless() {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping GPU test: {e}");
            None
        }
    }
}
