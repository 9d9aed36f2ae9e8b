use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use telemetry_client::{
    build_http_client, run_orientation_loop, Backoff, HistoryLoop, JsonEndpoint, PollTask,
    SampleSink, SinkClosed,
};
use telemetry_config::{AppConfig, ChannelMode};
use telemetry_history::{HistoryBatch, TracingChart};
use telemetry_math::Matrix4;
use telemetry_renderer::{
    BlinnPhong, Camera, OrientationSample, RendererError, SceneRenderer, WgpuBackend,
    DEFAULT_LIGHTS,
};
use tokio::sync::{oneshot, watch};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Events posted to the window thread from the polling tasks.
#[derive(Debug)]
enum AppEvent {
    /// A new sample and the acknowledgement to fire once it is drawn.
    Orientation(OrientationSample, oneshot::Sender<()>),
}

/// Hands each orientation sample to the window, schedules one redraw and
/// waits for that frame.
struct RedrawScheduler(EventLoopProxy<AppEvent>);

impl SampleSink<OrientationSample> for RedrawScheduler {
    async fn submit(&mut self, sample: OrientationSample) -> Result<(), SinkClosed> {
        let (drawn_tx, drawn_rx) = oneshot::channel();
        self.0
            .send_event(AppEvent::Orientation(sample, drawn_tx))
            .map_err(|_| SinkClosed)?;
        drawn_rx.await.map_err(|_| SinkClosed)
    }
}

/// Application state.
struct App {
    config: AppConfig,
    mode_tx: watch::Sender<ChannelMode>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    /// Most recent orientation; drawn on every redraw.
    sample: OrientationSample,
    /// Fired after the next frame that shows `sample`.
    pending_ack: Option<oneshot::Sender<()>>,
    /// Set when window or GPU setup failed; returned from `main`.
    init_error: Option<anyhow::Error>,
}

struct GpuState {
    renderer: SceneRenderer<WgpuBackend>,
    camera: Camera,
    /// Cached `projection * view`, rebuilt on resize.
    pv: Matrix4,
}

impl App {
    fn new(config: AppConfig, mode_tx: watch::Sender<ChannelMode>) -> Self {
        Self {
            config,
            mode_tx,
            window: None,
            gpu: None,
            sample: OrientationSample::default(),
            pending_ack: None,
            init_error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        error!(error = %e, "Initialization failed");
        self.init_error = Some(e);
        event_loop.exit();
    }

    fn set_mode(&mut self, mode: ChannelMode) {
        let previous = self.mode_tx.send_replace(mode);
        if previous != mode {
            info!(?mode, "Channel mode toggled");
            if let Some(window) = &self.window {
                window.set_title(&window_title(mode));
            }
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.config.history.initial_mode = *self.mode_tx.borrow();
        if let Err(e) = telemetry_config::save_config(&self.config) {
            error!(?e, "Failed to save config");
        }
        event_loop.exit();
    }
}

fn window_title(mode: ChannelMode) -> String {
    let mode = match mode {
        ChannelMode::Relative => "relative",
        ChannelMode::Absolute => "absolute",
    };
    format!("Telemetry Dashboard ({mode})")
}

fn aspect_ratio(size: PhysicalSize<u32>) -> f32 {
    size.width.max(1) as f32 / size.height.max(1) as f32
}

async fn init_gpu(window: Arc<Window>, config: &AppConfig) -> Result<GpuState, RendererError> {
    let size = window.inner_size();
    let backend = WgpuBackend::new(window, size.width, size.height).await?;
    let renderer = SceneRenderer::new(backend, &BlinnPhong::default(), &DEFAULT_LIGHTS)?;
    let camera = Camera::from_config(&config.camera, aspect_ratio(size));
    let pv = camera.pv_matrix();
    Ok(GpuState {
        renderer,
        camera,
        pv,
    })
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(window_title(*self.mode_tx.borrow()))
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(init_gpu(window.clone(), &self.config)) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                window.request_redraw();
                info!("Application initialized");
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Orientation(sample, drawn) => {
                self.sample = sample;
                if let Some(stale) = self.pending_ack.replace(drawn) {
                    let _ = stale.send(());
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    if let Some(gpu) = &mut self.gpu {
                        gpu.renderer.backend_mut().resize(size.width, size.height);
                        gpu.camera.set_viewport(size.width, size.height);
                        gpu.pv = gpu.camera.pv_matrix();
                    }
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    match event.physical_key {
                        PhysicalKey::Code(KeyCode::KeyM) => {
                            let mode = self.mode_tx.borrow().toggled();
                            self.set_mode(mode);
                        }
                        PhysicalKey::Code(KeyCode::KeyR) => self.set_mode(ChannelMode::Relative),
                        PhysicalKey::Code(KeyCode::KeyA) => self.set_mode(ChannelMode::Absolute),
                        PhysicalKey::Code(KeyCode::Escape) => self.close(event_loop),
                        _ => {}
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &mut self.gpu {
                    if let Err(e) = gpu.renderer.render(&self.sample, &gpu.camera, &gpu.pv) {
                        warn!(error = %e, "Frame dropped");
                    }
                    // Lets the orientation poll fetch the next sample.
                    if let Some(drawn) = self.pending_ack.take() {
                        let _ = drawn.send(());
                    }
                }
            }

            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "telemetry_dashboard=info,telemetry_client=info,telemetry_renderer=info,telemetry_history=info"
                    .into()
            }),
        )
        .init();

    info!("Telemetry dashboard starting");

    // Load config.
    let config = telemetry_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(
        orientation = %config.service.orientation_url,
        history = %config.service.history_url,
        mode = ?config.history.initial_mode,
        "Config loaded"
    );

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let client = build_http_client(&config.service)?;
    let (mode_tx, mode_rx) = watch::channel(config.history.initial_mode);

    let orientation = PollTask::spawn({
        let source =
            JsonEndpoint::<OrientationSample>::new(client.clone(), &config.service.orientation_url);
        let sink = RedrawScheduler(event_loop.create_proxy());
        let backoff = Backoff::from_config(&config.backoff);
        move |shutdown| run_orientation_loop(source, sink, backoff, shutdown)
    });

    let history = PollTask::spawn({
        let source = JsonEndpoint::<HistoryBatch>::new(client, &config.service.history_url);
        let history = HistoryLoop::new(
            source,
            TracingChart::new(config.history.log_every),
            mode_rx,
            Duration::from_millis(config.service.history_interval_ms),
            Backoff::from_config(&config.backoff),
        );
        move |shutdown| history.run(shutdown)
    });

    // Run the application.
    let mut app = App::new(config, mode_tx);
    event_loop.run_app(&mut app)?;

    if let Err(e) = orientation.cancel().await {
        warn!(?e, "Orientation poll ended abnormally");
    }
    match history.cancel().await {
        Ok(state) => info!(last_step = state.context.last_step, "History poll joined"),
        Err(e) => warn!(?e, "History poll ended abnormally"),
    }

    if let Some(e) = app.init_error.take() {
        return Err(e);
    }
    info!("Telemetry dashboard stopped");
    Ok(())
}
