use std::error::Error;
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eframe::egui;
use tracing::{error, info};

use geolabel_core::{CoreError, GeoFrame, GeoPoint, MAX_STEP_SIZE_PX};
use geolabel_render::MarkerStyle;

use crate::app_dir;
use crate::app_state::SessionPhase;
use crate::cli::Cli;
use crate::config::LabelConfig;
use crate::fetch::{HttpImageFetcher, ImageFetcher};
use crate::fetch_worker::{spawn_fetch, FetchOutcome};
use crate::records::CsvRecordWriter;
use crate::session::{CommitError, LabelSession};

// ---------------------------------------------------------------------------
// Application struct
// ---------------------------------------------------------------------------

pub(crate) struct LabelApp {
    pub(crate) config: LabelConfig,
    pub(crate) frame: GeoFrame,
    pub(crate) phase: SessionPhase,
    /// `None` while loading, after a failed start, and after commit.
    pub(crate) session: Option<LabelSession>,
    fetch_rx: Option<mpsc::Receiver<FetchOutcome>>,
    pub(crate) writer: CsvRecordWriter,

    // Display
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) texture_dirty: bool,
    /// Slider value; mirrored into the session when it changes.
    pub(crate) step_size: u32,
    /// Last error worth showing to the operator (e.g. a failed CSV write).
    pub(crate) status: Option<String>,
}

impl LabelApp {
    pub(crate) fn new(
        ctx: &egui::Context,
        config: LabelConfig,
        frame: GeoFrame,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        let repaint = ctx.clone();
        let labels = config.labels.clone();
        let wake = move || repaint.request_repaint();
        let (phase, fetch_rx) = match spawn_fetch(fetcher, frame, labels, wake) {
            Ok(rx) => (SessionPhase::Loading, Some(rx)),
            Err(e) => {
                error!("Failed to spawn image fetch worker: {e}");
                (
                    SessionPhase::Failed(format!("could not start image fetch: {e}")),
                    None,
                )
            }
        };
        Self {
            writer: CsvRecordWriter::new(config.records_csv.clone()),
            step_size: config.initial_step_size_px.min(MAX_STEP_SIZE_PX),
            config,
            frame,
            phase,
            session: None,
            fetch_rx,
            texture: None,
            texture_dirty: false,
            status: None,
        }
    }

    /// Pick up the fetch worker's result, if it has arrived.
    fn poll_fetch(&mut self) {
        let Some(rx) = &self.fetch_rx else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.fetch_rx = None;
                self.phase = SessionPhase::Failed("image fetch ended without a result".into());
                return;
            }
        };
        self.fetch_rx = None;

        match outcome {
            Ok(session) => {
                let session = session
                    .with_marker_style(MarkerStyle::with_radius(self.config.marker_radius_px))
                    .with_step_size(self.step_size as i64);
                self.session = Some(session);
                self.phase = SessionPhase::Labelling;
                self.texture_dirty = true;
            }
            Err(e) => {
                error!("Could not start labelling session: {e}");
                self.phase = SessionPhase::Failed(e.to_string());
            }
        }
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut LabelSession, CoreError> {
        self.session.as_mut().ok_or(CoreError::UninitializedState)
    }

    /// Apply one navigation event to the live session.
    ///
    /// Without a live session nothing moves and the error is returned.
    pub(crate) fn navigate(
        &mut self,
        action: impl FnOnce(&mut LabelSession) -> GeoPoint,
    ) -> Result<GeoPoint, CoreError> {
        let session = self.session_mut().inspect_err(|e| error!("Navigation rejected: {e}"))?;
        let geo = action(session);
        info!("Longitude, Latitude: {geo}");
        self.texture_dirty = true;
        Ok(geo)
    }

    /// Push the slider value into the live session. Before the session
    /// exists the value is kept and applied when it starts.
    pub(crate) fn apply_step_size(&mut self) {
        let requested = self.step_size as i64;
        if let Some(session) = self.session.as_mut() {
            session.set_step_size(requested);
            self.step_size = session.step_size();
        }
    }

    /// Write the current coordinate under `label` and close the window.
    /// On failure the session stays live and the error is shown.
    pub(crate) fn commit_label(&mut self, ctx: &egui::Context, label: &str) {
        let Some(session) = self.session.take() else {
            error!("Label {label:?} rejected: {}", CoreError::UninitializedState);
            return;
        };
        match session.commit(label, &mut self.writer) {
            Ok(record) => {
                info!(
                    "Wrote {} to {}",
                    record.to_csv_row(),
                    self.writer.path().display()
                );
                self.phase = SessionPhase::Committed;
                self.status = None;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            Err(CommitError { error, session }) => {
                error!("{error}");
                self.status = Some(error.to_string());
                self.session = Some(*session);
            }
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        if !self.texture_dirty {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        let buffer = session.annotated_image();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [buffer.width as usize, buffer.height as usize],
            &buffer.pixels,
        );
        self.texture = Some(ctx.load_texture("map", image, egui::TextureOptions::NEAREST));
        self.texture_dirty = false;
    }
}

// ---------------------------------------------------------------------------
// eframe::App
// ---------------------------------------------------------------------------

impl eframe::App for LabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetch();
        self.handle_keyboard(ctx);

        self.draw_controls(ctx);
        self.draw_label_bar(ctx);
        self.refresh_texture(ctx);
        self.draw_canvas(ctx);

        if self.texture_dirty {
            ctx.request_repaint();
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match start(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn start(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = app_dir::resolve_config_path(cli.config.as_deref());
    if cli.init_config {
        LabelConfig::write_default(&config_path)?;
        return Ok(());
    }

    let config = LabelConfig::load(&config_path)?;
    let center = cli.center();
    let frame = config.frame(center)?;
    let fetcher = HttpImageFetcher::new(
        config.image_url_template.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    )?;

    info!(
        "Starting GeoLabel at {center} (records: {})",
        config.records_csv.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Labelling")
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "GeoLabel",
        options,
        Box::new(move |cc| {
            Ok(Box::new(LabelApp::new(
                &cc.egui_ctx,
                config,
                frame,
                Arc::new(fetcher),
            )))
        }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use geolabel_core::{BoundingBox, PixelPoint, StepDirection};
    use geolabel_render::RenderBuffer;

    use crate::fetch::FetchError;

    struct SolidFetcher;

    impl ImageFetcher for SolidFetcher {
        fn fetch_image(&self, _bbox: &BoundingBox, size_px: u32) -> Result<RenderBuffer, FetchError> {
            Ok(RenderBuffer::filled(size_px, size_px, [30, 60, 30, 255]))
        }
    }

    fn app() -> LabelApp {
        let config = LabelConfig {
            image_size_px: 16,
            ..LabelConfig::default()
        };
        let frame = config.frame(GeoPoint::new(10.0, 50.0)).unwrap();
        LabelApp::new(&egui::Context::default(), config, frame, Arc::new(SolidFetcher))
    }

    fn wait_for_session(app: &mut LabelApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.phase == SessionPhase::Loading && Instant::now() < deadline {
            app.poll_fetch();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(app.phase, SessionPhase::Labelling);
    }

    #[test]
    fn navigation_without_session_is_rejected() {
        let mut app = app();
        assert!(app.session.is_none());

        let err = app.navigate(|s| s.on_step(StepDirection::XPlus)).unwrap_err();
        assert!(matches!(err, CoreError::UninitializedState));
        assert!(!app.texture_dirty);
    }

    #[test]
    fn navigation_moves_live_session() {
        let mut app = app();
        wait_for_session(&mut app);

        let geo = app.navigate(|s| s.on_click(PixelPoint::new(0.0, 8.0))).unwrap();
        assert!(geo.longitude < 10.0);
        assert_eq!(geo.latitude, 50.0);
        assert!(app.texture_dirty);
    }

    #[test]
    fn step_size_chosen_while_loading_is_applied_on_start() {
        let mut app = app();
        app.step_size = 12;
        app.apply_step_size();
        assert_eq!(app.step_size, 12);

        wait_for_session(&mut app);
        let session = app.session.as_ref().expect("live session");
        assert_eq!(session.step_size(), 12);
    }
}
