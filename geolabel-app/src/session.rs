use std::fmt;

use thiserror::Error;
use tracing::info;

use geolabel_core::{CoreError, GeoFrame, GeoPoint, NavigationState, PixelPoint, StepDirection};
use geolabel_render::{initial_display, render_marker, MarkerStyle, RenderBuffer};

use crate::fetch::{FetchError, ImageFetcher};
use crate::records::{LabelRecord, RecordWriter, WriteError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("label {0:?} is not one of the configured labels")]
    UnknownLabel(String),

    #[error("map image is {width}×{height}, expected {expected}×{expected}")]
    RasterSize {
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// A commit that did not go through. The session is handed back unchanged
/// so the operator can retry or pick another label.
#[derive(Debug, Error)]
#[error("commit failed: {error}")]
pub struct CommitError {
    #[source]
    pub error: SessionError,
    pub session: Box<LabelSession>,
}

/// One labelling session: a fetched map image around a fixed center and the
/// marker the operator moves across it.
///
/// The base image is never drawn on; [`annotated_image`](Self::annotated_image)
/// composites onto a fresh copy each time. Committing consumes the session.
pub struct LabelSession {
    nav: NavigationState,
    base: RenderBuffer,
    labels: Vec<String>,
    marker: MarkerStyle,
    moved: bool,
}

impl LabelSession {
    /// Fetch the base image for `frame` and start a session on it.
    ///
    /// The request box and the click mapping both come from `frame`.
    pub fn bootstrap(
        frame: GeoFrame,
        labels: Vec<String>,
        fetcher: &dyn ImageFetcher,
    ) -> Result<Self, SessionError> {
        let base = fetcher.fetch_image(&frame.bounding_box(), frame.image_size_px)?;
        Self::with_base(frame, labels, base)
    }

    /// Start a session on an image already fetched for `frame`.
    ///
    /// The image must be exactly `image_size_px` square, otherwise clicks on
    /// it would be converted with the wrong scale.
    pub fn with_base(
        frame: GeoFrame,
        labels: Vec<String>,
        base: RenderBuffer,
    ) -> Result<Self, SessionError> {
        if base.width != frame.image_size_px || base.height != frame.image_size_px {
            return Err(SessionError::RasterSize {
                width: base.width,
                height: base.height,
                expected: frame.image_size_px,
            });
        }
        info!(
            lon = frame.center.longitude,
            lat = frame.center.latitude,
            size = frame.image_size_px,
            span = frame.relative_span,
            "Labelling session started"
        );
        Ok(Self {
            nav: NavigationState::new(frame),
            base,
            labels,
            marker: MarkerStyle::default(),
            moved: false,
        })
    }

    pub fn with_marker_style(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_step_size(mut self, px: i64) -> Self {
        self.nav.set_step_size(px);
        self
    }

    pub fn on_click(&mut self, pixel: PixelPoint) -> GeoPoint {
        self.moved = true;
        self.nav.on_click(pixel)
    }

    pub fn on_step(&mut self, direction: StepDirection) -> GeoPoint {
        self.moved = true;
        self.nav.on_step(direction)
    }

    pub fn set_step_size(&mut self, px: i64) -> u32 {
        self.nav.set_step_size(px)
    }

    pub fn step_size(&self) -> u32 {
        self.nav.step_size()
    }

    pub fn current_geo_coordinate(&self) -> GeoPoint {
        self.nav.current_geo()
    }

    pub fn current_pixel(&self) -> PixelPoint {
        self.nav.current_pixel()
    }

    pub fn frame(&self) -> &GeoFrame {
        self.nav.frame()
    }

    /// The image to display: the center mark until the operator first moves
    /// the marker, the position marker afterwards.
    pub fn annotated_image(&self) -> RenderBuffer {
        if self.moved {
            render_marker(&self.base, self.nav.current_pixel(), &self.marker)
        } else {
            let frame = self.nav.frame();
            initial_display(&self.base, frame.center, frame.center_pixel(), &self.marker)
        }
    }

    /// `longitude,latitude` of the current position.
    pub fn clipboard_text(&self) -> String {
        self.current_geo_coordinate().to_string()
    }

    /// Fill `{lat}` and `{lon}` in a map link template.
    pub fn map_link(&self, template: &str) -> String {
        let geo = self.current_geo_coordinate();
        template
            .replace("{lat}", &geo.latitude.to_string())
            .replace("{lon}", &geo.longitude.to_string())
    }

    /// Record the current position under `label` and end the session.
    pub fn commit(
        self,
        label: &str,
        writer: &mut dyn RecordWriter,
    ) -> Result<LabelRecord, CommitError> {
        if !self.labels.iter().any(|l| l == label) {
            return Err(self.reject(SessionError::UnknownLabel(label.to_string())));
        }
        let geo = self.current_geo_coordinate();
        if let Err(e) = writer.append_record(geo.longitude, geo.latitude, label) {
            return Err(self.reject(e.into()));
        }
        info!(
            lon = geo.longitude,
            lat = geo.latitude,
            label,
            "Label committed"
        );
        Ok(LabelRecord {
            longitude: geo.longitude,
            latitude: geo.latitude,
            label: label.to_string(),
        })
    }

    fn reject(self, error: SessionError) -> CommitError {
        CommitError {
            error,
            session: Box::new(self),
        }
    }
}

impl fmt::Debug for LabelSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelSession")
            .field("frame", self.nav.frame())
            .field("current_pixel", &self.nav.current_pixel())
            .field("current_geo", &self.nav.current_geo())
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use geolabel_core::BoundingBox;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GROUND: [u8; 4] = [40, 120, 40, 255];

    /// Records what it was asked for and returns a plain image of that size.
    #[derive(Default)]
    struct StubFetcher {
        requests: Mutex<Vec<(BoundingBox, u32)>>,
    }

    impl ImageFetcher for StubFetcher {
        fn fetch_image(
            &self,
            bbox: &BoundingBox,
            size_px: u32,
        ) -> Result<RenderBuffer, FetchError> {
            self.requests.lock().unwrap().push((*bbox, size_px));
            Ok(RenderBuffer::filled(size_px, size_px, GROUND))
        }
    }

    struct DownFetcher;

    impl ImageFetcher for DownFetcher {
        fn fetch_image(&self, _: &BoundingBox, _: u32) -> Result<RenderBuffer, FetchError> {
            Err(FetchError::Status {
                status: 502,
                url: "stub".into(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryWriter {
        rows: Vec<(f64, f64, String)>,
        fail: bool,
    }

    impl RecordWriter for MemoryWriter {
        fn append_record(
            &mut self,
            longitude: f64,
            latitude: f64,
            label: &str,
        ) -> Result<(), WriteError> {
            if self.fail {
                return Err(WriteError::Io {
                    path: "memory".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
                });
            }
            self.rows.push((longitude, latitude, label.to_string()));
            Ok(())
        }
    }

    fn labels() -> Vec<String> {
        vec!["house".to_string(), "tree".to_string()]
    }

    fn frame() -> GeoFrame {
        GeoFrame::new(GeoPoint::new(10.0, 50.0), 512, 0.02).unwrap()
    }

    fn session() -> LabelSession {
        LabelSession::bootstrap(frame(), labels(), &StubFetcher::default()).unwrap()
    }

    #[test]
    fn bootstrap_requests_the_frame_bounding_box() {
        let fetcher = StubFetcher::default();
        let session = LabelSession::bootstrap(frame(), labels(), &fetcher).unwrap();

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (bbox, size) = requests[0];
        assert_eq!(size, 512);
        assert_eq!(bbox, frame().bounding_box());

        // A click on the top-left pixel lands on the requested box's
        // north-west corner: the same span and size calibrate both.
        let mut session = session;
        let corner = session.on_click(PixelPoint::new(0.0, 0.0));
        assert!((corner.longitude - bbox.west).abs() < 1e-9);
        assert!((corner.latitude - bbox.north).abs() < 1e-9);
    }

    #[test]
    fn fetch_failure_is_surfaced() {
        let err = LabelSession::bootstrap(frame(), labels(), &DownFetcher).unwrap_err();
        assert!(matches!(err, SessionError::Fetch(FetchError::Status { status: 502, .. })));
    }

    #[test]
    fn wrong_raster_size_is_rejected() {
        let err = LabelSession::with_base(frame(), labels(), RenderBuffer::new(256, 256))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::RasterSize {
                width: 256,
                expected: 512,
                ..
            }
        ));
    }

    #[test]
    fn starts_at_center_with_center_mark() {
        let session = session();
        assert_eq!(session.current_geo_coordinate(), GeoPoint::new(10.0, 50.0));
        let shown = session.annotated_image();
        assert_eq!(shown.pixel(256, 256), Some(RED));
        assert_eq!(session.base.pixel(256, 256), Some(GROUND));
    }

    #[test]
    fn unset_center_shows_raw_image() {
        let frame = GeoFrame::new(GeoPoint::UNSET, 64, 0.02).unwrap();
        let session = LabelSession::bootstrap(frame, labels(), &StubFetcher::default()).unwrap();
        assert_eq!(&session.annotated_image(), &session.base);
    }

    #[test]
    fn marker_follows_clicks_and_steps() {
        let mut session = session().with_step_size(10);
        session.on_click(PixelPoint::new(100.0, 100.0));
        session.on_step(StepDirection::YPlus);

        assert_eq!(session.current_pixel(), PixelPoint::new(100.0, 110.0));
        let shown = session.annotated_image();
        assert_eq!(shown.pixel(100, 110), Some(RED));
        assert_eq!(shown.pixel(100, 100), Some(GROUND));
        // Center mark is gone once the operator has moved.
        assert_eq!(shown.pixel(256, 256), Some(GROUND));
    }

    #[test]
    fn step_persists_both_coordinates() {
        let mut session = session();
        session.on_click(PixelPoint::new(300.0, 200.0));
        let geo = session.on_step(StepDirection::XMinus);
        assert_eq!(session.current_geo_coordinate(), geo);
        assert_eq!(geo, session.frame().pixel_to_geo(PixelPoint::new(295.0, 200.0)));
    }

    #[test]
    fn commit_hands_current_coordinate_to_writer() {
        let mut session = session();
        let expected = session.on_click(PixelPoint::new(0.0, 0.0));
        let mut writer = MemoryWriter::default();

        let record = session.commit("tree", &mut writer).expect("commit");
        assert_eq!(record.label, "tree");
        assert_eq!(record.longitude, expected.longitude);
        assert_eq!(record.latitude, expected.latitude);
        assert_eq!(
            writer.rows,
            vec![(expected.longitude, expected.latitude, "tree".to_string())]
        );
    }

    #[test]
    fn unknown_label_returns_the_session() {
        let mut session = session();
        session.on_click(PixelPoint::new(10.0, 20.0));
        let mut writer = MemoryWriter::default();

        let err = session.commit("car", &mut writer).unwrap_err();
        assert!(matches!(err.error, SessionError::UnknownLabel(ref l) if l == "car"));
        assert!(writer.rows.is_empty());
        assert_eq!(err.session.current_pixel(), PixelPoint::new(10.0, 20.0));
    }

    #[test]
    fn write_failure_returns_the_session() {
        let session = session();
        let mut writer = MemoryWriter {
            fail: true,
            ..MemoryWriter::default()
        };
        let err = session.commit("house", &mut writer).unwrap_err();
        assert!(matches!(err.error, SessionError::Write(_)));

        let retry = *err.session;
        let mut writer = MemoryWriter::default();
        retry.commit("house", &mut writer).expect("retry succeeds");
        assert_eq!(writer.rows.len(), 1);
    }

    #[test]
    fn clipboard_and_map_link() {
        let session = session();
        assert_eq!(session.clipboard_text(), "10,50");
        assert_eq!(
            session.map_link("https://maps.example/?q={lat},{lon}"),
            "https://maps.example/?q=50,10"
        );
    }
}
