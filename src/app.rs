use glam::DVec3;
use tui_globe::geo::GeoCoordinate;
use tui_globe::map::{LayerCompositor, LayerKind, Rotation, TileCacheConfig, VectorLayer, Viewport};

/// Default view center, mid-Atlantic with a northern-hemisphere bias.
const HOME_LON_DEG: f64 = 0.0;
const HOME_LAT_DEG: f64 = 20.0;
const HOME_ZOOM: i32 = 1000;

/// Pixels of rotation applied per arrow-key press.
const KEY_ROTATE_PIXELS: i32 = 40;

/// Application state: the projection core plus shell bookkeeping.
pub struct App {
    pub viewport: Viewport,
    pub compositor: LayerCompositor,
    pub layers: Vec<VectorLayer>,
    pub tile_cache: TileCacheConfig,
    pub should_quit: bool,
    /// Last mouse position for drag tracking.
    pub last_mouse: Option<(u16, u16)>,
}

impl App {
    pub fn new(width: usize, height: usize) -> Self {
        let (pw, ph) = braille_pixels(width, height);
        let mut viewport = Viewport::new(pw as u32, ph as u32);
        let _ = viewport.set_zoom(HOME_ZOOM);
        viewport.set_rotation(Rotation::looking_at(GeoCoordinate::from_degrees(
            HOME_LON_DEG,
            HOME_LAT_DEG,
        )));

        Self {
            viewport,
            compositor: LayerCompositor::new(),
            layers: Vec::new(),
            tile_cache: TileCacheConfig::default(),
            should_quit: false,
            last_mouse: None,
        }
    }

    /// Update viewport size when the terminal resizes.
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pw, ph) = braille_pixels(width, height);
        let _ = self.viewport.resize(pw as i32, ph as i32);
    }

    /// Spin the globe by a pixel delta: the surface follows the cursor.
    pub fn rotate_by_pixels(&mut self, dx: i32, dy: i32) {
        let r = self.viewport.radius();
        let yaw = dx as f64 / r;
        let pitch = dy as f64 / r;
        if yaw.abs() > 1e-10 {
            self.viewport.rotate(Rotation::from_axis_angle(DVec3::Z, yaw));
        }
        if pitch.abs() > 1e-10 {
            self.viewport.rotate(Rotation::from_axis_angle(DVec3::Y, pitch));
        }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.rotate_by_pixels(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.step_up();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.step_down();
    }

    /// Restore the home orientation and zoom.
    pub fn reset_view(&mut self) {
        self.viewport.set_rotation(Rotation::looking_at(GeoCoordinate::from_degrees(
            HOME_LON_DEG,
            HOME_LAT_DEG,
        )));
        let _ = self.viewport.set_zoom(HOME_ZOOM);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_layer(&mut self, kind: LayerKind) {
        self.compositor.toggle(kind);
    }

    /// Country and state borders toggle together, like the classic desktop globes.
    pub fn toggle_borders(&mut self) {
        let visible = self.compositor.is_visible(LayerKind::CountryBorder);
        let _ = self
            .compositor
            .set_visible(LayerKind::CountryBorder.name(), !visible);
        let _ = self
            .compositor
            .set_visible(LayerKind::StateBorder.name(), !visible);
    }

    pub fn toggle_ice(&mut self) {
        self.toggle_layer(LayerKind::Ice);
        self.toggle_layer(LayerKind::Glacier);
    }

    /// Handle mouse drag: rotate so the surface follows the cursor.
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            // Terminal cells are 2x4 braille pixels.
            let dx = (x as i32 - last_x as i32) * 2;
            let dy = (y as i32 - last_y as i32) * 4;
            self.rotate_by_pixels(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn rotate_left(&mut self) {
        self.rotate_by_pixels(KEY_ROTATE_PIXELS, 0);
    }

    pub fn rotate_right(&mut self) {
        self.rotate_by_pixels(-KEY_ROTATE_PIXELS, 0);
    }

    pub fn rotate_up(&mut self) {
        self.rotate_by_pixels(0, KEY_ROTATE_PIXELS);
    }

    pub fn rotate_down(&mut self) {
        self.rotate_by_pixels(0, -KEY_ROTATE_PIXELS);
    }

    /// Current zoom as a status-bar string.
    pub fn zoom_level(&self) -> String {
        format!("{}", self.viewport.zoom())
    }

    /// Coordinates under the screen center as a status-bar string.
    pub fn center_coords(&self) -> String {
        let center = self.viewport.unproject(
            self.viewport.width() as f64 / 2.0,
            self.viewport.height() as f64 / 2.0,
        );
        match center {
            Some(c) => {
                let lat = c.lat.to_degrees();
                let lon = c.lon.to_degrees();
                format!(
                    "{:.1}°{}, {:.1}°{}",
                    lat.abs(),
                    if lat >= 0.0 { "N" } else { "S" },
                    lon.abs(),
                    if lon >= 0.0 { "E" } else { "W" }
                )
            }
            None => "-".to_string(),
        }
    }
}

/// Terminal cells to braille pixels, minus the border and status bar.
fn braille_pixels(width: usize, height: usize) -> (usize, usize) {
    let inner_width = width.saturating_sub(2);
    let inner_height = height.saturating_sub(3);
    (inner_width * 2, inner_height * 4)
}
