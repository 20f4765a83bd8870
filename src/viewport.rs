use egui::{Vec2, vec2};
use log::debug;

use crate::config::ViewportConfig;
use crate::scene::{Canvas, ViewportTransform};

/// Keeps the workspace fitted to a resizable container
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    container: Vec2,
}

impl ViewportController {
    pub fn new(config: ViewportConfig, container: Vec2) -> Self {
        Self { config, container }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn container(&self) -> Vec2 {
        self.container
    }

    /// Fit the workspace into the container.
    ///
    /// The surface takes the container's size, the zoom becomes
    /// `padding * min(cw / ww, ch / wh)` about the surface centre, the
    /// workspace is centred in the viewport and becomes the clip again.
    pub fn auto_zoom(&self, canvas: &mut Canvas) {
        let Some(workspace) = canvas.find_workspace() else {
            return;
        };
        let workspace_id = workspace.id;
        let workspace_size = workspace.bounds().size();

        canvas.set_dimensions(self.container);
        let center = canvas.center();
        canvas.set_viewport_transform(ViewportTransform::default());

        let fit = if workspace_size.x > 0.0 && workspace_size.y > 0.0 {
            (self.container.x / workspace_size.x).min(self.container.y / workspace_size.y)
        } else {
            1.0
        };
        let zoom = self.config.clamp_zoom(fit * self.config.padding);
        canvas.zoom_to_point(center, zoom);

        let Some(workspace_center) = canvas.center_point_of(workspace_id) else {
            return;
        };
        let mut transform = canvas.viewport();
        transform.pan = vec2(
            canvas.size().x / 2.0 - workspace_center.x * transform.zoom,
            canvas.size().y / 2.0 - workspace_center.y * transform.zoom,
        );
        canvas.set_viewport_transform(transform);
        canvas.set_clip_path(Some(workspace_id));
        debug!("Auto zoom to {zoom:.3} for container {:?}", self.container);
    }

    /// The container changed size
    pub fn resize(&mut self, canvas: &mut Canvas, container: Vec2) {
        self.container = container;
        self.auto_zoom(canvas);
    }

    pub fn zoom_in(&self, canvas: &mut Canvas) {
        self.zoom_by(canvas, self.config.zoom_step);
    }

    pub fn zoom_out(&self, canvas: &mut Canvas) {
        self.zoom_by(canvas, -self.config.zoom_step);
    }

    fn zoom_by(&self, canvas: &mut Canvas, delta: f32) {
        let zoom = self.config.clamp_zoom(canvas.get_zoom() + delta);
        let center = canvas.center();
        canvas.zoom_to_point(center, zoom);
    }
}
