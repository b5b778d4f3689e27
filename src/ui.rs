use egui::Context;

use crate::controller::Simulation;

/// Tessellated overlay ready for the egui render pass
pub struct OverlayFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
}

/// Numbers shown in the debug window, captured once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStats {
    pub fps: f32,
    pub height: f32,
    pub velocity: f32,
    pub azimuth_deg: f32,
    pub elevation_deg: f32,
    pub radius: f32,
}

impl OverlayStats {
    pub fn capture(simulation: &Simulation, dt: f32) -> Self {
        Self {
            fps: if dt > 0.0 { 1.0 / dt } else { 0.0 },
            height: simulation.ball.height,
            velocity: simulation.ball.velocity,
            azimuth_deg: simulation.camera.azimuth.to_degrees(),
            elevation_deg: simulation.camera.elevation.to_degrees(),
            radius: simulation.camera.radius,
        }
    }
}

/// Build the overlay UI into `ctx`
pub fn build_ui(ctx: &Context, stats: &OverlayStats) {
    draw_debug_window(ctx, stats);
}

fn draw_debug_window(ctx: &Context, stats: &OverlayStats) {
    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", stats.fps)).small());
            ui.label(egui::RichText::new(format!("Height: {:.2} Velocity: {:.2}", stats.height, stats.velocity)).small());
            ui.label(egui::RichText::new(format!("Azimuth: {:.1} Elevation: {:.1}", stats.azimuth_deg, stats.elevation_deg)).small());
            ui.label(egui::RichText::new(format!("Radius: {:.2}", stats.radius)).small());
            ui.separator();
            ui.label(egui::RichText::new("Controls:").small());
            ui.label(egui::RichText::new("Left drag - Orbit").small());
            ui.label(egui::RichText::new("Shift + drag - Zoom").small());
            ui.label(egui::RichText::new("R - Drop ball again").small());
            ui.label(egui::RichText::new("Esc - Quit").small());
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_capture() {
        let sim = Simulation::default();
        let stats = OverlayStats::capture(&sim, 0.016);
        assert!((stats.fps - 62.5).abs() < 1e-3);
        assert_eq!(stats.height, 5.0);
        assert!((stats.azimuth_deg - 90.0).abs() < 1e-4);
        assert_eq!(OverlayStats::capture(&sim, 0.0).fps, 0.0);
    }

    #[test]
    fn test_build_ui_runs_headless() {
        let ctx = Context::default();
        let stats = OverlayStats::capture(&Simulation::default(), 0.016);
        let output = ctx.run(egui::RawInput::default(), |ctx| build_ui(ctx, &stats));
        // first frame uploads the font atlas
        assert!(!output.textures_delta.set.is_empty());
    }
}
