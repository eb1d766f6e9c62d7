use crate::{
    canvas::{Canvas, Input, Key, Style},
    config::ViewerConfigs,
    net::Command,
    state::{ShipId, State, Vector3},
    world::WorldState,
};
use smallvec::SmallVec;

/// Pan and zoom of the map. Applying them is up to the toolkit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World position at the center of the screen.
    pub position: Vector3,
    /// Zoom in >1 or out <1.
    pub zoom: f64,
}
impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            zoom: 1.0,
        }
    }
}

/// Main loop logic of the map, independent of any toolkit.
pub struct Viewer {
    configs: ViewerConfigs,
    self_id: ShipId,
    world: WorldState,
    pub camera: Camera,
}
impl Viewer {
    pub fn new(configs: ViewerConfigs, self_id: ShipId) -> Self {
        Self {
            configs,
            self_id,
            world: WorldState::new(),
            camera: Default::default(),
        }
    }

    pub fn on_snapshot(&mut self, state: State) {
        self.world.replace(state, self.self_id);
    }

    /// Handle this frame's inputs.
    ///
    /// Return the commands to send to the server.
    pub fn update(&mut self, input: &impl Input, delta: f64) -> SmallVec<[Command; 2]> {
        let mut commands = SmallVec::new();

        if input.just_pressed(Key::Space) {
            log::debug!("Resetting camera");
            if let Some(own) = self.world.presentation().own {
                self.camera.position = own.position;
                log::debug!("{}, {}", own.position.x, own.position.y);
            }
        }

        // Only the last one counts if several are pressed.
        let sensor_range = self
            .configs
            .sensor_ranges
            .iter()
            .zip(1u8..=9)
            .filter(|(_, digit)| input.just_pressed(Key::Digit(*digit)))
            .map(|(range, _)| *range)
            .last();
        if let Some(sensor_range) = sensor_range {
            log::info!("Sensor range {}", sensor_range);
            commands.push(Command::sensor_range(sensor_range));
        }

        let step = self.configs.camera_speed * delta;
        if input.is_pressed(Key::Left) {
            self.camera.position.x -= step;
        }
        if input.is_pressed(Key::Right) {
            self.camera.position.x += step;
        }
        if input.is_pressed(Key::Down) {
            self.camera.position.y -= step;
        }
        if input.is_pressed(Key::Up) {
            self.camera.position.y += step;
        }

        let scroll = input.mouse_scroll();
        if scroll != 0.0 {
            self.camera.zoom *= self.configs.zoom_speed.powf(scroll);
        }

        if input.just_pressed(Key::MouseLeft) {
            let mouse = input.mouse_world_position();
            commands.push(Command::SetTargetLocation {
                location: Vector3::new(mouse.x, mouse.y, 0.0),
            });
        }

        commands
    }

    /// Draw the last snapshot as seen from our ship.
    pub fn draw(&self, canvas: &mut impl Canvas, target_location: Option<Vector3>) {
        let thickness = 1.0 / self.camera.zoom;
        let radius = self.configs.ship_radius;
        let presentation = self.world.presentation();

        if let Some(own) = presentation.own {
            if let Some(target) = target_location {
                canvas.draw_line(own.position, target, thickness, Style::TargetLine);
            }
            canvas.draw_circle(own.position, radius, thickness * 1.5, Style::OwnShip);
        }

        for ship in presentation.in_range.iter() {
            canvas.draw_circle(ship.position, radius, thickness, ship.highlight.into());
            canvas.draw_label(ship.position, &ship.id.to_string(), Style::Label);
        }

        canvas.draw_hud_label(&format!("Ships: {}", self.world.num_ships()));
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }
}
