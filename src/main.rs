use exsim_viewer::{
    canvas::{Canvas, Input, Key, Style},
    logger::Logger,
    viewer::Camera,
    Client, ClientConfigs, Vector3, Viewer,
};
use macroquad::prelude::*;
use std::sync::OnceLock;

/// Read once. The window is configured before the logger exists.
fn load_configs() -> &'static anyhow::Result<ClientConfigs> {
    static CONFIGS: OnceLock<anyhow::Result<ClientConfigs>> = OnceLock::new();
    CONFIGS.get_or_init(ClientConfigs::from_args)
}

fn window_conf() -> Conf {
    let configs = match load_configs() {
        Ok(configs) => configs.window_configs.clone(),
        Err(_) => Default::default(),
    };
    Conf {
        window_title: configs.title,
        window_width: configs.width,
        window_height: configs.height,
        window_resizable: configs.resizable,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = Logger::init(log::LevelFilter::Debug) {
        eprintln!("can not start logger: {}", err);
    }
    let configs = match load_configs() {
        Ok(configs) => configs.clone(),
        Err(err) => {
            log::warn!("{:#}. Using default configs...", err);
            ClientConfigs::default()
        }
    };
    log::set_max_level(configs.log_level);

    prevent_quit();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            log::error!("Could not start async runtime: {}", err);
            return;
        }
    };

    let mut client = Client::new(configs.user_id);
    if client
        .connect(&configs.server_addr, &configs.connection_configs, &rt)
        .is_err()
    {
        log::warn!("Running without a server. The map stays empty.");
    }

    let mut viewer = Viewer::new(configs.viewer_configs, configs.user_id);

    loop {
        let delta = get_frame_time() as f64;

        // At most one snapshot per frame. Older ones are never skipped.
        if let Some(state) = client.try_recv_snapshot() {
            viewer.on_snapshot(state);
        }

        let input = MacroquadInput {
            camera: to_camera2d(&viewer.camera),
        };
        for command in viewer.update(&input, delta) {
            client.send_command(command);
        }

        clear_background(SKYBLUE);

        let camera = to_camera2d(&viewer.camera);
        set_camera(&camera);
        let mut canvas = MacroquadCanvas::new(camera);
        viewer.draw(&mut canvas, client.target_location());
        canvas.finish();

        if is_quit_requested() {
            log::info!("Quitting...");
            break;
        }

        next_frame().await
    }

    rt.shutdown_background();
}

fn to_camera2d(camera: &Camera) -> Camera2D {
    let zoom = camera.zoom as f32;
    Camera2D {
        target: vec2(camera.position.x as f32, camera.position.y as f32),
        zoom: vec2(zoom * 2.0 / screen_width(), zoom * 2.0 / screen_height()),
        ..Default::default()
    }
}

fn color(style: Style) -> Color {
    match style {
        Style::OwnShip | Style::InRange | Style::Label => BLACK,
        Style::NewInRange => RED,
        Style::TargetLine => DARKGRAY,
        Style::Hud => DARKGREEN,
    }
}

/// Shapes are drawn right away with the map camera.
/// Text is queued and drawn in screen space by `finish` so it is never scaled or flipped.
struct MacroquadCanvas {
    camera: Camera2D,
    labels: Vec<(Vec2, String, Color)>,
    hud: Vec<String>,
}
impl MacroquadCanvas {
    const FONT_SIZE: f32 = 16.0;

    fn new(camera: Camera2D) -> Self {
        Self {
            camera,
            labels: Vec::new(),
            hud: Vec::new(),
        }
    }

    fn finish(self) {
        set_default_camera();

        for (position, text, color) in self.labels.iter() {
            draw_text(text, position.x, position.y, Self::FONT_SIZE, *color);
        }

        let mut y = screen_height() - 10.0;
        for text in self.hud.iter().rev() {
            draw_text(text, 10.0, y, Self::FONT_SIZE, color(Style::Hud));
            y -= Self::FONT_SIZE;
        }
    }
}
impl Canvas for MacroquadCanvas {
    fn draw_circle(&mut self, center: Vector3, radius: f64, stroke_width: f64, style: Style) {
        draw_circle_lines(
            center.x as f32,
            center.y as f32,
            radius as f32,
            stroke_width as f32,
            color(style),
        );
    }

    fn draw_line(&mut self, from: Vector3, to: Vector3, stroke_width: f64, style: Style) {
        macroquad::shapes::draw_line(
            from.x as f32,
            from.y as f32,
            to.x as f32,
            to.y as f32,
            stroke_width as f32,
            color(style),
        );
    }

    fn draw_label(&mut self, position: Vector3, text: &str, style: Style) {
        let screen = self
            .camera
            .world_to_screen(vec2(position.x as f32, position.y as f32));
        self.labels.push((screen, text.to_string(), color(style)));
    }

    fn draw_hud_label(&mut self, text: &str) {
        self.hud.push(text.to_string());
    }
}

struct MacroquadInput {
    camera: Camera2D,
}
impl Input for MacroquadInput {
    fn is_pressed(&self, key: Key) -> bool {
        match key {
            Key::MouseLeft => is_mouse_button_down(MouseButton::Left),
            key => key_code(key).is_some_and(is_key_down),
        }
    }

    fn just_pressed(&self, key: Key) -> bool {
        match key {
            Key::MouseLeft => is_mouse_button_pressed(MouseButton::Left),
            key => key_code(key).is_some_and(is_key_pressed),
        }
    }

    fn mouse_scroll(&self) -> f64 {
        // Platforms disagree on the wheel unit. Count steps.
        let (_, y) = mouse_wheel();
        if y == 0.0 {
            0.0
        } else {
            y.signum() as f64
        }
    }

    fn mouse_world_position(&self) -> Vector3 {
        let (x, y) = mouse_position();
        let world = self.camera.screen_to_world(vec2(x, y));
        Vector3::new(world.x as f64, world.y as f64, 0.0)
    }
}

fn key_code(key: Key) -> Option<KeyCode> {
    let code = match key {
        Key::Space => KeyCode::Space,
        Key::Digit(0) => KeyCode::Key0,
        Key::Digit(1) => KeyCode::Key1,
        Key::Digit(2) => KeyCode::Key2,
        Key::Digit(3) => KeyCode::Key3,
        Key::Digit(4) => KeyCode::Key4,
        Key::Digit(5) => KeyCode::Key5,
        Key::Digit(6) => KeyCode::Key6,
        Key::Digit(7) => KeyCode::Key7,
        Key::Digit(8) => KeyCode::Key8,
        Key::Digit(9) => KeyCode::Key9,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Digit(_) | Key::MouseLeft => return None,
    };
    Some(code)
}
