use std::rc::Rc;

use log::{error, info};
use sdl2::keyboard::Keycode;

use softrend::prelude::*;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;

const SHADE_MODES: [ShadeMode; 4] = [
    ShadeMode::Flat,
    ShadeMode::Smooth,
    ShadeMode::Textured,
    ShadeMode::Wireframe,
];

/// 8x8 checkerboard used by the textured mode.
fn checker_texture() -> Result<Texture> {
    let (dark, light) = (Color3::new(40, 40, 160), Color3::new(230, 230, 230));
    let pixels = (0..64)
        .map(|i| {
            let (x, y) = (i % 8, i / 8);
            let color = if (x + y) % 2 == 0 { light } else { dark };
            color.to_argb(0xff)
        })
        .collect();
    Texture::from_argb(8, 8, pixels)
}

fn material_for(mode: ShadeMode, texture: &Rc<Texture>) -> Rc<Material> {
    Rc::new(match mode {
        ShadeMode::Textured => Material::textured(Rc::clone(texture)),
        _ => Material::new(mode, Color3::new(220, 120, 60)),
    })
}

/// Cube with per-corner colors and UVs so every shade mode has something to show.
fn demo_cube(material: Rc<Material>) -> Result<Mesh> {
    const CORNER_COLORS: [Color3; 4] = [Color3::RED, Color3::GREEN, Color3::BLUE, Color3::WHITE];
    const CORNER_UVS: [(f32, f32); 4] = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)];

    let mut mesh = Mesh::new();
    for submesh in Mesh::cube(Rc::clone(&material))?.submeshes() {
        let vertices = submesh
            .indices()
            .iter()
            .enumerate()
            .map(|(i, &index)| {
                let corner = [0, 1, 2, 0, 2, 3][i % 6];
                let (u, v) = CORNER_UVS[corner];
                submesh.vertices()[index as usize]
                    .with_color(CORNER_COLORS[corner])
                    .with_uv(Vec2::new(u, v))
            })
            .collect();
        mesh.append_submesh(SubMesh::triangles(vertices, Rc::clone(&material))?);
    }
    Ok(mesh)
}

fn run() -> Result<()> {
    let config = RendererConfig::default()
        .with_size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .with_clear_color(Color3::new(24, 24, 32));
    let lights = SceneConfig::default().build_lights()?;
    let mut engine = Engine::new(&config, lights)?;

    let mut window = Window::new("softrend", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let mut limiter = FrameLimiter::new(&window);

    let texture = Rc::new(checker_texture()?);
    let mut mode_index = 0;
    let mut transform = Transform::new();
    transform.set_position_xyz(0.0, 0.0, 60.0).set_scale_uniform(12.0);
    let mut instances = vec![MeshInstance::new(
        demo_cube(material_for(SHADE_MODES[mode_index], &texture))?,
        transform,
    )];

    let badge = GuiObject::new(Rc::new(Texture::solid(12, 12, Color3::WHITE)?), 8, 8);

    info!("press space to cycle shade modes, escape to quit");
    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => engine.resize(w, h)?,
            WindowEvent::KeyDown(Keycode::Space) => {
                mode_index = (mode_index + 1) % SHADE_MODES.len();
                let mode = SHADE_MODES[mode_index];
                let material = material_for(mode, &texture);
                for submesh in instances[0].mesh.submeshes_mut() {
                    submesh.set_material(Rc::clone(&material));
                }
                info!("shade mode: {}", mode);
            }
            _ => {}
        }

        let delta = limiter.wait_and_get_delta(&window) as f32 / 1000.0;
        instances[0]
            .transform
            .rotate(Vec3::new(0.7 * delta, 1.1 * delta, 0.3 * delta));

        engine.render_frame(&mut instances, std::slice::from_ref(&badge), &mut window)?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}
