use crate::io::config::Config;
use crate::io::image::save_framebuffer;
use crate::pipeline::passes::{configure_renderer, render_scene};
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::init_scene_resources;
use log::info;
use std::time::Instant;

/// Runs a single headless render of `config` and writes the output image.
pub fn run_cli(config: &Config) -> crate::Result<()> {
    let render = &config.render;
    render.validate()?;
    info!(
        "Rendering {}x{} ({} shading, cull {:?}, front face {:?})",
        render.width, render.height, render.shading, render.cull_mode, render.front_face
    );

    let load_start = Instant::now();
    let context = init_scene_resources(config)?;
    info!("Scene loaded in {:.2?}", load_start.elapsed());

    let mut renderer = Renderer::new(render.width, render.height);
    configure_renderer(render, &mut renderer);

    let start_time = Instant::now();
    render_scene(render, &context, &mut renderer)?;
    info!("Render completed in {:.2?}", start_time.elapsed());

    info!("Saving output to '{}'...", render.output);
    save_framebuffer(&renderer.framebuffer, &render.output)?;
    info!("Done.");
    Ok(())
}
