use crate::core::color::Color;
use crate::error::Result;
use crate::io::config::RenderConfig;
use crate::pipeline::renderer::Renderer;
use crate::scene::context::RenderContext;
use log::debug;

/// Copies the fixed-function settings of `render` into the rasterizer.
pub fn configure_renderer(render: &RenderConfig, renderer: &mut Renderer) {
    renderer.rasterizer.set_shading_mode(render.shading);
    renderer.rasterizer.set_cull_mode(render.cull_mode);
    renderer.rasterizer.set_front_face(render.front_face);
}

/// Renders every object of `context` into the renderer's framebuffer.
///
/// Clears the frame, sets up camera and lights, then per object rebuilds the
/// object transform, binds its texture (or unbinds) and draws its mesh in
/// scene order.
pub fn render_scene(render: &RenderConfig, context: &RenderContext, renderer: &mut Renderer) -> Result<()> {
    renderer.clear(Color::from(render.clear_color), render.clear_depth);

    let aspect_ratio = renderer.aspect_ratio();
    context.camera.apply(&mut renderer.vertex_processor, aspect_ratio)?;
    renderer.rasterizer.set_lights(context.lights.clone());

    for (i, object) in context.scene_objects.iter().enumerate() {
        debug!("Drawing object {i} ({} triangles)", object.mesh.triangle_count());
        object.apply_transform(&mut renderer.vertex_processor);
        renderer.rasterizer.bind_texture(object.texture.clone());
        renderer.draw_mesh(&object.mesh);
    }
    renderer.rasterizer.bind_texture(None);

    Ok(())
}
