//! Draws a retained `Scene` with the disc and wire pipelines

use crate::context::{RenderContext, RenderError};
use crate::disc_pipeline::{DiscInstanceGpu, DiscPipeline};
use crate::overlay::{Overlay, OverlayFrame};
use crate::wire_pipeline::{push_box_lines, LineVertex, WirePipeline};
use ember_core::Result;
use ember_scene::{Camera, Renderer, Scene, ShaderSource, Shape};

/// Split the visible objects of `scene` into disc instances and line vertices
pub fn collect_draw_data(
    scene: &Scene,
    instances: &mut Vec<DiscInstanceGpu>,
    lines: &mut Vec<LineVertex>,
) {
    instances.clear();
    lines.clear();
    for (_, obj) in scene.objects() {
        if !obj.visible {
            continue;
        }
        match obj.shape {
            Shape::Disc => instances.push(DiscInstanceGpu::from_object(obj)),
            Shape::WireBox => push_box_lines(obj, lines),
        }
    }
}

/// wgpu implementation of the `Renderer` contract
pub struct SceneRenderer {
    context: RenderContext,
    discs: DiscPipeline,
    wires: WirePipeline,
    overlay: Overlay,
    pending_overlay: Option<OverlayFrame>,
    instances: Vec<DiscInstanceGpu>,
    lines: Vec<LineVertex>,
}

impl SceneRenderer {
    pub fn new(
        context: RenderContext,
        shader: &ShaderSource,
    ) -> std::result::Result<Self, RenderError> {
        let format = context.format();
        let discs = DiscPipeline::new(&context.device, format, shader)?;
        let wires = WirePipeline::new(&context.device, format);
        let overlay = Overlay::new(&context.device, format);

        Ok(Self {
            context,
            discs,
            wires,
            overlay,
            pending_overlay: None,
            instances: Vec::new(),
            lines: Vec::new(),
        })
    }

    /// Queue an egui frame to be painted over the next rendered frame
    pub fn set_overlay(&mut self, mut frame: OverlayFrame) {
        if let Some(older) = self.pending_overlay.take() {
            frame.absorb(older);
        }
        self.pending_overlay = Some(frame);
    }

    fn draw_frame(
        &mut self,
        scene: &Scene,
        camera: &Camera,
    ) -> std::result::Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::SurfaceError(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        collect_draw_data(scene, &mut self.instances, &mut self.lines);
        let view_proj = camera.view_projection_matrix();
        let device = &self.context.device;
        let queue = &self.context.queue;
        self.discs.prepare(device, queue, view_proj, &self.instances);
        self.wires.prepare(device, queue, view_proj, &self.lines);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        let clear = scene.clear_color();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.discs.draw(&mut pass);
            self.wires.draw(&mut pass);
        }

        if let Some(frame) = &self.pending_overlay {
            self.overlay.paint(&self.context, &mut encoder, &view, frame);
        }

        self.context
            .queue
            .submit(std::iter::once(encoder.finish()));

        if let Some(frame) = self.pending_overlay.take() {
            self.overlay.free_textures(&frame);
        }

        output.present();
        Ok(())
    }
}

impl Renderer for SceneRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.draw_frame(scene, camera)?;
        Ok(())
    }

    fn set_output_size(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
    }

    fn output_size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}
