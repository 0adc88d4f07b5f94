//! Per-frame orchestration: acquire, record, submit, present.
//!
//! One frame in flight at a time on the submission side; the device may
//! execute asynchronously. Each frame ticks the submission clock, rewrites
//! the shared frame color, records the full grid into a single clear pass,
//! submits, registers an execution-clock callback, and presents.

use crate::error::QuadStressError;
use crate::gpu::render_context::RenderContext;
use crate::options::Options;
use crate::renderer::quad_grid::QuadGridRenderer;
use crate::util::frame_clock::FrameClock;

/// Background behind the grid.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

/// Owns the GPU context, the grid renderer, and the dual frame clock.
pub struct StressEngine {
    context: RenderContext,
    renderer: QuadGridRenderer,
    clock: FrameClock,
}

impl StressEngine {
    /// Initialize the GPU context and build the instance grid from
    /// `options`.
    ///
    /// # Errors
    ///
    /// Returns [`QuadStressError::Gpu`] if device or surface setup fails,
    /// or [`QuadStressError::Layout`] if the grid cannot satisfy the
    /// device's dynamic-offset constraints. Both are fatal to startup.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
        options: &Options,
    ) -> Result<Self, QuadStressError> {
        let context =
            RenderContext::new(window, initial_size, options.window.vsync)
                .await?;
        let renderer = QuadGridRenderer::new(&context, options.grid.side)?;

        log::info!(
            "stress engine ready: {} draws per frame",
            renderer.instance_count()
        );

        Ok(Self {
            context,
            renderer,
            clock: FrameClock::new(),
        })
    }

    /// Reconfigure the surface for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Number of draw calls each frame issues.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.renderer.instance_count()
    }

    /// Submit one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when no presentable target is
    /// available (lost or outdated surface, timeout). The frame is skipped
    /// without submitting partial work; the caller reconfigures and retries
    /// on the next iteration.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Pump pending completion callbacks without blocking submission.
        let _ = self.context.device.poll(wgpu::PollType::Poll);

        if let Some(report) = self.clock.tick_submission() {
            log::info!(
                "submission avg: {:.2}ms (~{} FPS)",
                report.avg_ms,
                report.fps
            );
        }

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Hue follows the submission frame counter, so the color sequence
        // is reproducible run-to-run regardless of wall time.
        self.renderer.update_color(
            &self.context.queue,
            self.clock.submission_frames(),
        );

        let mut encoder = self.context.create_encoder();
        {
            let mut render_pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("quad grid pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            self.renderer.draw(&mut render_pass);
        }

        self.context.submit(encoder);

        // Tick the execution timeline when the device finishes this frame's
        // work. The callback may fire on a driver thread; the timeline sits
        // behind a mutex for exactly that reason.
        let execution = self.clock.execution_handle();
        self.context.queue.on_submitted_work_done(move || {
            if let Ok(mut timeline) = execution.lock() {
                if let Some(report) = timeline.tick() {
                    log::info!(
                        "execution avg: {:.2}ms (~{} FPS)",
                        report.avg_ms,
                        report.fps
                    );
                }
            }
        });

        frame.present();
        Ok(())
    }
}
