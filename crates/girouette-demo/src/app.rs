//! The rotating textured quad: one-time resource setup, the per-frame
//! transform/draw pipeline, and deterministic teardown.

use anyhow::Result;

use girouette_engine::core::{App, AppControl, FrameCtx};
use girouette_engine::math::{Point3, Vec3};
use girouette_engine::render::{
    QuadMesh, RenderCtx, SamplerParams, Texture2d, TexturedProgram, MODEL_MATRIX,
    PROJECTION_MATRIX, VIEW_MATRIX,
};
use girouette_engine::transform::MatrixRegistry;

/// Per-frame rotation increment in degrees: a quarter turn every 60 frames
/// at the nominal rate. The increment is per invocation, not per elapsed
/// second, so the effective speed follows the achieved refresh rate.
pub const TURN_STEP_DEG: f32 = 0.25 * (1.0 / 60.0) * 360.0;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// 2x2 RGBA8 checker: white/black on the first row, black/white on the
/// second, so the two white texels sit in opposing corners.
fn checker_rgba() -> [u8; 16] {
    let mut pixels = [0u8; 16];
    for (i, texel) in [WHITE, BLACK, BLACK, WHITE].iter().enumerate() {
        pixels[i * 4..i * 4 + 4].copy_from_slice(texel);
    }
    pixels
}

/// Rotation angle persisted across frames, wrapped modulo 360.
#[derive(Debug, Clone)]
pub struct Spin {
    angle_deg: f32,
}

impl Spin {
    pub fn new(start_deg: f32) -> Self {
        Self {
            angle_deg: start_deg.rem_euclid(360.0),
        }
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    pub fn advance(&mut self) {
        self.angle_deg = (self.angle_deg + TURN_STEP_DEG) % 360.0;
    }
}

/// GPU-side resources owned for the whole run.
struct SceneResources {
    registry: MatrixRegistry,
    quad: QuadMesh,
    texture: Option<Texture2d>,
    program: TexturedProgram,
}

/// Lifecycle controller + frame renderer for the demo.
///
/// Setup runs exactly once before the first frame, frames are strictly
/// sequential, and `Drop` tears everything down exactly once on any exit
/// path.
pub struct SpinningQuad {
    scene: Option<SceneResources>,
    spin: Spin,
}

impl SpinningQuad {
    pub fn new() -> Self {
        Self {
            scene: None,
            spin: Spin::new(0.0),
        }
    }

    /// Releases GPU resources. Idempotent: a second call is a no-op, and an
    /// already-released texture is skipped rather than deleted twice.
    pub fn teardown(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        if let Some(texture) = scene.texture.take() {
            drop(texture);
            log::debug!("checker texture released");
        }
        scene.registry.clear();
        // Program and quad buffers drop with `scene`.
        log::info!("render resources released");
    }
}

impl Default for SpinningQuad {
    fn default() -> Self {
        Self::new()
    }
}

impl App for SpinningQuad {
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let quad = QuadMesh::generate(ctx.device);

        let checker = checker_rgba();
        let texture = Texture2d::from_rgba8(
            ctx.device,
            ctx.queue,
            &checker,
            2,
            2,
            SamplerParams::nearest_repeat(),
        )?;

        let mut program = TexturedProgram::new(ctx);
        program.bind_texture(ctx.device, &texture);

        let mut registry = MatrixRegistry::new();
        registry.create(PROJECTION_MATRIX);
        registry.create(MODEL_MATRIX);
        registry.create(VIEW_MATRIX);

        // Projection is computed once and stays fixed for the whole run.
        registry.bind(PROJECTION_MATRIX);
        registry.load_identity();
        registry.frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0);

        log::info!(
            "scene ready: {}x{} viewport, starting angle {:.1} deg",
            ctx.viewport.width,
            ctx.viewport.height,
            self.spin.angle_deg()
        );

        self.scene = Some(SceneResources {
            registry,
            quad,
            texture: Some(texture),
            program,
        });
        Ok(())
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };
        let spin = &mut self.spin;
        let time = ctx.time;

        let control = ctx.render(CLEAR_COLOR, |rctx, target| {
            compose_frame_matrices(&mut scene.registry, spin.angle_deg());
            spin.advance();

            scene
                .program
                .upload_matrices(rctx.queue, &scene.registry, true);

            let mut rpass = target.begin_pass("girouette quad pass");
            if scene.program.bind(&mut rpass, rctx.viewport) {
                scene.quad.draw(&mut rpass);
            }
            // Ending the pass deactivates the program for whatever follows.
        });

        if time.frame_index > 0 && time.frame_index % 600 == 0 {
            log::debug!(
                "frame {}: {:.1} ms/frame, angle {:.1} deg",
                time.frame_index,
                time.dt * 1000.0,
                spin.angle_deg()
            );
        }

        control
    }
}

impl Drop for SpinningQuad {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Rebuilds the view and model matrices for one frame.
///
/// The camera sits at (0, 0, 3) looking at the origin with +Y up; the model
/// is the quad rotated `angle_deg` degrees about the Y axis.
fn compose_frame_matrices(registry: &mut MatrixRegistry, angle_deg: f32) {
    registry.bind(VIEW_MATRIX);
    registry.load_identity();
    registry.look_at(Point3::new(0.0, 0.0, 3.0), Point3::origin(), Vec3::y());

    registry.bind(MODEL_MATRIX);
    registry.load_identity();
    registry.rotate_deg(angle_deg, Vec3::y());
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use girouette_engine::math::{self, Mat4};

    const EPSILON: f32 = 1e-3;

    // ── animation state ───────────────────────────────────────────────────

    #[test]
    fn step_is_quarter_turn_per_sixty_frames() {
        assert_relative_eq!(TURN_STEP_DEG, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn angle_accumulates_per_frame() {
        let mut spin = Spin::new(0.0);
        for n in 1..=1000u32 {
            spin.advance();
            let expected = (n as f32 * TURN_STEP_DEG) % 360.0;
            assert_relative_eq!(spin.angle_deg(), expected, epsilon = EPSILON);
        }
    }

    #[test]
    fn full_turn_after_240_frames() {
        // 4 seconds at the nominal 60 fps: back to the start orientation.
        let mut spin = Spin::new(0.0);
        for _ in 0..240 {
            spin.advance();
        }
        assert_relative_eq!(spin.angle_deg(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn starting_angle_is_wrapped() {
        assert_relative_eq!(Spin::new(450.0).angle_deg(), 90.0, epsilon = EPSILON);
        assert_relative_eq!(Spin::new(-90.0).angle_deg(), 270.0, epsilon = EPSILON);
    }

    // ── per-frame matrix rebuild ──────────────────────────────────────────

    fn registry() -> MatrixRegistry {
        let mut reg = MatrixRegistry::new();
        reg.create(PROJECTION_MATRIX);
        reg.create(MODEL_MATRIX);
        reg.create(VIEW_MATRIX);
        reg
    }

    #[test]
    fn frame_rebuild_sets_view_and_model() {
        let mut reg = registry();
        compose_frame_matrices(&mut reg, 90.0);

        let expected_view = math::look_at(
            Point3::new(0.0, 0.0, 3.0),
            Point3::origin(),
            Vec3::y(),
        );
        let expected_model = math::rotation_deg(90.0, Vec3::y());

        assert_relative_eq!(*reg.get(VIEW_MATRIX).unwrap(), expected_view, epsilon = EPSILON);
        assert_relative_eq!(*reg.get(MODEL_MATRIX).unwrap(), expected_model, epsilon = EPSILON);
    }

    #[test]
    fn frame_rebuild_leaves_projection_untouched() {
        let mut reg = registry();
        reg.bind(PROJECTION_MATRIX);
        reg.load_identity();
        reg.frustum(-1.0, 1.0, -1.0, 1.0, 2.0, 100.0);
        let projection = *reg.get(PROJECTION_MATRIX).unwrap();

        compose_frame_matrices(&mut reg, 45.0);
        compose_frame_matrices(&mut reg, 90.0);

        assert_relative_eq!(*reg.get(PROJECTION_MATRIX).unwrap(), projection, epsilon = EPSILON);
    }

    #[test]
    fn frame_rebuild_is_stateless_per_angle() {
        // Recomposing from identity each frame: no accumulation drift.
        let mut a = registry();
        let mut b = registry();

        for angle in [10.0, 350.0, 42.0] {
            compose_frame_matrices(&mut a, angle);
        }
        compose_frame_matrices(&mut b, 42.0);

        assert_relative_eq!(
            *a.get(MODEL_MATRIX).unwrap(),
            *b.get(MODEL_MATRIX).unwrap(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn zero_angle_model_is_identity() {
        let mut reg = registry();
        compose_frame_matrices(&mut reg, 0.0);
        assert_relative_eq!(*reg.get(MODEL_MATRIX).unwrap(), Mat4::identity(), epsilon = EPSILON);
    }

    // ── texture + teardown ────────────────────────────────────────────────

    #[test]
    fn checker_is_white_on_opposing_corners() {
        let pixels = checker_rgba();
        assert_eq!(&pixels[0..4], &WHITE); // (0, 0)
        assert_eq!(&pixels[4..8], &BLACK); // (1, 0)
        assert_eq!(&pixels[8..12], &BLACK); // (0, 1)
        assert_eq!(&pixels[12..16], &WHITE); // (1, 1)
    }

    #[test]
    fn teardown_without_scene_is_a_no_op() {
        let mut app = SpinningQuad::new();
        app.teardown();
        app.teardown();
        // Drop runs teardown a third time; still fine.
    }
}
