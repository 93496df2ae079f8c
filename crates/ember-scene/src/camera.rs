//! Perspective camera with a cached projection matrix

use ember_core::{mat4_mul, Vec3};

/// A 3D perspective camera looking at a fixed target
pub struct Camera {
    /// Camera position
    pub position: Vec3,
    /// Target point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,

    projection: [[f32; 4]; 4],
    projection_dirty: bool,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 8.0),
            target: Vec3::ZERO,
            up: Vec3::UP,
            fov: 45.0,
            near: 0.5,
            far: 2000.0,
            aspect: 1.0,
            projection: [[0.0; 4]; 4],
            projection_dirty: true,
        };
        camera.recompute_projection();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the aspect ratio. The projection is recomputed lazily by
    /// `recompute_projection`.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect != self.aspect {
            self.aspect = aspect;
            self.projection_dirty = true;
        }
    }

    /// Flag the cached projection as stale
    pub fn mark_projection_dirty(&mut self) {
        self.projection_dirty = true;
    }

    pub fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Rebuild the cached projection from fov/aspect/near/far
    pub fn recompute_projection(&mut self) {
        self.projection = self.perspective_matrix();
        self.projection_dirty = false;
    }

    /// Get the projection matrix (4x4, column-major).
    ///
    /// Returns the cached matrix; call `recompute_projection` after changing
    /// the lens parameters.
    pub fn projection_matrix(&self) -> [[f32; 4]; 4] {
        self.projection
    }

    /// Get the view matrix (4x4, column-major)
    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        let f = (self.target - self.position).normalized();
        let s = f.cross(&self.up).normalized();
        let u = s.cross(&f);

        [
            [s.x, u.x, -f.x, 0.0],
            [s.y, u.y, -f.y, 0.0],
            [s.z, u.z, -f.z, 0.0],
            [
                -s.dot(&self.position),
                -u.dot(&self.position),
                f.dot(&self.position),
                1.0,
            ],
        ]
    }

    // Maps view depth to [0, 1] (wgpu convention): z_view=-near → 0, z_view=-far → 1
    fn perspective_matrix(&self) -> [[f32; 4]; 4] {
        let fov_rad = self.fov.to_radians();
        let f = 1.0 / (fov_rad / 2.0).tan();
        let range = self.near - self.far;

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, self.far / range, -1.0],
            [0.0, 0.0, self.near * self.far / range, 0.0],
        ]
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> [[f32; 4]; 4] {
        let view = self.view_matrix();
        mat4_mul(&self.projection, &view)
    }
}
