use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents.abs(), center + half_extents.abs())
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Entry distance of a ray starting outside the box.
    ///
    /// Rays starting inside report no hit. `direction` must be normalized.
    pub fn ray_intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inv = direction.recip();
        let t0 = (self.min - origin) * inv;
        let t1 = (self.max - origin) * inv;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();

        if t_near.is_nan() || t_near < 0.0 || t_near > t_far {
            return None;
        }
        Some(t_near)
    }

    /// Top-down planar coordinates of `point` over the box footprint, 0..1.
    pub fn planar_uv(&self, point: Vec3) -> Vec2 {
        let size = Vec2::new(self.extents().x, self.extents().z).max(Vec2::splat(f32::EPSILON));
        ((Vec2::new(point.x, point.z) - Vec2::new(self.min.x, self.min.z)) / size)
            .clamp(Vec2::ZERO, Vec2::ONE)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.abs() }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Entry distance of a ray starting outside the sphere. `direction` must be normalized.
    pub fn ray_intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let oc = origin - self.center;
        let c = oc.length_squared() - self.radius * self.radius;
        if c < 0.0 {
            return None;
        }
        let b = oc.dot(direction);
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let t = -b - discriminant.sqrt();
        (t >= 0.0).then_some(t)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }
}
