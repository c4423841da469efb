use glam::Vec3;

/// Baked irradiance at a point, as L2 spherical harmonics per color channel.
#[derive(Debug, Clone, PartialEq)]
pub struct LightProbe {
    pub position: Vec3,
    pub sh_coefficients: [Vec3; 9],
    /// Influence radius used when blending probes
    pub radius: f32,
}

impl LightProbe {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            sh_coefficients: [Vec3::ZERO; 9],
            radius: 10.0,
        }
    }

    /// Probe carrying only an ambient (L0) term.
    pub fn ambient(position: Vec3, rgb: Vec3, radius: f32) -> Self {
        let mut probe = Self::new(position);
        probe.sh_coefficients[0] = rgb;
        probe.radius = radius;
        probe
    }

    /// The L0 band. Directional bands are not used for detection.
    pub fn dc(&self) -> Vec3 {
        self.sh_coefficients[0]
    }
}

pub struct LightProbeVolume {
    pub probes: Vec<LightProbe>,
}

impl LightProbeVolume {
    pub fn new(probes: Vec<LightProbe>) -> Self {
        Self { probes }
    }

    /// Regular grid of empty probes covering `bounds_min..bounds_max`.
    pub fn grid(bounds_min: Vec3, bounds_max: Vec3, spacing: Vec3) -> Self {
        let spacing = spacing.max(Vec3::splat(0.01));
        let radius = spacing.max_element() * 1.5;
        let mut probes = Vec::new();

        let mut pos = bounds_min;
        while pos.x <= bounds_max.x {
            pos.y = bounds_min.y;
            while pos.y <= bounds_max.y {
                pos.z = bounds_min.z;
                while pos.z <= bounds_max.z {
                    let mut probe = LightProbe::new(pos);
                    probe.radius = radius;
                    probes.push(probe);
                    pos.z += spacing.z;
                }
                pos.y += spacing.y;
            }
            pos.x += spacing.x;
        }

        Self { probes }
    }

    /// Fill every probe's L0 term from a function of its position.
    pub fn bake_ambient(&mut self, mut irradiance: impl FnMut(Vec3) -> Vec3) {
        for probe in &mut self.probes {
            probe.sh_coefficients[0] = irradiance(probe.position);
        }
    }

    /// Distance-weighted L0 term at `position`; zero outside every probe's radius.
    pub fn sample_dc(&self, position: Vec3) -> Vec3 {
        let mut result = Vec3::ZERO;
        let mut weight_sum = 0.0;

        for probe in &self.probes {
            let dist = (probe.position - position).length();
            if dist < probe.radius {
                let weight = 1.0 - (dist / probe.radius);
                result += probe.dc() * weight;
                weight_sum += weight;
            }
        }

        if weight_sum > 0.0 {
            result / weight_sum
        } else {
            Vec3::ZERO
        }
    }
}
