//! Camera pose and orientation report
//!
//! The default pose looks at the burning ridge from the south-east and
//! above, framing the whole plume. [`Camera::orbit_bounds`] frames any grid
//! instead: fit its bounds, then swing around and up.

use std::fmt;

use nalgebra::{Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::backend::Bounds;

/// Vertical field of view used when fitting bounds (degrees)
pub const VIEW_ANGLE_DEG: f64 = 30.0;

/// Horizontal swing of the orbit preset (degrees)
pub const ORBIT_AZIMUTH_DEG: f64 = 30.0;

/// Upward swing of the orbit preset (degrees)
pub const ORBIT_ELEVATION_DEG: f64 = 20.0;

/// Position, focal point and view-up of a perspective camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vector3<f64>,
    pub focal_point: Vector3<f64>,
    pub view_up: Vector3<f64>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::new(1166.9393086976156, -2348.8726187497973, 2780.6186615624197),
            focal_point: Vector3::new(101.0, -1.0, 449.6810739215296),
            view_up: Vector3::new(-0.26897888898416095, 0.6143246476336248, 0.741792143791419),
        }
    }
}

impl Camera {
    /// Look down -z with +y up from far enough away that the bounding
    /// sphere of `bounds` fills the view angle
    #[must_use]
    pub fn fit_bounds(bounds: &Bounds) -> Self {
        let center = (bounds.min + bounds.max) * 0.5;
        let mut radius = (bounds.max - bounds.min).norm() * 0.5;
        if radius <= 0.0 || !radius.is_finite() {
            radius = 1.0;
        }
        let distance = radius / (VIEW_ANGLE_DEG.to_radians() * 0.5).sin();
        Self {
            position: center + Vector3::z() * distance,
            focal_point: center,
            view_up: Vector3::y(),
        }
    }

    /// [`fit_bounds`](Self::fit_bounds), then [`ORBIT_AZIMUTH_DEG`] of
    /// azimuth and [`ORBIT_ELEVATION_DEG`] of elevation
    #[must_use]
    pub fn orbit_bounds(bounds: &Bounds) -> Self {
        let mut camera = Self::fit_bounds(bounds);
        camera.azimuth(ORBIT_AZIMUTH_DEG);
        camera.elevation(ORBIT_ELEVATION_DEG);
        camera
    }

    /// Rotate the position about the view-up axis through the focal point
    pub fn azimuth(&mut self, degrees: f64) {
        if let Some(axis) = Unit::try_new(self.view_up, 1e-12) {
            self.orbit(axis, degrees);
        }
    }

    /// Rotate the position toward view-up about the camera's horizontal
    /// axis through the focal point. View-up is left as it was.
    pub fn elevation(&mut self, degrees: f64) {
        let direction = self.focal_point - self.position;
        // Negated right vector, so positive angles raise the camera
        let axis = -direction.cross(&self.view_up);
        if let Some(axis) = Unit::try_new(axis, 1e-12) {
            self.orbit(axis, degrees);
        }
    }

    fn orbit(&mut self, axis: Unit<Vector3<f64>>, degrees: f64) {
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians());
        self.position = self.focal_point + rotation * (self.position - self.focal_point);
    }

    /// Distance, azimuth and elevation of the camera relative to its
    /// focal point
    #[must_use]
    pub fn report(&self) -> CameraReport {
        let d = self.position - self.focal_point;
        let horizontal = d.x.hypot(d.y);
        CameraReport {
            camera: *self,
            distance: d.norm(),
            // Angle in the XY plane from +X toward +Y
            azimuth_deg: d.y.atan2(d.x).to_degrees(),
            // Angle above the XY plane
            elevation_deg: d.z.atan2(horizontal).to_degrees(),
        }
    }
}

/// Derived camera orientation, printed on request while exploring a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraReport {
    pub camera: Camera,
    pub distance: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

impl fmt::Display for CameraReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.camera.position;
        let fp = self.camera.focal_point;
        let up = self.camera.view_up;
        writeln!(f, "Camera parameters:")?;
        writeln!(f, "  Position: ({}, {}, {})", p.x, p.y, p.z)?;
        writeln!(f, "  FocalPoint: ({}, {}, {})", fp.x, fp.y, fp.z)?;
        writeln!(f, "  ViewUp: ({}, {}, {})", up.x, up.y, up.z)?;
        writeln!(f, "  Distance: {:.3}", self.distance)?;
        writeln!(f, "  Azimuth (deg): {:.3}", self.azimuth_deg)?;
        write!(f, "  Elevation (deg): {:.3}", self.elevation_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_report() {
        let camera = Camera {
            position: Vector3::new(0.0, 3.0, 4.0),
            focal_point: Vector3::zeros(),
            view_up: Vector3::z(),
        };
        let report = camera.report();
        assert_relative_eq!(report.distance, 5.0);
        assert_relative_eq!(report.azimuth_deg, 90.0);
        assert_relative_eq!(report.elevation_deg, 4.0_f64.atan2(3.0).to_degrees());
    }

    #[test]
    fn test_default_pose_report() {
        let report = Camera::default().report();
        let dx: f64 = 1166.9393086976156 - 101.0;
        let dy: f64 = -2348.8726187497973 + 1.0;
        let dz: f64 = 2780.6186615624197 - 449.6810739215296;
        assert_relative_eq!(report.distance, (dx * dx + dy * dy + dz * dz).sqrt(), epsilon = 1e-9);
        // South-east of the focal point, looking down
        assert_relative_eq!(report.azimuth_deg, -65.582, epsilon = 1e-3);
        assert_relative_eq!(report.elevation_deg, 42.113, epsilon = 1e-3);

        let text = report.to_string();
        assert!(text.starts_with("Camera parameters:"));
        assert!(text.contains("Distance: "));
    }

    fn cube() -> Bounds {
        Bounds {
            min: Vector3::repeat(-1.0),
            max: Vector3::repeat(1.0),
        }
    }

    #[test]
    fn test_fit_bounds_looks_down_z() {
        let camera = Camera::fit_bounds(&cube());
        let distance = 3.0_f64.sqrt() / 15.0_f64.to_radians().sin();
        assert_eq!(camera.focal_point, Vector3::zeros());
        assert_relative_eq!(camera.position.z, distance, epsilon = 1e-12);
        assert_eq!(camera.view_up, Vector3::y());
    }

    #[test]
    fn test_orbit_swings_around_then_up() {
        let camera = Camera::orbit_bounds(&cube());
        let d = 3.0_f64.sqrt() / 15.0_f64.to_radians().sin();
        let (az, el) = (30.0_f64.to_radians(), 20.0_f64.to_radians());
        assert_relative_eq!(camera.position.x, d * az.sin() * el.cos(), epsilon = 1e-9);
        assert_relative_eq!(camera.position.y, d * el.sin(), epsilon = 1e-9);
        assert_relative_eq!(camera.position.z, d * az.cos() * el.cos(), epsilon = 1e-9);
        assert_relative_eq!(camera.report().distance, d, epsilon = 1e-9);
        assert_eq!(camera.view_up, Vector3::y());
    }

    #[test]
    fn test_degenerate_bounds_use_unit_radius() {
        let point = Bounds {
            min: Vector3::new(5.0, 5.0, 5.0),
            max: Vector3::new(5.0, 5.0, 5.0),
        };
        let camera = Camera::fit_bounds(&point);
        assert_relative_eq!(camera.report().distance, 1.0 / 15.0_f64.to_radians().sin(), epsilon = 1e-12);
    }
}
