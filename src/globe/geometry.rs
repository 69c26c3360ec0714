use glam::DVec3;

/// Convert latitude/longitude (degrees) to a point on a sphere of `radius`.
///
/// phi is the colatitude measured from the north pole, theta the longitude.
/// The polar axis is +y; lon 0 faces the viewer along +z and lon 90 lies on
/// +x, so east reads to the right once projected.
#[inline(always)]
pub fn to_cartesian(lat: f64, lon: f64, radius: f64) -> DVec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = lon.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    DVec3::new(
        radius * sin_phi * sin_theta,
        radius * cos_phi,
        radius * sin_phi * cos_theta,
    )
}

/// Inverse of [`to_cartesian`]: recover (lat, lon) in degrees.
#[inline]
pub fn to_spherical(p: DVec3) -> (f64, f64) {
    let r = p.length();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let lat = (p.y / r).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = p.x.atan2(p.z).to_degrees();
    (lat, lon)
}

/// Rotate about X, then Y, then Z.
///
/// The order is fixed: X carries the tilt and vertical drag, Y the spin and
/// horizontal drag, Z an optional roll. The rotations do not commute.
#[inline(always)]
pub fn rotate(p: DVec3, rot_x: f64, rot_y: f64, rot_z: f64) -> DVec3 {
    let (sin_x, cos_x) = rot_x.sin_cos();
    let y1 = p.y * cos_x - p.z * sin_x;
    let z1 = p.y * sin_x + p.z * cos_x;

    let (sin_y, cos_y) = rot_y.sin_cos();
    let x2 = p.x * cos_y + z1 * sin_y;
    let z2 = -p.x * sin_y + z1 * cos_y;

    let (sin_z, cos_z) = rot_z.sin_cos();
    let x3 = x2 * cos_z - y1 * sin_z;
    let y3 = x2 * sin_z + y1 * cos_z;

    DVec3::new(x3, y3, z2)
}

/// Orthographic projection of a rotated unit-sphere point onto the surface.
/// Screen y grows downward, so the y axis is flipped.
#[inline(always)]
pub fn project(rotated: DVec3, sphere_radius: f64, center: (f64, f64)) -> (f64, f64) {
    (
        rotated.x * sphere_radius + center.0,
        -rotated.y * sphere_radius + center.1,
    )
}
