/// First-person view-point in world space.
///
/// * Yaw only; looking up/down shears the projection (`skew`) instead of
///   rotating it.
/// * The world is screen-axis aligned: Y grows downward, so "up" is −Y.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    x: f32,
    y: f32,
    z: f32,
    angle: f32, // degrees
    angle_cos: f32,
    angle_sin: f32,
    skew: f32, // vertical look offset in projection units
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle: 0.0,
            angle_cos: 1.0,
            angle_sin: 0.0,
            skew: 0.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /*──────────────────────── accessors ─────────────────────────────*/

    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline(always)]
    pub fn z(&self) -> f32 {
        self.z
    }

    #[inline(always)]
    pub fn angle_cos(&self) -> f32 {
        self.angle_cos
    }

    #[inline(always)]
    pub fn angle_sin(&self) -> f32 {
        self.angle_sin
    }

    #[inline(always)]
    pub fn skew(&self) -> f32 {
        self.skew
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    pub fn set_rotation(&mut self, angle: f32) {
        self.angle = angle;
        self.update_angle_cos_sin();
    }

    /*──────────────────────── movement ──────────────────────────────*/

    pub fn move_forward(&mut self, amount: f32) {
        self.x -= self.angle_sin * amount;
        self.z += self.angle_cos * amount;
    }

    pub fn move_backward(&mut self, amount: f32) {
        self.x += self.angle_sin * amount;
        self.z -= self.angle_cos * amount;
    }

    pub fn move_left(&mut self, amount: f32) {
        self.x -= self.angle_cos * amount;
        self.z -= self.angle_sin * amount;
    }

    pub fn move_right(&mut self, amount: f32) {
        self.x += self.angle_cos * amount;
        self.z += self.angle_sin * amount;
    }

    pub fn move_up(&mut self, amount: f32) {
        self.y -= amount;
    }

    pub fn move_down(&mut self, amount: f32) {
        self.y += amount;
    }

    pub fn turn_left(&mut self, amount: f32) {
        self.angle += amount;
        self.update_angle_cos_sin();
    }

    pub fn turn_right(&mut self, amount: f32) {
        self.angle -= amount;
        self.update_angle_cos_sin();
    }

    pub fn look_up(&mut self, amount: f32) {
        self.skew -= amount;
    }

    pub fn look_down(&mut self, amount: f32) {
        self.skew += amount;
    }

    fn update_angle_cos_sin(&mut self) {
        let radians = self.angle.to_radians();
        self.angle_cos = radians.cos();
        self.angle_sin = radians.sin();
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_updates_cos_sin() {
        let mut cam = Camera::new();
        cam.set_rotation(90.0);
        assert!(cam.angle_cos().abs() < 1e-6);
        assert!((cam.angle_sin() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn forward_at_zero_yaw_increases_z() {
        let mut cam = Camera::new();
        cam.move_forward(5.0);
        assert_eq!((cam.x(), cam.z()), (0.0, 5.0));
        cam.move_backward(5.0);
        assert_eq!((cam.x(), cam.z()), (0.0, 0.0));
    }

    #[test]
    fn strafe_is_perpendicular_to_forward() {
        let mut cam = Camera::new();
        cam.set_rotation(37.0);
        cam.move_forward(1.0);
        let (fx, fz) = (cam.x(), cam.z());
        cam.set_position(0.0, 0.0, 0.0);
        cam.move_right(1.0);
        // displacement vectors are orthogonal
        assert!((fx * cam.x() + fz * cam.z()).abs() < 1e-6);
    }

    #[test]
    fn vertical_axis_is_screen_down() {
        let mut cam = Camera::new();
        cam.move_up(3.0);
        assert_eq!(cam.y(), -3.0);
        cam.move_down(4.0);
        assert_eq!(cam.y(), 1.0);
    }

    #[test]
    fn look_adjusts_skew_only() {
        let mut cam = Camera::new();
        cam.look_down(0.25);
        assert_eq!(cam.skew(), 0.25);
        cam.look_up(0.5);
        assert_eq!(cam.skew(), -0.25);
        assert_eq!((cam.x(), cam.y(), cam.z()), (0.0, 0.0, 0.0));
    }
}
