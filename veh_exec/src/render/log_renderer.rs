//! Renderer which reports the vehicle in the log, for headless runs

use log::info;

use super::{screen_position, Pose, RenderError, Renderer};

/// Logs the vehicle's pose and screen position every `every_n` frames.
pub struct LogRenderer {
    screen_size: (f64, f64),
    every_n: u64,
    num_frames: u64,
    num_logged: u64,
}

impl LogRenderer {
    pub fn new(screen_width: f64, screen_height: f64, every_n: u64) -> Self {
        Self {
            screen_size: (screen_width, screen_height),
            every_n: every_n.max(1),
            num_frames: 0,
            num_logged: 0,
        }
    }

    /// Describe the pose and where it lands on the screen.
    pub fn pose_line(&self, pose: &Pose) -> String {
        let (sx, sy) = screen_position((pose.x, pose.y), self.screen_size.0, self.screen_size.1);

        format!(
            "At ({:.3}, {:.3}) heading {:.3} deg, steering {:.1} deg, screen ({}, {})",
            pose.x, pose.y, pose.heading_deg, pose.steering_angle_deg, sx, sy
        )
    }

    pub fn num_frames(&self) -> u64 {
        self.num_frames
    }

    /// Number of frames which were written to the log.
    pub fn num_logged(&self) -> u64 {
        self.num_logged
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, pose: &Pose) -> Result<(), RenderError> {
        if self.num_frames % self.every_n == 0 {
            info!("{}", self.pose_line(pose));
            self.num_logged += 1;
        }

        self.num_frames += 1;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_every_n_throttles_output() {
        let mut r = LogRenderer::new(800.0, 450.0, 10);
        for _ in 0..25 {
            r.render(&Pose::default()).unwrap();
        }
        assert_eq!(r.num_frames(), 25);

        // Frames 0, 10 and 20
        assert_eq!(r.num_logged(), 3);
    }

    #[test]
    fn test_zero_every_n_logs_all() {
        let mut r = LogRenderer::new(800.0, 450.0, 0);
        for _ in 0..3 {
            r.render(&Pose::default()).unwrap();
        }
        assert_eq!(r.num_logged(), 3);
    }

    #[test]
    fn test_pose_line_uses_flipped_screen_position() {
        let r = LogRenderer::new(800.0, 450.0, 1);
        let pose = Pose {
            x: 50.0,
            y: 50.0,
            heading_deg: 12.5,
            steering_angle_deg: -3.0,
        };

        assert_eq!(screen_position((pose.x, pose.y), 800.0, 450.0), (750, 400));
        assert_eq!(
            r.pose_line(&pose),
            "At (50.000, 50.000) heading 12.500 deg, steering -3.0 deg, screen (750, 400)"
        );
    }
}
