//! Time-based vertex wobble.
//!
//! The effect displaces positions and tints colors of a copy of the mesher's
//! vertex buffer. Every frame starts again from the pristine vertices, so the
//! effect never accumulates and can be switched off by restoring them.

use crate::mesher::Vertex;

/// Holds the undisturbed vertices and writes animated frames.
#[derive(Debug, Clone)]
pub struct Wobble {
    pristine: Vec<Vertex>,
}

impl Wobble {
    pub fn new(vertices: &[Vertex]) -> Self {
        Self {
            pristine: vertices.to_vec(),
        }
    }

    pub fn pristine(&self) -> &[Vertex] {
        &self.pristine
    }

    /// Write the frame at time `t` (seconds) into `out`.
    ///
    /// `out` is expected to hold as many vertices as the pristine buffer;
    /// extra vertices on either side are left untouched.
    pub fn apply(&self, t: f64, out: &mut [Vertex]) {
        for (dst, src) in out.iter_mut().zip(&self.pristine) {
            *dst = wobble_vertex(src, t);
        }
    }

    /// A freshly allocated frame at time `t`.
    pub fn frame(&self, t: f64) -> Vec<Vertex> {
        self.pristine.iter().map(|v| wobble_vertex(v, t)).collect()
    }

    /// Copy the pristine vertices back into `out`.
    pub fn reset(&self, out: &mut [Vertex]) {
        let n = out.len().min(self.pristine.len());
        out[..n].copy_from_slice(&self.pristine[..n]);
    }
}

/// Displace one vertex. The color terms read the already displaced x and y.
pub fn wobble_vertex(v: &Vertex, t: f64) -> Vertex {
    let [x0, y0, z0] = v.position.map(f64::from);
    let x = x0 + t.cos() * (z0 * 10.0).cos();
    let y = y0 + t.sin() * (x0 * 10.0).sin();

    let slow = t / 4.0;
    let [r, g, b] = v.color.map(f64::from);
    Vertex {
        position: [x as f32, y as f32, v.position[2]],
        uv: v.uv,
        color: [
            (r + slow.cos() * (x + t).cos() / 3.0) as f32,
            (g + slow.sin() * (y + t).cos() / 3.0) as f32,
            (b + slow.cos() * (z0 + t).sin() / 3.0) as f32,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Vertex> {
        vec![
            Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0], [0.5, 0.5, 0.5]),
            Vertex::new([-4.0, 0.0, 7.0], [1.0, 0.0], [1.0, 1.0, 1.0]),
        ]
    }

    #[test]
    fn test_z_and_uv_untouched() {
        let vertices = sample();
        let wobble = Wobble::new(&vertices);
        let frame = wobble.frame(1.3);
        for (a, b) in vertices.iter().zip(&frame) {
            assert_eq!(a.position[2], b.position[2]);
            assert_eq!(a.uv, b.uv);
        }
    }

    #[test]
    fn test_known_frame_at_zero() {
        // t = 0: x += cos(10 z), y unchanged, r += cos(x') / 3, g += 0, b += sin(z) / 3.
        let v = Vertex::new([1.0, 2.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]);
        let w = wobble_vertex(&v, 0.0);
        assert!((w.position[0] - 2.0).abs() < 1e-6);
        assert!((w.position[1] - 2.0).abs() < 1e-6);
        assert!((w.color[0] - (2.0f64.cos() / 3.0) as f32).abs() < 1e-6);
        assert!(w.color[1].abs() < 1e-6);
        assert!(w.color[2].abs() < 1e-6);
    }

    #[test]
    fn test_frames_do_not_accumulate() {
        let vertices = sample();
        let wobble = Wobble::new(&vertices);
        let mut buffer = vertices.clone();

        wobble.apply(0.7, &mut buffer);
        let first = buffer.clone();
        wobble.apply(0.7, &mut buffer);
        assert_eq!(buffer, first);
        assert_ne!(buffer, vertices);

        wobble.reset(&mut buffer);
        assert_eq!(buffer, vertices);
    }
}
