//! Camera framing and focus transitions.

use log::{debug, warn};
use serde::Serialize;

use crate::config::ViewerConfig;
use crate::graph::{Node, Position};

/// Where the camera sits. Ephemeral: recomputed for every transition.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize)]
pub struct CameraPose {
	/// Camera x.
	pub x: f64,
	/// Camera y.
	pub y: f64,
	/// Camera z.
	pub z: f64,
}

impl From<Position> for CameraPose {
	fn from(p: Position) -> Self {
		Self {
			x: p.x,
			y: p.y,
			z: p.z,
		}
	}
}

/// A camera move to hand to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransition {
	/// Destination pose.
	pub pose: CameraPose,
	/// Point to face once there.
	pub look_at: Option<Position>,
	/// Animation length; zero jumps.
	pub duration_ms: u32,
}

/// Computes viewpoint transitions for home framing and node focus.
#[derive(Clone, Debug)]
pub struct CameraController {
	home_distance: f64,
	home_duration_ms: u32,
	standoff: f64,
	focus_duration_ms: u32,
}

impl Default for CameraController {
	fn default() -> Self {
		Self::new(&ViewerConfig::default())
	}
}

impl CameraController {
	/// Controller using the distances and timings from `config`.
	pub fn new(config: &ViewerConfig) -> Self {
		Self {
			home_distance: config.home_distance,
			home_duration_ms: config.home_duration_ms,
			standoff: config.focus_standoff,
			focus_duration_ms: config.focus_duration_ms,
		}
	}

	/// Place the camera `distance` units out along the view axis, facing the origin.
	pub fn frame_home(&self, distance: f64) -> CameraTransition {
		CameraTransition {
			pose: CameraPose {
				x: 0.0,
				y: 0.0,
				z: distance,
			},
			look_at: Some(Position::default()),
			duration_ms: self.home_duration_ms,
		}
	}

	/// Home framing at the configured distance.
	pub fn home(&self) -> CameraTransition {
		self.frame_home(self.home_distance)
	}

	/// Move along the ray from the origin through `node`, stopping `standoff`
	/// units beyond it, looking at the node.
	///
	/// Returns `None` when the node has no layout position yet or sits at the
	/// origin, where the ray is undefined.
	pub fn focus_on(&self, node: &Node, standoff: f64, duration_ms: u32) -> Option<CameraTransition> {
		let Some(pos) = node.position() else {
			warn!("cannot focus {:?}: no layout position yet", node.name);
			return None;
		};
		let distance = pos.norm();
		if !distance.is_finite() || distance <= f64::EPSILON {
			debug!("skipping focus on {:?}: node at origin", node.name);
			return None;
		}
		let ratio = 1.0 + standoff / distance;
		Some(CameraTransition {
			pose: pos.scale(ratio).into(),
			look_at: Some(pos),
			duration_ms,
		})
	}

	/// Focus with the configured standoff and duration.
	pub fn focus(&self, node: &Node) -> Option<CameraTransition> {
		self.focus_on(node, self.standoff, self.focus_duration_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: CameraPose, b: CameraPose) -> bool {
		(a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.z - b.z).abs() < 1e-9
	}

	#[test]
	fn home_sits_on_view_axis() {
		let camera = CameraController::default();
		let t = camera.home();
		assert_eq!(
			t.pose,
			CameraPose {
				x: 0.0,
				y: 0.0,
				z: 200.0
			}
		);
		assert_eq!(t.look_at, Some(Position::default()));
		assert_eq!(camera.frame_home(75.0).pose.z, 75.0);
	}

	#[test]
	fn focus_scales_along_ray() {
		let camera = CameraController::default();
		let node = Node::named("A", 1).with_position(30.0, 40.0, 0.0);
		let t = camera.focus_on(&node, 40.0, 3000).unwrap();

		assert!(close(
			t.pose,
			CameraPose {
				x: 54.0,
				y: 72.0,
				z: 0.0
			}
		));
		assert_eq!(t.look_at, Some(Position::new(30.0, 40.0, 0.0)));
		assert_eq!(t.duration_ms, 3000);
	}

	#[test]
	fn focus_uses_configured_defaults() {
		let config = ViewerConfig {
			focus_standoff: 10.0,
			focus_duration_ms: 500,
			..ViewerConfig::default()
		};
		let camera = CameraController::new(&config);
		let node = Node::named("A", 1).with_position(0.0, 0.0, 10.0);
		let t = camera.focus(&node).unwrap();
		assert!(close(
			t.pose,
			CameraPose {
				x: 0.0,
				y: 0.0,
				z: 20.0
			}
		));
		assert_eq!(t.duration_ms, 500);
	}

	#[test]
	fn focus_at_origin_is_a_no_op() {
		let camera = CameraController::default();
		let node = Node::named("O", 1).with_position(0.0, 0.0, 0.0);
		assert_eq!(camera.focus_on(&node, 40.0, 3000), None);
	}

	#[test]
	fn focus_without_position_is_a_no_op() {
		let camera = CameraController::default();
		assert_eq!(camera.focus(&Node::named("A", 1)), None);
	}
}
