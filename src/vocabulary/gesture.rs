//! Classification of a finished drag into a swipe direction

use serde::{Deserialize, Serialize};

use super::models::SwipeDirection;

/// Commit thresholds. A drag commits when either its displacement or its
/// velocity along the dominant axis passes the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureThresholds {
    /// Minimum displacement, in points
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,
    /// Minimum velocity, in points per second
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
}

fn default_distance_threshold() -> f64 {
    100.0
}

fn default_velocity_threshold() -> f64 {
    500.0
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            velocity_threshold: default_velocity_threshold(),
        }
    }
}

/// Finished drag as reported by the presentation layer.
/// Screen coordinates: positive y points down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    pub translation_x: f64,
    pub translation_y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
}

/// Classify a drag. `None` means the card springs back to center.
///
/// The axis with the larger displacement decides. Downward drags never
/// commit.
pub fn classify_gesture(gesture: &DragGesture, thresholds: &GestureThresholds) -> Option<SwipeDirection> {
    let distance = thresholds.distance_threshold;
    let velocity = thresholds.velocity_threshold;

    if gesture.translation_x.abs() > gesture.translation_y.abs() {
        if gesture.translation_x > distance || gesture.velocity_x > velocity {
            Some(SwipeDirection::Right)
        } else if gesture.translation_x < -distance || gesture.velocity_x < -velocity {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    } else if gesture.translation_y < -distance || gesture.velocity_y < -velocity {
        Some(SwipeDirection::Up)
    } else {
        None
    }
}
