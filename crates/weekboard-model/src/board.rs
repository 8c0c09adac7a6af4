//! Per-task annotation boards.

use serde::{Deserialize, Serialize};

use crate::{Action, CloudId, GroupId, TaskId};

/// Smallest board zoom.
pub const MIN_ZOOM: f64 = 0.4;
/// Largest board zoom.
pub const MAX_ZOOM: f64 = 2.5;
/// Zoom change per zoom in/out.
pub const ZOOM_STEP: f64 = 0.1;

/// Free-form canvas attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    #[serde(with = "lenient_f64")]
    pub zoom: f64,
    pub clouds: Vec<Cloud>,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            clouds: Vec::new(),
        }
    }
}

impl Board {
    pub fn cloud(&self, id: CloudId) -> Option<&Cloud> {
        self.clouds.iter().find(|c| c.id == id)
    }

    pub fn cloud_mut(&mut self, id: CloudId) -> Option<&mut Cloud> {
        self.clouds.iter_mut().find(|c| c.id == id)
    }

    /// Move `id` by `(dx, dy)`, together with the rest of its group.
    ///
    /// Returns the number of clouds moved.
    pub fn move_cloud(&mut self, id: CloudId, dx: f64, dy: f64) -> usize {
        let Some(group) = self.cloud(id).map(|c| c.group_id) else {
            return 0;
        };

        let mut moved = 0;
        for cloud in &mut self.clouds {
            let selected = match group {
                Some(group) => cloud.group_id == Some(group),
                None => cloud.id == id,
            };
            if selected {
                cloud.x += dx;
                cloud.y += dy;
                moved += 1;
            }
        }
        moved
    }

    /// Clamp zoom into range, resetting non-finite values.
    pub fn normalize_zoom(&mut self) {
        self.zoom = if self.zoom.is_finite() {
            self.zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    /// Whether every cloud sits at a finite position.
    pub fn positions_finite(&self) -> bool {
        self.clouds.iter().all(|c| c.x.is_finite() && c.y.is_finite())
    }

    /// Normalize zoom and move clouds with unusable coordinates back to
    /// [`Cloud::ORIGIN`].
    pub(crate) fn repair(&mut self) {
        self.normalize_zoom();
        for cloud in &mut self.clouds {
            if !cloud.x.is_finite() {
                cloud.x = Cloud::ORIGIN.0;
            }
            if !cloud.y.is_finite() {
                cloud.y = Cloud::ORIGIN.1;
            }
        }
    }
}

/// A text note placed on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cloud {
    pub id: CloudId,
    pub text: String,
    #[serde(with = "lenient_f64")]
    pub x: f64,
    #[serde(with = "lenient_f64")]
    pub y: f64,
    pub group_id: Option<GroupId>,
}

impl Default for Cloud {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Cloud {
    /// Initial position of a new cloud.
    pub const ORIGIN: (f64, f64) = (50.0, 50.0);

    pub fn new(id: CloudId) -> Self {
        Self {
            id,
            text: String::new(),
            x: Self::ORIGIN.0,
            y: Self::ORIGIN.1,
            group_id: None,
        }
    }
}

/// An in-progress pointer drag of a cloud.
///
/// The view moves the cloud visually while dragging; the state only changes
/// once, when [`CloudDrag::finish`] turns the accumulated motion into a
/// single [`Action::MoveClouds`].
#[derive(Debug, Clone, PartialEq)]
pub struct CloudDrag {
    task: TaskId,
    cloud: CloudId,
    last: (f64, f64),
    dx: f64,
    dy: f64,
}

impl CloudDrag {
    /// Start dragging at screen position `(x, y)`.
    pub fn start(task: TaskId, cloud: CloudId, x: f64, y: f64) -> Self {
        Self {
            task,
            cloud,
            last: (x, y),
            dx: 0.0,
            dy: 0.0,
        }
    }

    /// Pointer moved to screen position `(x, y)` on a board shown at `zoom`.
    ///
    /// Returns the board-space delta of this step.
    pub fn update(&mut self, x: f64, y: f64, zoom: f64) -> (f64, f64) {
        if !x.is_finite() || !y.is_finite() {
            tracing::trace!("Ignoring drag to non-finite position ({x}, {y})");
            return (0.0, 0.0);
        }
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let step = ((x - self.last.0) / zoom, (y - self.last.1) / zoom);
        self.last = (x, y);
        self.dx += step.0;
        self.dy += step.1;
        step
    }

    /// Total board-space offset so far.
    pub fn offset(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    /// End the drag. Returns `None` if the cloud never moved or the offset
    /// is not finite.
    pub fn finish(self) -> Option<Action> {
        if (self.dx == 0.0 && self.dy == 0.0) || !self.dx.is_finite() || !self.dy.is_finite() {
            return None;
        }
        Some(Action::MoveClouds {
            task: self.task,
            cloud: self.cloud,
            dx: self.dx,
            dy: self.dy,
        })
    }
}

/// Float fields that never poison a whole payload.
///
/// serde_json writes non-finite floats as `null`, and older payloads may hold
/// anything in a coordinate slot. Such values decode as NaN, which
/// [`Board::repair`] replaces with the field's default.
mod lenient_f64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Other(serde::de::IgnoredAny),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(match Lenient::deserialize(deserializer)? {
            Lenient::Number(value) => value,
            Lenient::Other(_) => f64::NAN,
        })
    }
}
