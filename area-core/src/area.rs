use serde::{Deserialize, Serialize};

use crate::error::AreaError;

/// Integer pixel position relative to the map image's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Round a fractional pointer position to the nearest pixel.
    pub fn rounded(x: f64, y: f64) -> Self {
        Point {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from(v: (i32, i32)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Rotation angle exactly as typed into the angle field.
/// The text is handed to the overlay endpoint unvalidated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(String);

impl Angle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Angle {
    fn default() -> Self {
        Angle("0".to_string())
    }
}

impl From<i32> for Angle {
    fn from(v: i32) -> Self {
        Angle(v.to_string())
    }
}

impl From<&str> for Angle {
    fn from(v: &str) -> Self {
        Angle(v.to_string())
    }
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rectangular hot area on a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Area {
    /// Persisted id, 0 until the server saves the area.
    pub id: i32,
    /// Session-local key, never reused.
    pub sequence: u32,
    pub top_left: Point,
    pub bottom_right: Point,
    pub angle: Angle,
}

impl Area {
    /// Build an area from two opposite corners given in any order.
    pub fn from_corners(id: i32, sequence: u32, a: Point, b: Point, angle: Angle) -> Self {
        Area {
            id,
            sequence,
            top_left: Point {
                x: a.x.min(b.x),
                y: a.y.min(b.y),
            },
            bottom_right: Point {
                x: a.x.max(b.x),
                y: a.y.max(b.y),
            },
            angle,
        }
    }

    pub fn x1(&self) -> i32 {
        self.top_left.x
    }
    pub fn y1(&self) -> i32 {
        self.top_left.y
    }
    pub fn x2(&self) -> i32 {
        self.bottom_right.x
    }
    pub fn y2(&self) -> i32 {
        self.bottom_right.y
    }
}

/// Area as rendered into the page by the server for an existing location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArea {
    #[serde(default)]
    pub id: i32,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    #[serde(default)]
    pub angle: i32,
}

impl StoredArea {
    /// Parse the JSON array embedded in the edit page.
    pub fn parse_list(text: &str) -> Result<Vec<StoredArea>, AreaError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(text)?)
    }

    pub(crate) fn into_area(self, sequence: u32) -> Area {
        Area::from_corners(
            self.id,
            sequence,
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y2),
            Angle::from(self.angle),
        )
    }
}
