//! Marker icons for the public map pages: one icon per hot area, sitting
//! on the area's centre.

use serde::{Deserialize, Serialize};

use crate::error::AreaError;
use crate::geometry::ScreenPos;

const BUILTIN_ICONS: [&str; 5] = [
    "arrow_red",
    "arrow_yellow",
    "arrow_orange",
    "arrow_green",
    "marker",
];

/// Plugin settings, accepted as the same camelCase JSON object the page
/// passes in. Missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerConfig {
    pub animate: bool,
    /// Skip areas larger than this many square pixels (0 = no limit).
    pub max_area: i64,
    /// Skip areas smaller than this many square pixels (0 = no limit).
    pub min_area: i64,
    /// Only mark maps of this level (`library`, `collection`, `shelf`).
    pub level: String,
    /// Name of a built-in icon; overrides `icon_path` when recognised.
    pub icon: String,
    pub icon_path: String,
    pub icon_width: f64,
    pub icon_height: f64,
    /// Pause between fade in and fade out, in milliseconds.
    pub delay: u32,
    pub leave_icon_visible: bool,
    pub repeat_count: u32,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            animate: true,
            max_area: 0,
            min_area: 0,
            level: String::new(),
            icon: String::new(),
            icon_path: "icons/marker.png".to_string(),
            icon_width: 32.0,
            icon_height: 32.0,
            delay: 200,
            leave_icon_visible: false,
            repeat_count: 2,
        }
    }
}

impl MarkerConfig {
    pub fn from_json(text: &str) -> Result<Self, AreaError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    pub fn icon_src(&self) -> String {
        if BUILTIN_ICONS.contains(&self.icon.as_str()) {
            format!("icons/{}.png", self.icon)
        } else {
            self.icon_path.clone()
        }
    }

    pub fn applies_to(&self, level: &str) -> bool {
        self.level.is_empty() || self.level == level
    }
}

/// One opacity change of the marker animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlashStep {
    /// Milliseconds after the markers are placed.
    pub at_ms: i32,
    pub visible: bool,
}

/// Upper bound on flashes, whatever the page asks for.
const MAX_FLASHES: u32 = 100;

impl MarkerConfig {
    /// Timer steps for flashing the markers `repeat_count` times with fades
    /// of `fade_ms`. Times saturate at `i32::MAX`, the largest delay a
    /// browser timer takes.
    pub fn flash_schedule(&self, fade_ms: u32) -> Vec<FlashStep> {
        if !self.animate {
            return vec![FlashStep { at_ms: 0, visible: true }];
        }
        let at = |ms: u64| FlashStep {
            at_ms: i32::try_from(ms).unwrap_or(i32::MAX),
            visible: true,
        };
        let fade = u64::from(fade_ms);
        let delay = u64::from(self.delay);
        let cycle = fade * 2 + delay;
        let repeats = self.repeat_count.min(MAX_FLASHES);
        let mut steps = Vec::with_capacity(repeats as usize * 2 + 1);
        for i in 0..u64::from(repeats) {
            steps.push(at(i * cycle));
            steps.push(FlashStep {
                visible: false,
                ..at(i * cycle + fade + delay)
            });
        }
        if self.leave_icon_visible {
            steps.push(at(u64::from(repeats) * cycle));
        }
        steps
    }
}

/// Rectangle from an `<area shape="rect" coords="x1,y1,x2,y2">`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarkerRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl MarkerRect {
    pub fn size(&self) -> i64 {
        (i64::from(self.x2) - i64::from(self.x1)) * (i64::from(self.y2) - i64::from(self.y1))
    }

    fn center(&self) -> (f64, f64) {
        let (x1, y1) = (f64::from(self.x1), f64::from(self.y1));
        (
            (f64::from(self.x2) - x1) / 2.0 + x1,
            (f64::from(self.y2) - y1) / 2.0 + y1,
        )
    }
}

pub fn parse_coords(coords: &str) -> Result<MarkerRect, AreaError> {
    let invalid = || AreaError::InvalidCoords {
        coords: coords.to_string(),
    };
    let nums = coords
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid())?;
    match nums.as_slice() {
        [x1, y1, x2, y2] => Ok(MarkerRect {
            x1: *x1,
            y1: *y1,
            x2: *x2,
            y2: *y2,
        }),
        _ => Err(invalid()),
    }
}

/// Icon position for an area, or `None` when the size filters reject it.
pub fn marker_placement(rect: &MarkerRect, config: &MarkerConfig) -> Option<ScreenPos> {
    let size = rect.size();
    if config.max_area > 0 && size > config.max_area {
        return None;
    }
    if config.min_area > 0 && size < config.min_area {
        return None;
    }
    let (cx, cy) = rect.center();
    Some(ScreenPos {
        left: cx - config.icon_width / 2.0,
        top: cy - config.icon_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_sits_on_the_centre() {
        let rect = parse_coords("10,20,50,60").unwrap();
        let pos = marker_placement(&rect, &MarkerConfig::default()).unwrap();
        assert_eq!(pos, ScreenPos::new(14.0, 8.0));
    }

    #[test]
    fn size_filters_skip_areas() {
        let rect = parse_coords("0,0,10,10").unwrap();
        let big_only = MarkerConfig {
            min_area: 101,
            ..Default::default()
        };
        assert!(marker_placement(&rect, &big_only).is_none());
        let small_only = MarkerConfig {
            max_area: 99,
            ..Default::default()
        };
        assert!(marker_placement(&rect, &small_only).is_none());
        let exact = MarkerConfig {
            min_area: 100,
            max_area: 100,
            ..Default::default()
        };
        assert!(marker_placement(&rect, &exact).is_some());
    }

    #[test]
    fn malformed_coords_are_rejected() {
        assert!(parse_coords("1,2,3").is_err());
        assert!(parse_coords("1,2,3,x").is_err());
        assert!(parse_coords("").is_err());
        assert_eq!(parse_coords(" 1, 2 ,3,4").unwrap().x2, 3);
    }

    #[test]
    fn settings_merge_over_defaults() {
        let cfg = MarkerConfig::from_json(r#"{"icon":"arrow_red","repeatCount":4,"level":"shelf"}"#)
            .unwrap();
        assert_eq!(cfg.icon_src(), "icons/arrow_red.png");
        assert_eq!(cfg.repeat_count, 4);
        assert_eq!(cfg.icon_width, 32.0);
        assert!(cfg.applies_to("shelf"));
        assert!(!cfg.applies_to("library"));

        let custom = MarkerConfig::from_json(r#"{"icon":"star","iconPath":"img/star.png"}"#).unwrap();
        assert_eq!(custom.icon_src(), "img/star.png");
        assert!(MarkerConfig::from_json("").unwrap().applies_to("library"));
    }

    #[test]
    fn extreme_coords_do_not_overflow() {
        let rect = parse_coords("-2147483648,0,2147483647,10").unwrap();
        assert_eq!(rect.size(), 42_949_672_950);
        let pos = marker_placement(&rect, &MarkerConfig::default()).unwrap();
        assert_eq!(pos.left, -0.5 - 16.0);
        assert_eq!(pos.top, 5.0 - 32.0);
    }

    #[test]
    fn flashes_alternate_then_settle() {
        let cfg = MarkerConfig {
            delay: 100,
            repeat_count: 2,
            leave_icon_visible: true,
            ..Default::default()
        };
        let times: Vec<(i32, bool)> = cfg
            .flash_schedule(600)
            .iter()
            .map(|s| (s.at_ms, s.visible))
            .collect();
        assert_eq!(
            times,
            vec![(0, true), (700, false), (1300, true), (2000, false), (2600, true)]
        );

        let still = MarkerConfig {
            animate: false,
            ..Default::default()
        };
        assert_eq!(still.flash_schedule(600), vec![FlashStep { at_ms: 0, visible: true }]);
    }

    #[test]
    fn huge_timings_saturate() {
        let cfg = MarkerConfig {
            delay: u32::MAX,
            repeat_count: u32::MAX,
            leave_icon_visible: true,
            ..Default::default()
        };
        let steps = cfg.flash_schedule(600);
        assert_eq!(steps.len(), 201);
        assert_eq!(steps[0].at_ms, 0);
        assert!(steps.iter().skip(1).all(|s| s.at_ms == i32::MAX));
    }
}
