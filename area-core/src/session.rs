use crate::area::{Angle, Area, Point, StoredArea};
use crate::collection::AreaCollection;
use crate::config::EditorConfig;
use crate::form::{FormField, form_fields};
use crate::geometry::{ImageBounds, ScreenPos, arrow_position, pin_position};
use crate::overlay::{build_overlay_url, initial_overlay_url};

/// Map chosen in the map selector; `-1` is the "no map" entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapSelection {
    #[default]
    None,
    Map(i64),
}

impl MapSelection {
    /// Read a selector value. Anything that is not a map id counts as no map.
    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i64>() {
            Ok(-1) | Err(_) => MapSelection::None,
            Ok(id) => MapSelection::Map(id),
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            MapSelection::None => None,
            MapSelection::Map(id) => Some(*id),
        }
    }
}

/// What the page should show right after a map switch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapView {
    /// Image to load into the editor, if the map has one to configure.
    pub overlay_url: Option<String>,
    /// Whether the "configure areas" button is visible.
    pub show_configure: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ClickPhase {
    #[default]
    AwaitingFirst,
    AwaitingSecond(Point),
}

/// Result of a click on the map.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Off the image, or no map selected.
    Ignored,
    /// First corner recorded; drop the pin at `pin`.
    CornerPlaced { corner: Point, pin: ScreenPos },
    /// Second corner closed a new area; remove the pin and load `overlay_url`.
    AreaCreated { sequence: u32, overlay_url: String },
}

/// State of the area editor for the page's lifetime.
#[derive(Clone, Debug)]
pub struct EditorSession {
    config: EditorConfig,
    map: MapSelection,
    areas: AreaCollection,
    next_sequence: u32,
    phase: ClickPhase,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        EditorSession {
            config,
            map: MapSelection::None,
            areas: AreaCollection::new(),
            next_sequence: 1,
            phase: ClickPhase::AwaitingFirst,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn map(&self) -> MapSelection {
        self.map
    }

    pub fn areas(&self) -> &AreaCollection {
        &self.areas
    }

    /// Sequence number the next area will get.
    pub fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    /// First corner of an area still waiting for its second click.
    pub fn pending_corner(&self) -> Option<Point> {
        match self.phase {
            ClickPhase::AwaitingFirst => None,
            ClickPhase::AwaitingSecond(p) => Some(p),
        }
    }

    fn reset(&mut self, map: MapSelection) {
        self.map = map;
        self.areas.clear();
        self.next_sequence = 1;
        self.phase = ClickPhase::AwaitingFirst;
    }

    /// Switch maps, discarding every area of the previous one.
    ///
    /// `already_rendered` is the per-map flag rendered by the server; a map
    /// without it gets its bare image loaded and the configure button shown.
    pub fn select_map(&mut self, map: MapSelection, already_rendered: bool) -> MapView {
        log::debug!("select map {:?} (rendered: {})", map, already_rendered);
        self.reset(map);
        match map {
            MapSelection::Map(id) if !already_rendered => MapView {
                overlay_url: Some(initial_overlay_url(&self.config.image_creator, id)),
                show_configure: true,
            },
            _ => MapView::default(),
        }
    }

    /// Populate the session with the areas saved for the location being edited.
    pub fn load_existing(&mut self, map: MapSelection, stored: Vec<StoredArea>) {
        self.reset(map);
        for s in stored {
            let area = s.into_area(self.next_sequence);
            self.next_sequence += 1;
            self.areas.push(area);
        }
        log::debug!("loaded {} existing areas for {:?}", self.areas.len(), map);
    }

    /// Live cursor position, `None` while the pointer is off the image.
    pub fn pointer_move(&self, x: f64, y: f64, bounds: ImageBounds) -> Option<Point> {
        bounds.contains(x, y).then(|| Point::rounded(x, y))
    }

    /// Feed an image-relative click into the corner pairing.
    ///
    /// `origin` is the image's position inside the pin's container.
    pub fn pointer_click(
        &mut self,
        x: f64,
        y: f64,
        bounds: ImageBounds,
        origin: ScreenPos,
    ) -> ClickOutcome {
        let Some(map_id) = self.map.id() else {
            return ClickOutcome::Ignored;
        };
        if !bounds.contains(x, y) {
            return ClickOutcome::Ignored;
        }
        let p = Point::rounded(x, y);
        match self.phase {
            ClickPhase::AwaitingFirst => {
                self.phase = ClickPhase::AwaitingSecond(p);
                ClickOutcome::CornerPlaced {
                    corner: p,
                    pin: pin_position(p, origin, self.config.pin_offset),
                }
            }
            ClickPhase::AwaitingSecond(first) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                self.areas
                    .push(Area::from_corners(0, sequence, first, p, Angle::default()));
                self.phase = ClickPhase::AwaitingFirst;
                log::debug!("area {} created from {:?} and {:?}", sequence, first, p);
                ClickOutcome::AreaCreated {
                    sequence,
                    overlay_url: build_overlay_url(&self.config.image_creator, map_id, &self.areas),
                }
            }
        }
    }

    /// Remove an area. Returns `false` when no area has that sequence number.
    pub fn delete_area(&mut self, sequence: u32) -> bool {
        let removed = self.areas.remove(sequence).is_some();
        if removed {
            log::debug!("area {} deleted", sequence);
        }
        removed
    }

    /// Replace an area's angle with the text from its angle field.
    pub fn set_area_angle(&mut self, sequence: u32, angle: &str) -> bool {
        match self.areas.get_mut(sequence) {
            Some(area) => {
                area.angle = Angle::from(angle);
                true
            }
            None => false,
        }
    }

    /// Overlay image for the current areas, `None` without a selected map.
    pub fn overlay_url(&self) -> Option<String> {
        self.map
            .id()
            .map(|id| build_overlay_url(&self.config.image_creator, id, &self.areas))
    }

    /// Hover arrow position pointing at the area's first corner.
    pub fn arrow_for(&self, sequence: u32, origin: ScreenPos) -> Option<ScreenPos> {
        self.areas
            .get(sequence)
            .map(|a| arrow_position(a.top_left, origin, self.config.arrow_offset))
    }

    pub fn form_fields(&self) -> Vec<FormField> {
        form_fields(&self.areas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: ImageBounds = ImageBounds {
        width: 300.0,
        height: 300.0,
    };

    fn session_on_map() -> EditorSession {
        let mut s = EditorSession::default();
        s.select_map(MapSelection::Map(7), true);
        s
    }

    fn click(s: &mut EditorSession, x: f64, y: f64) -> ClickOutcome {
        s.pointer_click(x, y, MAP, ScreenPos::default())
    }

    fn draw(s: &mut EditorSession, a: (f64, f64), b: (f64, f64)) -> u32 {
        click(s, a.0, a.1);
        match click(s, b.0, b.1) {
            ClickOutcome::AreaCreated { sequence, .. } => sequence,
            other => panic!("expected a new area, got {:?}", other),
        }
    }

    #[test]
    fn two_clicks_create_an_area() {
        let mut s = session_on_map();
        let first = click(&mut s, 50.0, 50.0);
        assert!(matches!(first, ClickOutcome::CornerPlaced { corner, .. } if corner == Point::new(50, 50)));
        assert_eq!(s.pending_corner(), Some(Point::new(50, 50)));

        match click(&mut s, 150.0, 120.0) {
            ClickOutcome::AreaCreated {
                sequence,
                overlay_url,
            } => {
                assert_eq!(sequence, 1);
                assert!(overlay_url.contains(
                    "used_areas=1|&x1_1=50&y1_1=50&x2_1=150&y2_1=120&angle_1=0"
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.pending_corner(), None);

        let area = s.areas().get(1).unwrap();
        assert_eq!(area.id, 0);
        assert_eq!((area.x1(), area.y1(), area.x2(), area.y2()), (50, 50, 150, 120));
        assert_eq!(area.angle.as_str(), "0");
    }

    #[test]
    fn reversed_clicks_give_the_same_area() {
        let mut forward = session_on_map();
        draw(&mut forward, (50.0, 50.0), (150.0, 120.0));
        let mut reversed = session_on_map();
        draw(&mut reversed, (150.0, 120.0), (50.0, 50.0));
        assert_eq!(forward.areas().get(1), reversed.areas().get(1));
        assert_eq!(forward.overlay_url(), reversed.overlay_url());
    }

    #[test]
    fn mixed_corners_are_normalized() {
        let mut s = session_on_map();
        draw(&mut s, (150.0, 20.0), (40.0, 90.0));
        let a = s.areas().get(1).unwrap();
        assert_eq!((a.x1(), a.y1(), a.x2(), a.y2()), (40, 20, 150, 90));
    }

    #[test]
    fn deleting_drops_only_that_area() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        draw(&mut s, (30.0, 30.0), (40.0, 40.0));
        draw(&mut s, (50.0, 50.0), (60.0, 60.0));
        let before = s.overlay_url().unwrap();

        assert!(s.delete_area(1));
        let url = s.overlay_url().unwrap();
        assert!(url.contains("used_areas=2|3|"));
        assert!(!url.contains("x1_1="));
        assert!(!url.contains("angle_1="));

        let tail = |u: &str| u[u.find("&x1_2=").unwrap()..].to_string();
        assert_eq!(tail(&before), tail(&url));
    }

    #[test]
    fn delete_leaves_sequence_numbers_unused() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        draw(&mut s, (30.0, 30.0), (40.0, 40.0));
        assert!(s.delete_area(1));
        assert!(s.delete_area(2));
        assert_eq!(draw(&mut s, (1.0, 1.0), (2.0, 2.0)), 3);
        assert_eq!(s.areas().used_areas(), "3|");
    }

    #[test]
    fn deleting_unknown_area_is_a_no_op() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        let before = s.overlay_url();
        assert!(!s.delete_area(99));
        assert_eq!(s.overlay_url(), before);
    }

    #[test]
    fn only_the_edited_angle_changes() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        draw(&mut s, (30.0, 30.0), (40.0, 40.0));
        assert!(s.set_area_angle(2, "45"));
        let url = s.overlay_url().unwrap();
        assert!(url.contains("&angle_2=45"));
        assert!(url.contains("&angle_1=0"));
        assert!(!s.set_area_angle(5, "10"));
    }

    #[test]
    fn angle_text_is_passed_through() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        s.set_area_angle(1, "-400");
        assert!(s.overlay_url().unwrap().ends_with("&angle_1=-400"));
        s.set_area_angle(1, "abc");
        assert!(s.overlay_url().unwrap().ends_with("&angle_1=abc"));
    }

    #[test]
    fn overlay_url_is_stable_without_mutation() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        draw(&mut s, (200.0, 100.0), (120.0, 30.0));
        assert_eq!(s.overlay_url(), s.overlay_url());
    }

    #[test]
    fn no_map_ignores_clicks_and_hides_configure() {
        let mut s = EditorSession::default();
        let view = s.select_map(MapSelection::parse("-1"), false);
        assert_eq!(view, MapView::default());
        assert_eq!(click(&mut s, 10.0, 10.0), ClickOutcome::Ignored);
        assert_eq!(s.pending_corner(), None);
        assert!(s.areas().is_empty());
        assert_eq!(s.overlay_url(), None);
    }

    #[test]
    fn out_of_bounds_click_keeps_phase() {
        let mut s = session_on_map();
        click(&mut s, 10.0, 10.0);
        assert_eq!(click(&mut s, 300.0, 50.0), ClickOutcome::Ignored);
        assert_eq!(click(&mut s, 50.0, 301.0), ClickOutcome::Ignored);
        assert_eq!(s.pending_corner(), Some(Point::new(10, 10)));
        assert!(s.areas().is_empty());
    }

    #[test]
    fn switching_maps_clears_everything() {
        let mut s = session_on_map();
        draw(&mut s, (10.0, 10.0), (20.0, 20.0));
        click(&mut s, 5.0, 5.0);

        let view = s.select_map(MapSelection::Map(8), false);
        assert!(s.areas().is_empty());
        assert_eq!(s.next_sequence(), 1);
        assert_eq!(s.pending_corner(), None);
        assert!(view.show_configure);
        assert_eq!(view.overlay_url.as_deref(), Some("ImageCreator?mapId=8"));
        assert_eq!(s.overlay_url().as_deref(), Some("ImageCreator?mapId=8&used_areas="));
    }

    #[test]
    fn rendered_map_hides_configure() {
        let mut s = EditorSession::default();
        let view = s.select_map(MapSelection::Map(3), true);
        assert!(!view.show_configure);
        assert!(view.overlay_url.is_none());
        assert_eq!(s.map(), MapSelection::Map(3));
    }

    #[test]
    fn selection_parses_sentinel_and_garbage() {
        assert_eq!(MapSelection::parse("-1"), MapSelection::None);
        assert_eq!(MapSelection::parse(""), MapSelection::None);
        assert_eq!(MapSelection::parse("x"), MapSelection::None);
        assert_eq!(MapSelection::parse(" 12 "), MapSelection::Map(12));
    }

    #[test]
    fn sequences_strictly_increase() {
        let mut s = session_on_map();
        let mut last = 0;
        for i in 0..5 {
            let v = i as f64 * 10.0;
            let seq = draw(&mut s, (v, v), (v + 5.0, v + 5.0));
            assert!(seq > last);
            last = seq;
        }
        assert_eq!(s.areas().len(), 5);
    }

    #[test]
    fn existing_areas_get_fresh_sequences() {
        let mut s = EditorSession::default();
        s.load_existing(
            MapSelection::Map(2),
            vec![
                StoredArea {
                    id: 40,
                    x1: 100,
                    y1: 80,
                    x2: 10,
                    y2: 20,
                    angle: 90,
                },
                StoredArea {
                    id: 41,
                    x1: 1,
                    y1: 2,
                    x2: 3,
                    y2: 4,
                    angle: 0,
                },
            ],
        );
        assert_eq!(s.areas().used_areas(), "1|2|");
        let first = s.areas().get(1).unwrap();
        assert_eq!(first.id, 40);
        assert_eq!((first.x1(), first.y1(), first.x2(), first.y2()), (10, 20, 100, 80));
        assert_eq!(draw(&mut s, (5.0, 5.0), (6.0, 6.0)), 3);
    }

    #[test]
    fn pointer_move_reports_only_inside_image() {
        let s = session_on_map();
        assert_eq!(s.pointer_move(12.6, 7.2, MAP), Some(Point::new(13, 7)));
        assert_eq!(s.pointer_move(320.0, 7.0, MAP), None);
    }

    #[test]
    fn pin_and_arrow_follow_config_offsets() {
        let mut s = session_on_map();
        let origin = ScreenPos::new(5.0, 5.0);
        match s.pointer_click(50.0, 40.0, MAP, origin) {
            ClickOutcome::CornerPlaced { pin, .. } => assert_eq!(pin, ScreenPos::new(55.0, 29.0)),
            other => panic!("unexpected {:?}", other),
        }
        s.pointer_click(20.0, 90.0, MAP, origin);
        assert_eq!(s.arrow_for(1, origin), Some(ScreenPos::new(9.0, 29.0)));
        assert_eq!(s.arrow_for(2, origin), None);
    }

    #[test]
    fn custom_endpoint_is_used() {
        let mut s = EditorSession::new(EditorConfig::default().with_image_creator("/admin/ImageCreator"));
        s.select_map(MapSelection::Map(1), true);
        assert_eq!(
            s.overlay_url().as_deref(),
            Some("/admin/ImageCreator?mapId=1&used_areas=")
        );
    }
}
