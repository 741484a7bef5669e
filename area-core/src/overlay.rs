use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::collection::AreaCollection;

/// Characters that would break out of a query value. The angle is free
/// text, everything else written here is an integer.
pub(crate) const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>');

/// Overlay URL for a freshly selected map, before any area exists.
pub fn initial_overlay_url(base: &str, map_id: i64) -> String {
    format!("{}?mapId={}", base, map_id)
}

/// Overlay URL carrying every area of the collection.
///
/// Areas are written in index order, five parameters each, so the
/// same collection always yields the same string.
pub fn build_overlay_url(base: &str, map_id: i64, areas: &AreaCollection) -> String {
    let mut url = format!("{}&used_areas={}", initial_overlay_url(base, map_id), areas.used_areas());
    for a in areas {
        let s = a.sequence;
        url.push_str(&format!(
            "&x1_{s}={}&y1_{s}={}&x2_{s}={}&y2_{s}={}&angle_{s}={}",
            a.x1(),
            a.y1(),
            a.x2(),
            a.y2(),
            utf8_percent_encode(a.angle.as_str(), QUERY_VALUE)
        ));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{Angle, Area};

    fn collection(areas: &[(u32, (i32, i32), (i32, i32), &str)]) -> AreaCollection {
        let mut c = AreaCollection::new();
        for (seq, a, b, angle) in areas {
            c.push(Area::from_corners(0, *seq, (*a).into(), (*b).into(), Angle::from(*angle)));
        }
        c
    }

    #[test]
    fn empty_collection_still_lists_used_areas() {
        let url = build_overlay_url("ImageCreator", 4, &AreaCollection::new());
        assert_eq!(url, "ImageCreator?mapId=4&used_areas=");
        assert_eq!(initial_overlay_url("ImageCreator", 4), "ImageCreator?mapId=4");
    }

    #[test]
    fn every_listed_area_has_five_parameters() {
        let c = collection(&[(1, (5, 6), (7, 8), "0"), (2, (10, 20), (30, 40), "15")]);
        let url = build_overlay_url("ImageCreator", 3, &c);
        assert_eq!(
            url,
            "ImageCreator?mapId=3&used_areas=1|2|\
             &x1_1=5&y1_1=6&x2_1=7&y2_1=8&angle_1=0\
             &x1_2=10&y1_2=20&x2_2=30&y2_2=40&angle_2=15"
        );
    }

    #[test]
    fn index_order_is_kept_not_sorted() {
        let c = collection(&[(9, (0, 0), (1, 1), "0"), (2, (0, 0), (2, 2), "0")]);
        let url = build_overlay_url("ImageCreator", 1, &c);
        assert!(url.contains("used_areas=9|2|"));
        let nine = url.find("x1_9=").unwrap();
        let two = url.find("x1_2=").unwrap();
        assert!(nine < two);
    }

    #[test]
    fn free_text_angle_is_escaped() {
        let c = collection(&[(1, (0, 0), (1, 1), "4 5&x=1")]);
        let url = build_overlay_url("ImageCreator", 1, &c);
        assert!(url.ends_with("&angle_1=4%205%26x%3D1"));
        let c = collection(&[(1, (0, 0), (1, 1), "-720")]);
        assert!(build_overlay_url("ImageCreator", 1, &c).ends_with("&angle_1=-720"));
    }
}
