use crate::collection::AreaCollection;

/// Name of the hidden field holding the serialized index.
pub const USED_AREAS: &str = "used_areas";

/// A hidden input submitted with the location form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    fn new(name: impl Into<String>, value: impl ToString) -> Self {
        FormField {
            name: name.into(),
            value: value.to_string(),
        }
    }
}

/// Hidden inputs for the collection: the index first, then six fields per
/// area in index order.
pub fn form_fields(areas: &AreaCollection) -> Vec<FormField> {
    let mut out = Vec::with_capacity(1 + areas.len() * 6);
    out.push(FormField::new(USED_AREAS, areas.used_areas()));
    for a in areas {
        let s = a.sequence;
        out.push(FormField::new(format!("areaId_{s}"), a.id));
        out.push(FormField::new(format!("x1_{s}"), a.x1()));
        out.push(FormField::new(format!("y1_{s}"), a.y1()));
        out.push(FormField::new(format!("x2_{s}"), a.x2()));
        out.push(FormField::new(format!("y2_{s}"), a.y2()));
        out.push(FormField::new(format!("angle_{s}"), &a.angle));
    }
    out
}
