use crate::area::Area;

/// Areas of the selected map in creation order.
///
/// This is the canonical state; the pipe-delimited index and the
/// hidden form fields are recomputed from it on demand.
#[derive(Clone, Debug, Default)]
pub struct AreaCollection {
    areas: Vec<Area>,
}

impl AreaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, area: Area) {
        self.areas.push(area);
    }

    pub fn remove(&mut self, sequence: u32) -> Option<Area> {
        let idx = self.areas.iter().position(|a| a.sequence == sequence)?;
        Some(self.areas.remove(idx))
    }

    pub fn get(&self, sequence: u32) -> Option<&Area> {
        self.areas.iter().find(|a| a.sequence == sequence)
    }

    pub fn get_mut(&mut self, sequence: u32) -> Option<&mut Area> {
        self.areas.iter_mut().find(|a| a.sequence == sequence)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Area> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn clear(&mut self) {
        self.areas.clear();
    }

    /// Serialized index: every sequence number followed by `|`, e.g. `1|2|3|`.
    pub fn used_areas(&self) -> String {
        let mut out = String::new();
        for a in &self.areas {
            out.push_str(&a.sequence.to_string());
            out.push('|');
        }
        out
    }
}

impl<'a> IntoIterator for &'a AreaCollection {
    type Item = &'a Area;
    type IntoIter = std::slice::Iter<'a, Area>;

    fn into_iter(self) -> Self::IntoIter {
        self.areas.iter()
    }
}
