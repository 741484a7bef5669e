//! Links from a record's subject matters to the locations shelving them.
//!
//! Every distinct subject on the page is searched through the exporter;
//! the locations found are merged into one sorted list of links to the
//! location handler.

use std::collections::{HashMap, HashSet};

use percent_encoding::utf8_percent_encode;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

use crate::error::AreaError;
use crate::overlay::QUERY_VALUE;

pub const EXPORTER: &str = "Exporter";
pub const LOCATION_HANDLER: &str = "LocationHandler";

/// Plugin settings, in the page's camelCase JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectConfig {
    pub owner: String,
    /// Suffix of the `subject_matter_` class naming the spans to read.
    pub target: String,
    pub hide_if_empty: bool,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        SubjectConfig {
            owner: String::new(),
            target: String::new(),
            hide_if_empty: true,
        }
    }
}

impl SubjectConfig {
    pub fn from_json(text: &str) -> Result<Self, AreaError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// CSS selector of the spans holding the subject matters.
    pub fn subject_selector(&self) -> String {
        format!("span[class^=\"subject_matter_{}\"]", self.target)
    }

    /// Exporter query for the locations filed under `subject`.
    pub fn search_url(&self, base: &str, subject: &str) -> String {
        format!(
            "{}?owner={}&type=subject&children=no&search={}&position=match",
            base,
            encode(&self.owner),
            encode(subject)
        )
    }

    pub fn is_visible(&self, links: usize) -> bool {
        links > 0 || !self.hide_if_empty
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// One `<location>` of an exporter response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportedLocation {
    pub id: String,
    pub call_number: String,
    pub collection_code: Option<String>,
}

/// Read the locations out of an exporter response. Only fields directly
/// under a `<location>` count; nested locations are returned on their own.
pub fn parse_locations(xml: &str) -> Result<Vec<ExportedLocation>, AreaError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Open locations with the element depth they were opened at.
    let mut open: Vec<(usize, ExportedLocation)> = Vec::new();
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                depth += 1;
                current = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if current == "location" {
                    open.push((depth, ExportedLocation::default()));
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"location"
                    && let Some((_, loc)) = open.pop()
                {
                    found.push(loc);
                }
                depth = depth.saturating_sub(1);
                current.clear();
            }
            Event::Text(ref e) => {
                let Some((at, loc)) = open.last_mut() else {
                    continue;
                };
                if *at + 1 != depth {
                    continue;
                }
                let text = e.unescape()?.trim().to_string();
                match current.as_str() {
                    "locationid" => loc.id = text,
                    "callnumber" => loc.call_number = text,
                    "collectioncode" if !text.is_empty() => loc.collection_code = Some(text),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(found)
}

/// A rendered `<li><a>` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectLink {
    pub href: String,
    pub label: String,
}

#[derive(Clone, Debug)]
struct Shelved {
    call_number: String,
    collection: Option<String>,
}

impl Shelved {
    // Sort key and link target: the call number, then its collection.
    fn key(&self) -> String {
        match &self.collection {
            Some(code) => format!("{}&collection={}", self.call_number, code),
            None => self.call_number.clone(),
        }
    }
}

/// Search results gathered per subject, in the order the subjects were
/// first seen on the page.
#[derive(Clone, Debug, Default)]
pub struct SubjectLinks {
    subjects: Vec<(String, Vec<ExportedLocation>)>,
    collection_codes: HashMap<String, String>,
}

impl SubjectLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `subject` was already searched.
    pub fn contains(&self, subject: &str) -> bool {
        self.subjects.iter().any(|(s, _)| s == subject)
    }

    /// Store the result of one search. A collection code, once seen for a
    /// location, sticks to it across all searches.
    pub fn record(&mut self, subject: &str, locations: Vec<ExportedLocation>) {
        if self.contains(subject) {
            return;
        }
        for loc in &locations {
            if let Some(code) = &loc.collection_code {
                self.collection_codes.insert(loc.id.clone(), code.clone());
            }
        }
        self.subjects.push((subject.to_string(), locations));
    }

    // Each location once, first occurrence wins, sorted by call number.
    fn unique(&self) -> Vec<Shelved> {
        let mut seen = HashSet::new();
        let mut out: Vec<Shelved> = self
            .subjects
            .iter()
            .flat_map(|(_, locs)| locs)
            .filter(|loc| seen.insert(loc.id.as_str()))
            .map(|loc| Shelved {
                call_number: loc.call_number.clone(),
                collection: self.collection_codes.get(&loc.id).cloned(),
            })
            .collect();
        out.sort_by_key(Shelved::key);
        out
    }

    /// Links to the location handler, one per distinct location.
    pub fn links(&self, base: &str, lang: &str, owner: &str) -> Vec<SubjectLink> {
        self.unique()
            .into_iter()
            .map(|s| {
                let collection = s
                    .collection
                    .as_deref()
                    .map(|c| format!("&collection={}", encode(c)))
                    .unwrap_or_default();
                SubjectLink {
                    href: format!(
                        "{}?callno={}{}&status=0&lang={}&owner={}",
                        base,
                        encode(&s.call_number),
                        collection,
                        encode(lang),
                        encode(owner)
                    ),
                    label: s.call_number,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<locations>
  <location>
    <locationid>12</locationid>
    <locationcode>HUM</locationcode>
    <callnumber>HUM 84.2</callnumber>
    <floor>2</floor>
    <collectioncode>hum-main</collectioncode>
  </location>
  <location>
    <locationid>7</locationid>
    <callnumber>ART &amp; DESIGN</callnumber>
    <collectioncode />
  </location>
</locations>"#;

    fn loc(id: &str, call_number: &str, code: Option<&str>) -> ExportedLocation {
        ExportedLocation {
            id: id.to_string(),
            call_number: call_number.to_string(),
            collection_code: code.map(str::to_string),
        }
    }

    #[test]
    fn exporter_locations_are_read() {
        let found = parse_locations(RESPONSE).unwrap();
        assert_eq!(
            found,
            vec![loc("12", "HUM 84.2", Some("hum-main")), loc("7", "ART & DESIGN", None)]
        );
        assert!(parse_locations("<locations/>").unwrap().is_empty());
    }

    #[test]
    fn nested_fields_stay_with_their_location() {
        let xml = "<location><locationid>1</locationid><callnumber>A</callnumber>\
                   <shelf><location><locationid>2</locationid><callnumber>B</callnumber></location></shelf>\
                   <collectioncode>c1</collectioncode></location>";
        let found = parse_locations(xml).unwrap();
        assert_eq!(found, vec![loc("2", "B", None), loc("1", "A", Some("c1"))]);
    }

    #[test]
    fn broken_response_is_an_error() {
        assert!(parse_locations("<location><callnumber>A</location>").is_err());
    }

    #[test]
    fn locations_are_deduplicated_and_sorted() {
        let mut links = SubjectLinks::new();
        links.record("history", vec![loc("3", "HIS 9", None), loc("1", "ART 1", None)]);
        links.record("art", vec![loc("1", "ART 1 again", Some("arts")), loc("5", "BIO 2", None)]);
        links.record("history", vec![loc("9", "ZZZ", None)]);

        let out = links.links(LOCATION_HANDLER, "fi", "owner1");
        let labels: Vec<&str> = out.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["ART 1", "BIO 2", "HIS 9"]);
        assert_eq!(
            out[0].href,
            "LocationHandler?callno=ART%201&collection=arts&status=0&lang=fi&owner=owner1"
        );
        assert_eq!(out[1].href, "LocationHandler?callno=BIO%202&status=0&lang=fi&owner=owner1");
        assert!(links.contains("art"));
        assert!(!links.contains("biology"));
    }

    #[test]
    fn settings_and_queries() {
        let cfg = SubjectConfig::from_json(r#"{"owner":"NLF","target":"fi"}"#).unwrap();
        assert!(cfg.hide_if_empty);
        assert_eq!(cfg.subject_selector(), r#"span[class^="subject_matter_fi"]"#);
        assert_eq!(
            cfg.search_url(EXPORTER, "arts & crafts"),
            "Exporter?owner=NLF&type=subject&children=no&search=arts%20%26%20crafts&position=match"
        );
        assert!(!cfg.is_visible(0));
        assert!(cfg.is_visible(1));

        let always = SubjectConfig::from_json(r#"{"hideIfEmpty":false}"#).unwrap();
        assert!(always.is_visible(0));
        assert_eq!(SubjectConfig::from_json(" ").unwrap(), SubjectConfig::default());
    }
}
