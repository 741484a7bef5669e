use area_core::{EXPORTER, LOCATION_HANDLER, SubjectConfig, SubjectLinks, parse_locations};
use js_sys::{Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlElement, Window};

use crate::utils::asset_url;

async fn fetch_text(window: &Window, url: &str) -> Result<String, JsValue> {
    let resp: web_sys::Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("{} answered {}", url, resp.status())));
    }
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response is not text"))
}

// Exporter XML for one subject, through the page's own search function
// when one is given.
async fn search(
    window: &Window,
    exporter: Option<&Function>,
    config: &SubjectConfig,
    subject: &str,
) -> Result<String, JsValue> {
    match exporter {
        Some(f) => {
            let answer = f.call2(
                &JsValue::NULL,
                &JsValue::from_str(subject),
                &JsValue::from_str(&config.owner),
            )?;
            JsFuture::from(Promise::resolve(&answer))
                .await?
                .as_string()
                .ok_or_else(|| JsValue::from_str("exporter did not return text"))
        }
        None => fetch_text(window, &config.search_url(&asset_url(EXPORTER), subject)).await,
    }
}

fn subjects_on_page(document: &Document, config: &SubjectConfig) -> Result<Vec<String>, JsValue> {
    let spans = document.query_selector_all(&config.subject_selector())?;
    let mut out: Vec<String> = Vec::new();
    for i in 0..spans.length() {
        let text = spans
            .item(i)
            .and_then(|n| n.text_content())
            .unwrap_or_default();
        if !out.contains(&text) {
            out.push(text);
        }
    }
    Ok(out)
}

fn append_links(
    document: &Document,
    container: &HtmlElement,
    links: &SubjectLinks,
    owner: &str,
) -> Result<usize, JsValue> {
    let lang = container.get_attribute("lang").unwrap_or_default();
    let list = document.create_element("ul")?;
    let links = links.links(&asset_url(LOCATION_HANDLER), &lang, owner);
    for link in &links {
        let item = document.create_element("li")?;
        let a = document.create_element("a")?;
        a.set_attribute("href", &link.href)?;
        a.set_text_content(Some(&link.label));
        item.append_child(&a)?;
        list.append_child(&item)?;
    }
    container.append_child(&list)?;
    Ok(links.len())
}

async fn link_containers(
    window: Window,
    selector: String,
    config: SubjectConfig,
    exporter: Option<Function>,
) -> Result<usize, JsValue> {
    let document = window.document().ok_or("no document")?;

    let containers = document.query_selector_all(&selector)?;
    let mut hidden = Vec::new();
    for i in 0..containers.length() {
        if let Some(c) = containers.item(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
            c.style().set_property("display", "none")?;
            hidden.push(c);
        }
    }
    if hidden.is_empty() {
        return Ok(0);
    }

    let mut links = SubjectLinks::new();
    for subject in subjects_on_page(&document, &config)? {
        let locations = match search(&window, exporter.as_ref(), &config, &subject).await {
            Ok(xml) => parse_locations(&xml).map_err(|e| JsValue::from_str(&e.to_string())),
            Err(e) => Err(e),
        };
        match locations {
            Ok(found) => links.record(&subject, found),
            Err(e) => {
                log::warn!("subject {:?} not searched: {:?}", subject, e);
                links.record(&subject, Vec::new());
            }
        }
    }

    let mut count = 0;
    for container in &hidden {
        count = append_links(&document, container, &links, &config.owner)?;
        if config.is_visible(count) {
            container.style().set_property("display", "")?;
        }
    }
    Ok(count)
}

/// Append links to the locations holding the page's subject matters to
/// every element matching `selector`.
///
/// `settings` uses the plugin's camelCase keys (`owner`, `target`,
/// `hideIfEmpty`). `exporter`, when given, is called as
/// `exporter(subject, owner)` and must resolve to the exporter's XML;
/// otherwise the exporter is fetched directly. The searches run in the
/// background; bad settings are reported right away.
#[wasm_bindgen]
pub fn link_subject_matters(
    selector: &str,
    settings: &str,
    exporter: Option<Function>,
) -> Result<(), JsValue> {
    let config =
        SubjectConfig::from_json(settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let window = web_sys::window().ok_or("no window")?;
    let selector = selector.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        match link_containers(window, selector, config, exporter).await {
            Ok(count) => log::debug!("{} subject links per container", count),
            Err(e) => log::warn!("subject links not added: {:?}", e),
        }
    });
    Ok(())
}
