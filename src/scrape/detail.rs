//! Item-detail extractor
//!
//! The item edit form (`/item/edit`, also the weave edit form) is scraped
//! back into the nested option groups that produced it. The tool name comes
//! from the form's `title` attribute; every input-like control whose `name`
//! matches the `group[field]` convention contributes its current value:
//!
//!   - `<input>`: the `value` attribute, except checkboxes that are not
//!     checked, which are dropped;
//!   - `<select>`: the `value` of the `<option>` carrying `selected`;
//!   - `<textarea>`: the character data up to the closing tag.
//!
//! Controls with no `name`, a non-bracketed name, or a missing `value` are
//! skipped silently, matching the rest of the scraping layer.

use super::{attr, fragment_reader, has_attr, ref_chunk, split_bracket, tag_is, text_chunk};
use crate::models::ItemDetail;
use quick_xml::events::Event;
use regex::Regex;
use std::sync::OnceLock;

fn tool_re() -> &'static Regex {
    static TOOL_RE: OnceLock<Regex> = OnceLock::new();
    TOOL_RE.get_or_init(|| Regex::new(r"^edit\s*(\S+)\s*tool").expect("valid pattern"))
}

/// Parse an edit-form fragment into a tool name and nested field values
pub fn item_detail(html: &str) -> ItemDetail {
    let mut reader = fragment_reader(html);
    let mut detail = ItemDetail::default();

    // Open select/textarea paths; `None` outside the respective element
    let mut select: Option<(String, String)> = None;
    let mut textarea: Option<(String, String)> = None;
    let mut textarea_buf = String::new();

    loop {
        match reader.read_event() {
            Err(_) | Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let name = e.name();
                if tag_is(name.as_ref(), b"form") {
                    if let Some(title) = attr(&e, b"title") {
                        if let Some(caps) = tool_re().captures(&title) {
                            detail.tool = Some(caps[1].to_string());
                        }
                    }
                } else if tag_is(name.as_ref(), b"input") {
                    let path = attr(&e, b"name").as_deref().and_then(split_bracket).map(
                        |(group, field)| (group.to_string(), field.to_string()),
                    );
                    let Some((group, field)) = path else { continue };

                    let kind = attr(&e, b"type").unwrap_or_else(|| "text".to_string());
                    if kind == "checkbox" && !has_attr(&e, b"checked") {
                        continue;
                    }
                    if let Some(value) = attr(&e, b"value") {
                        detail.fields.entry(group).or_default().insert(field, value);
                    }
                } else if tag_is(name.as_ref(), b"select") {
                    select = attr(&e, b"name").as_deref().and_then(split_bracket).map(
                        |(group, field)| (group.to_string(), field.to_string()),
                    );
                } else if tag_is(name.as_ref(), b"option") {
                    if let Some((group, field)) = &select {
                        if has_attr(&e, b"selected") {
                            if let Some(value) = attr(&e, b"value") {
                                detail
                                    .fields
                                    .entry(group.clone())
                                    .or_default()
                                    .insert(field.clone(), value);
                            }
                        }
                    }
                } else if tag_is(name.as_ref(), b"textarea") {
                    textarea = attr(&e, b"name").as_deref().and_then(split_bracket).map(
                        |(group, field)| (group.to_string(), field.to_string()),
                    );
                    textarea_buf.clear();
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if tag_is(name.as_ref(), b"select") {
                    select = None;
                } else if tag_is(name.as_ref(), b"textarea") {
                    if let Some((group, field)) = textarea.take() {
                        detail
                            .fields
                            .entry(group)
                            .or_default()
                            .insert(field, std::mem::take(&mut textarea_buf));
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if textarea.is_some() {
                    textarea_buf.push_str(&text_chunk(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if textarea.is_some() {
                    if let Some(chunk) = ref_chunk(&e) {
                        textarea_buf.push_str(&chunk);
                    }
                }
            }
            Ok(_) => {}
        }
    }

    // Fragment truncated inside a textarea: keep what was read
    if let Some((group, field)) = textarea.take() {
        detail
            .fields
            .entry(group)
            .or_default()
            .insert(field, textarea_buf);
    }

    detail
}
