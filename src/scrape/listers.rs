//! Listing parsers: pages, works, simple media, and page items
//!
//! The three table-shaped listings share one scan: rows are `<tr>` elements
//! at nesting depth 1 carrying a `data-id` attribute, and the displayed title
//! is the character data of the second `<td>` of the row. Rows nested deeper
//! than depth 1 belong to embedded widgets and are ignored by the depth
//! counter. What distinguishes the listings is only the row discriminator.

use super::{attr, fragment_reader, ref_chunk, tag_is, text_chunk};
use crate::models::{ItemEntry, MediaEntry};
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

/// Ordinal of the `<td>` whose character data is the entry's title
const TITLE_CELL: u32 = 2;

/// Row discriminator for the table scan
enum RowRule {
    /// Any depth-1 row with a `data-id` (page listing)
    AnyRow,
    /// Row `class` must equal the value exactly (work listing)
    ClassExact(&'static str),
    /// Row `class` must contain the token, whitespace-separated, and the row
    /// must also carry `data-tool` (simple-media listing)
    ClassToken(&'static str),
}

impl RowRule {
    /// Identifier and optional tool for a row start tag, `None` when the row
    /// does not belong to this listing
    fn match_row(&self, e: &BytesStart) -> Option<(String, Option<String>)> {
        let id = attr(e, b"data-id")?;
        match self {
            RowRule::AnyRow => Some((id, None)),
            RowRule::ClassExact(class) => {
                if attr(e, b"class")?.as_str() == *class {
                    Some((id, None))
                } else {
                    None
                }
            }
            RowRule::ClassToken(token) => {
                if attr(e, b"class")?.split_whitespace().any(|t| t == *token) {
                    let tool = attr(e, b"data-tool")?;
                    Some((id, Some(tool)))
                } else {
                    None
                }
            }
        }
    }
}

fn scan_table(html: &str, rule: RowRule) -> BTreeMap<String, (Option<String>, String)> {
    let mut reader = fragment_reader(html);
    let mut out = BTreeMap::new();

    let mut nest_tr: u32 = 0;
    let mut nest_td: u32 = 0;
    let mut cnt_td: u32 = 0;
    let mut current: Option<(String, Option<String>)> = None;
    let mut title: Option<String> = None;

    fn commit(
        current: &mut Option<(String, Option<String>)>,
        title: &mut Option<String>,
        out: &mut BTreeMap<String, (Option<String>, String)>,
    ) {
        if let (Some((id, tool)), Some(text)) = (current.take(), title.take()) {
            out.insert(id, (tool, text.trim().to_string()));
        }
        *current = None;
        *title = None;
    }

    loop {
        match reader.read_event() {
            // Lenient by contract: malformed markup ends the scan, it never fails
            Err(_) | Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                let name = e.name();
                if tag_is(name.as_ref(), b"tr") {
                    nest_tr += 1;
                    if nest_tr == 1 {
                        nest_td = 0;
                        cnt_td = 0;
                        title = None;
                        current = rule.match_row(&e);
                    }
                } else if tag_is(name.as_ref(), b"td") && nest_tr == 1 {
                    nest_td += 1;
                    cnt_td += 1;
                }
            }
            Ok(Event::Empty(e)) => {
                // A self-closed cell still advances the cell count
                if tag_is(e.name().as_ref(), b"td") && nest_tr == 1 {
                    cnt_td += 1;
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if tag_is(name.as_ref(), b"tr") && nest_tr > 0 {
                    if nest_tr == 1 {
                        commit(&mut current, &mut title, &mut out);
                    }
                    nest_tr -= 1;
                } else if tag_is(name.as_ref(), b"td") && nest_tr == 1 && nest_td > 0 {
                    nest_td -= 1;
                }
            }
            Ok(Event::Text(e)) => {
                if current.is_some() && nest_tr == 1 && nest_td == 1 && cnt_td == TITLE_CELL {
                    title.get_or_insert_with(String::new).push_str(&text_chunk(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if current.is_some() && nest_tr == 1 && nest_td == 1 && cnt_td == TITLE_CELL {
                    if let Some(chunk) = ref_chunk(&e) {
                        title.get_or_insert_with(String::new).push_str(&chunk);
                    }
                }
            }
            Ok(_) => {}
        }
    }

    // Rows whose closing tag the editor omitted
    commit(&mut current, &mut title, &mut out);

    out
}

/// Page listing (`/editor/weaves`): page id → page title
pub fn list_pages(html: &str) -> BTreeMap<String, String> {
    scan_table(html, RowRule::AnyRow)
        .into_iter()
        .map(|(id, (_, title))| (id, title))
        .collect()
}

/// Media-set listing (`/editor/works`): set id → set title.
/// Unrelated rows at the same depth are excluded by the `work` class.
pub fn list_works(html: &str) -> BTreeMap<String, String> {
    scan_table(html, RowRule::ClassExact("work"))
        .into_iter()
        .map(|(id, (_, title))| (id, title))
        .collect()
}

/// Simple-media listing (`/simple-media/list`): file id → (tool, title)
pub fn list_simple_media(html: &str) -> BTreeMap<String, MediaEntry> {
    scan_table(html, RowRule::ClassToken("simple-media"))
        .into_iter()
        .filter_map(|(id, (tool, title))| Some((id, MediaEntry { tool: tool?, title })))
        .collect()
}

/// Item listing (`/editor/content`): item id → (tool, title).
///
/// No depth tracking here: every `<div>` anywhere in the fragment carrying
/// all three data attributes is an item; anything less is skipped.
pub fn list_items(html: &str) -> BTreeMap<String, ItemEntry> {
    let mut reader = fragment_reader(html);
    let mut out = BTreeMap::new();

    loop {
        match reader.read_event() {
            Err(_) | Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if !tag_is(e.name().as_ref(), b"div") {
                    continue;
                }
                let entry = attr(&e, b"data-id").and_then(|id| {
                    let tool = attr(&e, b"data-tool")?;
                    let title = attr(&e, b"data-title")?;
                    Some((id, ItemEntry { tool, title }))
                });
                if let Some((id, entry)) = entry {
                    out.insert(id, entry);
                }
            }
            Ok(_) => {}
        }
    }

    out
}
