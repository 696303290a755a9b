//! Programmatic client for the Research Catalogue exposition editor
//!
//! The editor at <https://www.researchcatalogue.net> has no public API; its
//! own JavaScript front end drives a set of form-POST endpoints that answer
//! with empty bodies, bare identifiers, or server-rendered HTML fragments.
//! This crate speaks that same private protocol: it logs in with the regular
//! session form, keeps the session cookie, and turns the editor's responses
//! back into plain Rust values.
//!
//! The surface is organized around four kinds of objects:
//!
//!   - **pages** (the editor calls them weaves), the canvases of an
//!     exposition;
//!   - **media sets** (works), grouped collections of media files with
//!     publication metadata;
//!   - **media files**, either in an exposition's simple-media pool or inside
//!     a media set; a file is created as a metadata record first and its
//!     bytes uploaded separately;
//!   - **items**, the placements of media files on a page, with pixel
//!     geometry and per-tool options.
//!
//! Everything goes through [`RcClient`], one instance per exposition and
//! session. See its documentation for a full walk-through.
//!
//! Because the protocol is scraped rather than published, the parsers in
//! [`scrape`] are deliberately lenient: markup the current editor does not
//! produce is skipped rather than reported. A client update is the fix when
//! the editor's markup drifts.

pub mod client;
pub mod error;
pub mod filter;
pub mod form;
pub mod models;
pub mod scrape;
pub mod transport;

pub use client::{
    ClientBuilder, RcClient, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
pub use error::{Error, Result};
pub use filter::{Filterable, NameFilter};
pub use models::{
    ItemDetail, ItemEntry, MediaEntry, OptionGroups, Rect, UploadKind, LICENSES, MEDIASET_GENRES,
    MEDIA_TYPES,
};
pub use transport::{FilePart, LastResponse, Transport};
