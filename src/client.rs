//! High-level client for the Research Catalogue exposition editor
//!
//! One [`RcClient`] binds one exposition to one authenticated session. All
//! operations are synchronous and issued one at a time; the session cookie
//! set at [`login`](RcClient::login) is the only state the client carries
//! besides the exposition identifier.
//!
//! The editor has no uniform response envelope. Each operation follows one of
//! the three conventions the service actually uses:
//!
//!   - empty-body-means-success: a non-empty trimmed body is a failure
//!     (login, removals, fast updates, lock toggling, option sets);
//!   - identifier-in-body: the new identifier is the whole trimmed body
//!     (pages, media sets) or is pulled out of it by pattern matching
//!     (media files, items);
//!   - structured-body: listing and detail bodies go to the fragment parsers
//!     in [`crate::scrape`].
//!
//! # Example
//!
//! ```no_run
//! use rcedit::{RcClient, Rect};
//!
//! fn main() -> rcedit::Result<()> {
//!     let mut rc = RcClient::new("123456")?;
//!     rc.login("user@example.com", "secret")?;
//!
//!     let pages = rc.page_list()?;
//!     println!("{} pages", pages.len());
//!
//!     let media_id = rc.media_add("fig1", "me", "image", "cc-by", "", None)?;
//!     rc.media_upload(&media_id, std::path::Path::new("fig1.png"))?;
//!
//!     let page_id = rc.page_add("New page", None, &Default::default())?;
//!     rc.item_add(&page_id, &media_id, Rect::new(10, 10, 300, 200), "picture")?;
//!
//!     rc.logout()?;
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::filter::{self, NameFilter};
use crate::form::{bracket_key, FormData};
use crate::models::{
    upload_kind_for, validate_license, validate_media_type, validate_mediaset_genre, ItemDetail,
    ItemEntry, MediaEntry, OptionGroups, Rect, WorkChildren,
};
use crate::scrape;
use crate::transport::{FilePart, Transport};
use regex::Regex;
use reqwest::blocking::Client;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

/// Default editor origin
pub const DEFAULT_BASE_URL: &str = "https://www.researchcatalogue.net";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("rcedit/", env!("CARGO_PKG_VERSION"));

/// Pattern for the item identifier in an item-creation response
fn item_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"data-id="(\d+)""#).expect("valid pattern"))
}

/// Pattern for the file identifier in a media-creation response. The editor
/// answers with a script snippet pointing the parent frame at the edit form
/// of the new file; the edit path differs between the simple-media pool and
/// media sets.
fn media_id_re(simple: bool) -> &'static Regex {
    static SIMPLE_RE: OnceLock<Regex> = OnceLock::new();
    static WORK_RE: OnceLock<Regex> = OnceLock::new();
    let (cell, edit_path) = if simple {
        (&SIMPLE_RE, "simple-media/edit")
    } else {
        (&WORK_RE, "file/edit")
    };
    cell.get_or_init(|| {
        Regex::new(&format!(
            r"parent\.window\.formAction\s*=\s*'/?{}\?file=(\d+)';",
            regex::escape(edit_path)
        ))
        .expect("valid pattern")
    })
}

/// Empty-body-means-success check shared by all mutating operations
fn expect_empty(body: &str, operation: &str) -> Result<()> {
    if body.trim().is_empty() {
        Ok(())
    } else {
        Err(Error::remote(format!("{operation} failed")))
    }
}

/// Editor client bound to one exposition
///
/// All methods take `&mut self`: one session is one logical actor, and the
/// diagnostic last-response record is updated by every call.
#[derive(Debug)]
pub struct RcClient {
    transport: Transport,
    exposition: String,
}

impl RcClient {
    /// Create a client for an exposition with default settings.
    /// Authentication happens separately via [`login`](Self::login).
    pub fn new(exposition: impl Into<String>) -> Result<Self> {
        Self::builder().build(exposition)
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The exposition identifier this client is bound to
    pub fn exposition(&self) -> &str {
        &self.exposition
    }

    /// The underlying session, exposing the last raw response
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    fn research_form(&self) -> FormData {
        FormData::new().field("research", &self.exposition)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Authenticate the session. The editor sets a session cookie and answers
    /// with an empty body; anything else is a failed login.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("logging in as {}", username);
        let body = self.transport.post(
            "/session/login",
            &FormData::new()
                .field("username", username)
                .field("password", password),
        )?;
        expect_empty(&body, "login")
    }

    /// Tear down the session
    pub fn logout(&mut self) -> Result<()> {
        debug!("logging out");
        self.transport.get("/session/logout", &[])?;
        Ok(())
    }

    // ========================================================================
    // Pages (weaves)
    // ========================================================================

    /// List the exposition's pages: page id → title
    pub fn page_list(&mut self) -> Result<BTreeMap<String, String>> {
        let body = self.transport.post("/editor/weaves", &self.research_form())?;
        Ok(scrape::list_pages(&body))
    }

    /// Create a page and return its identifier.
    ///
    /// `options` are extra option groups (`style`, `meta`, ...) flattened to
    /// the bracketed field convention; pass `&Default::default()` for none.
    pub fn page_add(
        &mut self,
        title: &str,
        description: Option<&str>,
        options: &OptionGroups,
    ) -> Result<String> {
        debug!("adding page {:?}", title);
        let mut form = self.research_form().bracketed2("meta", "title", "en", title);
        if let Some(description) = description {
            form = form.bracketed2("meta", "description", "en", description);
        }
        let body = self.transport.post("/weave/add", &form.groups(options))?;

        // The whole body is the new page id, and nothing but digits
        let id = body.trim();
        if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
            Ok(id.to_string())
        } else {
            Err(Error::remote("page_add failed"))
        }
    }

    /// Remove a page. Not idempotent: removing an unknown id fails remotely.
    pub fn page_remove(&mut self, page_id: &str) -> Result<()> {
        debug!("removing page {}", page_id);
        let body = self.transport.post(
            "/weave/remove",
            &FormData::new()
                .field("weave", page_id)
                .field("confirmation", "confirmation"),
        )?;
        expect_empty(&body, "page_remove")
    }

    /// Current option values of a page's edit form
    pub fn page_get(&mut self, page_id: &str) -> Result<ItemDetail> {
        let body = self.transport.get(
            "/weave/edit",
            &[
                ("research", self.exposition.clone()),
                ("weave", page_id.to_string()),
            ],
        )?;
        Ok(scrape::item_detail(&body))
    }

    /// Update a page's options via nested groups
    pub fn page_set(&mut self, page_id: &str, options: &OptionGroups) -> Result<()> {
        debug!("updating page {}", page_id);
        let form = self
            .research_form()
            .field("weave", page_id)
            .field("submitbutton", "submitbutton")
            .groups(options);
        let body = self.transport.post("/weave/edit", &form)?;
        expect_empty(&body, "page_set")
    }

    /// First page matching the name criterion, or `None`
    pub fn page_find(&mut self, name: &NameFilter) -> Result<Option<(String, String)>> {
        Ok(filter::find_first(&self.page_list()?, name, &NameFilter::Any))
    }

    // ========================================================================
    // Media sets (works)
    // ========================================================================

    /// List the exposition's media sets: set id → title
    pub fn mediaset_list(&mut self) -> Result<BTreeMap<String, String>> {
        let body = self.transport.post("/editor/works", &self.research_form())?;
        Ok(scrape::list_works(&body))
    }

    /// Create a media set and return its identifier.
    ///
    /// `genre` must come from [`crate::models::MEDIASET_GENRES`]; `date`
    /// defaults to today in the editor's `dd/mm/yyyy` form.
    pub fn mediaset_add(
        &mut self,
        title: &str,
        genre: &str,
        authors: &[&str],
        copyrightholder: &str,
        date: Option<&str>,
    ) -> Result<String> {
        validate_mediaset_genre(genre)?;
        debug!("adding media set {:?}", title);

        let date = date
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Local::now().format("%d/%m/%Y").to_string());
        let form = FormData::new()
            .bracketed2("meta", "title", "en", title)
            .bracketed("meta", "genre", genre)
            .bracketed("meta", "date", date)
            .bracketed_list("meta", "rcauthors", authors.iter().copied())
            .bracketed("meta", "copyrightholder", copyrightholder)
            .field("submitbutton", "submitbutton");
        let body = self.transport.post("/work/add", &form)?;

        let id = body.trim();
        if id.is_empty() {
            Err(Error::remote("mediaset_add failed"))
        } else {
            Ok(id.to_string())
        }
    }

    /// Remove a media set
    pub fn mediaset_remove(&mut self, mediaset_id: &str) -> Result<()> {
        debug!("removing media set {}", mediaset_id);
        let body = self.transport.post(
            "/work/remove",
            &self
                .research_form()
                .field("work[]", mediaset_id)
                .field("confirmation", "confirmation"),
        )?;
        expect_empty(&body, "mediaset_remove")
    }

    /// First media set matching the name criterion, or `None`
    pub fn mediaset_find(&mut self, name: &NameFilter) -> Result<Option<(String, String)>> {
        Ok(filter::find_first(
            &self.mediaset_list()?,
            name,
            &NameFilter::Any,
        ))
    }

    // ========================================================================
    // Media files
    // ========================================================================

    /// List media files: file id → (tool, title).
    ///
    /// With `mediaset_id` the set's children are listed (a JSON endpoint);
    /// without, the exposition's simple-media pool is listed. The simple-media
    /// listing needs a weave context and the editor uses the exposition's
    /// first page for it, so it fails when the exposition has no pages yet.
    pub fn media_list(&mut self, mediaset_id: Option<&str>) -> Result<BTreeMap<String, MediaEntry>> {
        match mediaset_id {
            Some(work) => {
                let body = self
                    .transport
                    .post("/editor/work-children", &self.research_form().field("work", work))?;
                let children: WorkChildren = serde_json::from_str(&body)?;
                Ok(children
                    .files
                    .into_iter()
                    .map(|f| {
                        (
                            f.id_string(),
                            MediaEntry {
                                tool: f.tool,
                                title: f.title,
                            },
                        )
                    })
                    .collect())
            }
            None => {
                let pages = self.page_list()?;
                let weave = pages.keys().next().cloned().ok_or_else(|| {
                    Error::remote("media_list requires at least one page in the exposition")
                })?;
                let body = self
                    .transport
                    .post("/simple-media/list", &self.research_form().field("weave", &weave))?;
                Ok(scrape::list_simple_media(&body))
            }
        }
    }

    /// Register a media file and return its identifier.
    ///
    /// `media_type` and `license` are validated against the closed
    /// vocabularies before any request is built. This only creates the
    /// metadata record with an empty placeholder; attach the actual bytes
    /// with [`media_upload`](Self::media_upload) afterwards.
    pub fn media_add(
        &mut self,
        name: &str,
        copyrightholder: &str,
        media_type: &str,
        license: &str,
        description: &str,
        mediaset_id: Option<&str>,
    ) -> Result<String> {
        validate_media_type(media_type)?;
        validate_license(license)?;
        debug!("adding media {:?} ({})", name, media_type);

        let mut form = self
            .research_form()
            .bracketed(media_type, "mediatype", media_type)
            .bracketed(media_type, "name", name)
            .bracketed(media_type, "copyrightholder", copyrightholder)
            .bracketed(media_type, "license", license)
            .bracketed(media_type, "description", description)
            .bracketed(media_type, "submitbutton", bracket_key(media_type, "submitbutton"))
            .field("iframe-submit", "true");

        let (path, simple) = match mediaset_id {
            Some(work) => {
                form = form.field("work", work);
                ("/work/upload-file", false)
            }
            None => ("/simple-media/add", true),
        };

        let body = self
            .transport
            .post_multipart(path, &form, FilePart::placeholder())?;
        let caps = media_id_re(simple)
            .captures(&body)
            .ok_or_else(|| Error::remote("media_add failed"))?;
        Ok(caps[1].to_string())
    }

    /// Remove a media file from the simple-media pool or from a set
    pub fn media_remove(&mut self, media_id: &str, mediaset_id: Option<&str>) -> Result<()> {
        debug!("removing media {}", media_id);
        let body = match mediaset_id {
            None => self.transport.post(
                "/simple-media/remove",
                &FormData::new()
                    .field("file[]", media_id)
                    .field("confirmation", "confirmation"),
            )?,
            Some(work) => self.transport.post(
                "/work/remove-file",
                &self
                    .research_form()
                    .field("work", work)
                    .field("file", media_id)
                    .field("confirmation", "confirmation"),
            )?,
        };
        expect_empty(&body, "media_remove")
    }

    /// Attach file bytes to a media record created by
    /// [`media_add`](Self::media_add).
    ///
    /// The content type comes from the file extension; unknown extensions
    /// fail with [`Error::UnknownFileType`] before anything is read or sent.
    pub fn media_upload(&mut self, media_id: &str, path: &Path) -> Result<()> {
        let kind = upload_kind_for(path)?;
        debug!("uploading {} as {}", path.display(), kind.mime);

        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let form = FormData::new()
            .field("file", media_id)
            .field("submit-async-file", "false")
            .field("iframe-submit", "true")
            // value shape taken from the editor's own upload form
            .bracketed(
                kind.media_type,
                "submitbutton",
                format!("{}image[submitbutton]", kind.media_type),
            );
        self.transport
            .post_multipart("/file/edit", &form, FilePart::new(file_name, bytes, kind.mime))?;
        Ok(())
    }

    /// First media file matching both criteria, or `None`
    pub fn media_find(
        &mut self,
        name: &NameFilter,
        tool: &NameFilter,
        mediaset_id: Option<&str>,
    ) -> Result<Option<(String, MediaEntry)>> {
        Ok(filter::find_first(&self.media_list(mediaset_id)?, name, tool))
    }

    // ========================================================================
    // Layout items
    // ========================================================================

    /// List the items placed on a page: item id → (tool, title)
    pub fn item_list(&mut self, page_id: &str) -> Result<BTreeMap<String, ItemEntry>> {
        let body = self
            .transport
            .post("/editor/content", &self.research_form().field("weave", page_id))?;
        Ok(scrape::list_items(&body))
    }

    /// Place a media file on a page and return the new item's identifier
    pub fn item_add(
        &mut self,
        page_id: &str,
        media_id: &str,
        rect: Rect,
        tool: &str,
    ) -> Result<String> {
        debug!("adding {} item to page {}", tool, page_id);
        let form = self
            .research_form()
            .field("weave", page_id)
            .field("tool", tool)
            .field("file", media_id)
            .field("left", rect.left)
            .field("top", rect.top)
            .field("width", rect.width)
            .field("height", rect.height);
        let body = self.transport.post("/item/add", &form)?;
        let caps = item_id_re()
            .captures(&body)
            .ok_or_else(|| Error::remote("item_add failed"))?;
        Ok(caps[1].to_string())
    }

    /// Fast positioning update for an item
    pub fn item_update(&mut self, item_id: &str, rect: Rect) -> Result<()> {
        debug!("repositioning item {}", item_id);
        let form = self
            .research_form()
            .bracketed("item", item_id, item_id)
            .bracketed("left", item_id, rect.left)
            .bracketed("top", item_id, rect.top)
            .bracketed("width", item_id, rect.width)
            .bracketed("height", item_id, rect.height)
            .bracketed("rotate", item_id, rect.rotate);
        let body = self.transport.post("/item/update", &form)?;
        expect_empty(&body, "item_update")
    }

    /// Lock or unlock an item against editing
    pub fn item_lock(&mut self, item_id: &str, lock: bool) -> Result<()> {
        debug!("setting lock of item {} to {}", item_id, lock);
        let form = FormData::new().bracketed("lock", item_id, if lock { 1 } else { 0 });
        let body = self.transport.post("/item/update-lock", &form)?;
        expect_empty(&body, "item_lock")
    }

    /// Tool name and current option values of an item's edit form
    pub fn item_get(&mut self, item_id: &str) -> Result<ItemDetail> {
        let body = self.transport.get(
            "/item/edit",
            &[
                ("research", self.exposition.clone()),
                ("item", item_id.to_string()),
            ],
        )?;
        Ok(scrape::item_detail(&body))
    }

    /// Update an item's options via nested groups.
    ///
    /// The editor expects at least `common[title]` and the full
    /// `style[left/top/width/height/rotate]` group in one submission.
    pub fn item_set(&mut self, item_id: &str, options: &OptionGroups) -> Result<()> {
        debug!("updating item {}", item_id);
        let form = self
            .research_form()
            .field("item", item_id)
            .field("submitbutton", "submitbutton")
            .groups(options);
        let body = self.transport.post("/item/edit", &form)?;
        expect_empty(&body, "item_set")
    }

    /// Remove an item from its page
    pub fn item_remove(&mut self, item_id: &str) -> Result<()> {
        debug!("removing item {}", item_id);
        let body = self.transport.post(
            "/item/remove",
            &self
                .research_form()
                .field("item[]", item_id)
                .field("confirmation", "confirmation"),
        )?;
        expect_empty(&body, "item_remove")
    }

    /// First item on a page matching both criteria, or `None`
    pub fn item_find(
        &mut self,
        page_id: &str,
        name: &NameFilter,
        tool: &NameFilter,
    ) -> Result<Option<(String, ItemEntry)>> {
        Ok(filter::find_first(&self.item_list(page_id)?, name, tool))
    }
}

/// Builder for configuring an [`RcClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured HTTP client. The client must keep a cookie store,
    /// otherwise the login session is lost between calls.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Override the editor origin
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client for an exposition
    pub fn build(self, exposition: impl Into<String>) -> Result<RcClient> {
        let http = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .cookie_store(true)
                .build()?,
        };
        Ok(RcClient {
            transport: Transport::new(http, self.base_url),
            exposition: exposition.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> RcClient {
        RcClient::builder()
            .base_url(server.url())
            .build("101")
            .expect("client builds")
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_login_ok_on_empty_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/session/login")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "ada".into()),
                Matcher::UrlEncoded("password".into(), "s3cret".into()),
            ]))
            .with_status(200)
            .with_body("")
            .create();

        let mut rc = client(&server);
        rc.login("ada", "s3cret").unwrap();
        mock.assert();
    }

    #[test]
    fn test_login_fails_on_nonempty_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/session/login")
            .with_status(200)
            .with_body("<html>wrong password</html>")
            .create();

        let mut rc = client(&server);
        let err = rc.login("ada", "wrong").unwrap_err();
        assert!(matches!(err, Error::Remote(_)));
        assert_eq!(err.to_string(), "login failed");
    }

    #[test]
    fn test_page_list_parses_rows() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/editor/weaves")
            .match_body(Matcher::UrlEncoded("research".into(), "101".into()))
            .with_status(200)
            .with_body(r#"<tr data-id="42"><td>x</td><td>Intro</td></tr>"#)
            .create();

        let mut rc = client(&server);
        let pages = rc.page_list().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages["42"], "Intro");
    }

    #[test]
    fn test_page_add_returns_digit_body() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/weave/add")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("research".into(), "101".into()),
                Matcher::UrlEncoded("meta[title][en]".into(), "New page".into()),
            ]))
            .with_status(200)
            .with_body("  7342\n")
            .create();

        let mut rc = client(&server);
        let id = rc.page_add("New page", None, &Default::default()).unwrap();
        assert_eq!(id, "7342");
        mock.assert();
    }

    #[test]
    fn test_page_add_rejects_non_numeric_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/weave/add")
            .with_status(200)
            .with_body("<html>login required</html>")
            .create();

        let mut rc = client(&server);
        let err = rc
            .page_add("New page", None, &Default::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "page_add failed");
    }

    #[test]
    fn test_page_remove_requires_empty_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/weave/remove")
            .with_status(200)
            .with_body("no such weave")
            .create();

        let mut rc = client(&server);
        let err = rc.page_remove("9999").unwrap_err();
        assert_eq!(err.to_string(), "page_remove failed");
    }

    #[test]
    fn test_media_add_validates_media_type_without_network() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let mut rc = client(&server);
        let err = rc
            .media_add("clip", "me", "video", "cc-by", "", None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidVocabulary { .. }));
        assert!(err.to_string().contains("video"));
        mock.assert();
    }

    #[test]
    fn test_media_add_validates_license_without_network() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let mut rc = client(&server);
        let err = rc
            .media_add("clip", "me", "image", "cc0", "", None)
            .unwrap_err();
        assert!(err.to_string().contains("cc0"));
        mock.assert();
    }

    #[test]
    fn test_mediaset_add_validates_genre_without_network() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let mut rc = client(&server);
        let err = rc
            .mediaset_add("My set", "mixtape", &["12"], "me", None)
            .unwrap_err();
        assert!(err.to_string().contains("mixtape"));
        mock.assert();
    }

    #[test]
    fn test_media_add_extracts_id_from_script_assignment() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/simple-media/add")
            .with_status(200)
            .with_body(
                "<script>parent.window.formAction = '/simple-media/edit?file=1234';</script>",
            )
            .create();

        let mut rc = client(&server);
        let id = rc
            .media_add("fig1", "me", "image", "cc-by", "", None)
            .unwrap();
        assert_eq!(id, "1234");
    }

    #[test]
    fn test_media_add_into_set_uses_work_edit_path() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/work/upload-file")
            .with_status(200)
            .with_body("<script>parent.window.formAction = '/file/edit?file=77';</script>")
            .create();

        let mut rc = client(&server);
        let id = rc
            .media_add("take", "me", "audio", "cc-by-nc-nd", "", Some("500"))
            .unwrap();
        assert_eq!(id, "77");
        mock.assert();
    }

    #[test]
    fn test_media_add_fails_when_no_id_in_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/simple-media/add")
            .with_status(200)
            .with_body("<html>quota exceeded</html>")
            .create();

        let mut rc = client(&server);
        let err = rc
            .media_add("fig1", "me", "image", "cc-by", "", None)
            .unwrap_err();
        assert_eq!(err.to_string(), "media_add failed");
    }

    #[test]
    fn test_media_upload_rejects_unknown_extension_locally() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create();

        let mut rc = client(&server);
        let err = rc
            .media_upload("1234", Path::new("clip.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFileType(_)));
        mock.assert();
    }

    #[test]
    fn test_media_list_uses_first_page_as_weave_context() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/editor/weaves")
            .with_status(200)
            .with_body(r#"<tr data-id="42"><td>x</td><td>Intro</td></tr>"#)
            .create();
        let media_mock = server
            .mock("POST", "/simple-media/list")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("research".into(), "101".into()),
                Matcher::UrlEncoded("weave".into(), "42".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"<tr class="simple-media" data-id="20" data-tool="picture">
                       <td>x</td><td>Fig1</td></tr>"#,
            )
            .create();

        let mut rc = client(&server);
        let media = rc.media_list(None).unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media["20"].tool, "picture");
        media_mock.assert();
    }

    #[test]
    fn test_media_list_fails_without_pages() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/editor/weaves")
            .with_status(200)
            .with_body("")
            .create();

        let mut rc = client(&server);
        let err = rc.media_list(None).unwrap_err();
        assert!(err.to_string().contains("at least one page"));
    }

    #[test]
    fn test_media_list_scoped_parses_json() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/editor/work-children")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("research".into(), "101".into()),
                Matcher::UrlEncoded("work".into(), "500".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"files": [{"id": 20, "tool": "picture", "title": "Fig1"}]}"#)
            .create();

        let mut rc = client(&server);
        let media = rc.media_list(Some("500")).unwrap();
        assert_eq!(media["20"].title, "Fig1");
    }

    #[test]
    fn test_item_add_extracts_data_id() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/item/add")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("weave".into(), "42".into()),
                Matcher::UrlEncoded("tool".into(), "picture".into()),
                Matcher::UrlEncoded("left".into(), "10".into()),
                Matcher::UrlEncoded("top".into(), "20".into()),
            ]))
            .with_status(200)
            .with_body(r#"<div data-id="88" data-tool="picture"></div>"#)
            .create();

        let mut rc = client(&server);
        let id = rc
            .item_add("42", "1234", Rect::new(10, 20, 300, 200), "picture")
            .unwrap();
        assert_eq!(id, "88");
        mock.assert();
    }

    #[test]
    fn test_item_update_uses_per_item_keys() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/item/update")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("item[88]".into(), "88".into()),
                Matcher::UrlEncoded("left[88]".into(), "15".into()),
                Matcher::UrlEncoded("rotate[88]".into(), "90".into()),
            ]))
            .with_status(200)
            .with_body("")
            .create();

        let mut rc = client(&server);
        rc.item_update("88", Rect::new(15, 20, 300, 200).rotated(90))
            .unwrap();
        mock.assert();
    }

    #[test]
    fn test_item_lock_sends_flag() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/item/update-lock")
            .match_body(Matcher::UrlEncoded("lock[88]".into(), "1".into()))
            .with_status(200)
            .with_body("")
            .create();

        let mut rc = client(&server);
        rc.item_lock("88", true).unwrap();
        mock.assert();
    }

    #[test]
    fn test_item_get_parses_edit_form() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/item/edit")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("research".into(), "101".into()),
                Matcher::UrlEncoded("item".into(), "88".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"<form title="edit picture tool">
                       <input name="style[left]" value="10">
                   </form>"#,
            )
            .create();

        let mut rc = client(&server);
        let detail = rc.item_get("88").unwrap();
        assert_eq!(detail.tool.as_deref(), Some("picture"));
        assert_eq!(detail.fields["style"]["left"], "10");
    }

    #[test]
    fn test_item_set_flattens_option_groups() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/item/edit")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("item".into(), "88".into()),
                Matcher::UrlEncoded("common[title]".into(), "Fig1".into()),
                Matcher::UrlEncoded("style[left]".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body("")
            .create();

        let mut options = OptionGroups::new();
        options
            .entry("common".to_string())
            .or_default()
            .insert("title".to_string(), "Fig1".to_string());
        options
            .entry("style".to_string())
            .or_default()
            .insert("left".to_string(), "10".to_string());

        let mut rc = client(&server);
        rc.item_set("88", &options).unwrap();
        mock.assert();
    }

    #[test]
    fn test_page_find_applies_filter() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/editor/weaves")
            .with_status(200)
            .with_body(concat!(
                r#"<tr data-id="10"><td>x</td><td>Introduction</td></tr>"#,
                r#"<tr data-id="11"><td>x</td><td>Methods</td></tr>"#,
            ))
            .create();

        let mut rc = client(&server);
        let hit = rc
            .page_find(&NameFilter::pattern("Meth").unwrap())
            .unwrap();
        assert_eq!(hit, Some(("11".to_string(), "Methods".to_string())));

        let miss = rc.page_find(&NameFilter::exact("Absent")).unwrap();
        assert!(miss.is_none());
    }

    // ========================================================================
    // Integration tests (real editor calls)
    //
    // Run with: cargo test -- --ignored
    // Needs RC_EXPOSITION, RC_USERNAME and RC_PASSWORD in the environment.
    // ========================================================================

    #[test]
    #[ignore = "Integration test - calls the live editor"]
    fn test_live_login_and_page_list() {
        let exposition = std::env::var("RC_EXPOSITION").expect("RC_EXPOSITION not set");
        let username = std::env::var("RC_USERNAME").expect("RC_USERNAME not set");
        let password = std::env::var("RC_PASSWORD").expect("RC_PASSWORD not set");

        let mut rc = RcClient::new(exposition).expect("client builds");
        rc.login(&username, &password).expect("login succeeds");

        let pages = rc.page_list().expect("page listing succeeds");
        println!("{} pages:", pages.len());
        for (id, title) in &pages {
            println!("  {} -> {}", id, title);
        }

        rc.logout().expect("logout succeeds");
    }
}
