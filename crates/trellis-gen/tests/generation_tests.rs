use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trellis_gen::{check, generate, GenError, GenerateOptions, GENERATED_MARKER};
use trellis_router::{RouterError, SegmentError};

const PAGE: &str = r#"use maud::{html, Markup};

pub fn page(view: &crate::view_models::PageModel) -> Markup {
    html! { h1 { (view.title) } }
}
"#;

const LIVE_PAGE: &str = r#"use maud::{html, Markup};

pub fn page(view: &crate::view_models::NoteView) -> Markup {
    html! {
        div id="results" data-signals="{}" {
            (view.body)
        }
    }
}
"#;

const LAYOUT: &str = r#"use maud::{html, Markup};

pub fn layout(view: &impl trellis::LayoutView, child: Markup) -> Markup {
    html! { main { h1 { (view.title()) } (child) } }
}
"#;

const NOT_FOUND: &str = r#"use maud::{html, Markup};

pub fn not_found(path: &str) -> Markup {
    html! { p { "nothing at " (path) } }
}
"#;

const CONTRACT: &str = "pub type PageView = crate::view_models::PageModel;\n";

const LIVE_CONTRACT: &str = r#"use serde::{Deserialize, Serialize};

pub type PageView = crate::view_models::NoteView;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LiveState {
    pub query: String,
}
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn page(&self, route_dir: &str, resolver_dir: &str) -> &Self {
        let template = if route_dir.is_empty() {
            "src/app/page.rs".to_string()
        } else {
            format!("src/app/{route_dir}/page.rs")
        };
        self.write(&template, PAGE)
            .write(&format!("src/resolvers/{resolver_dir}/types.rs"), CONTRACT)
    }

    fn options(&self) -> GenerateOptions {
        GenerateOptions::new(
            self.root().join("src/app"),
            self.root().join("src/resolvers"),
            self.root().join("src/routes"),
        )
    }

    fn gen_root(&self) -> PathBuf {
        self.root().join("src/routes")
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }

    fn generated(&self) -> BTreeMap<String, String> {
        fs::read_dir(self.gen_root())
            .unwrap()
            .map(|entry| {
                let entry = entry.unwrap();
                let name = entry.file_name().to_string_lossy().into_owned();
                (name, fs::read_to_string(entry.path()).unwrap())
            })
            .collect()
    }
}

fn blog() -> Fixture {
    let fixture = Fixture::new();
    fixture
        .page("", "root")
        .page("notes", "notes")
        .page("author/settings", "author/settings")
        .page("author/[slug]", "author/param_slug")
        .write("src/app/layout.rs", LAYOUT)
        .write("src/app/notes/layout.rs", LAYOUT)
        .write("src/app/not_found.rs", NOT_FOUND)
        .write("src/app/notes/not_found.rs", NOT_FOUND)
        .write("src/app/components/note_card.rs", "pub fn note_card() {}\n")
        .write("src/app/notes/[slug]/page.rs", LIVE_PAGE)
        .write("src/resolvers/notes/param_slug/types.rs", LIVE_CONTRACT);
    fixture
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{haystack}"))
}

#[test]
fn test_generation_is_deterministic() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let first = fixture.generated();
    generate(&fixture.options()).unwrap();
    let second = fixture.generated();

    assert_eq!(first, second);
    assert!(first.values().all(|contents| contents.starts_with(GENERATED_MARKER)));
    assert!(first.contains_key("rr_notes_param_slug.rs"));
}

#[test]
fn test_generated_files() {
    let fixture = blog();
    let report = generate(&fixture.options()).unwrap();

    assert_eq!(report.routes, 5);
    assert_eq!(report.live_routes, 1);
    let names: Vec<String> = fixture.generated().into_keys().collect();
    assert_eq!(
        names,
        vec![
            "contracts.rs",
            "mod.rs",
            "registry.rs",
            "resolvers.rs",
            "rr_author_param_slug.rs",
            "rr_author_settings.rs",
            "rr_notes.rs",
            "rr_notes_param_slug.rs",
            "rr_root.rs",
        ]
    );
}

#[test]
fn test_mod_mounts_templates_relative_to_gen_root() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let module = fixture.read("src/routes/mod.rs");

    assert!(module.contains("#[path = \"../app/notes/[slug]/page.rs\"]\npub mod r_page_notes_param_slug;"));
    assert!(module.contains("#[path = \"../app/components/note_card.rs\"]\npub mod c_note_card;"));
    assert!(module.contains("pub mod rr_root;"));
    assert!(module.contains("pub use registry::{handlers, not_found_page};"));

    let route = fixture.read("src/routes/rr_notes_param_slug.rs");
    assert!(route.contains("#[path = \"../resolvers/notes/param_slug/types.rs\"]\nmod types;"));
    assert!(route.contains("pub use super::contracts::NotesParamSlugParams as Params;"));
    assert!(route.contains("fn parse_live_state("));
}

#[test]
fn test_contracts_output() {
    let fixture = Fixture::new();
    fixture.page("", "root").page("notes/[slug]", "notes/param_slug");
    generate(&fixture.options()).unwrap();

    let expected = format!(
        r#"{GENERATED_MARKER}
//! Route params and the resolver capability every route loads through.

/// Shared application context handed to every resolver
pub type AppContext = crate::AppContext;

/// Params for `/`
pub type RootParams = trellis::EmptyParams;

/// Params for `/notes/[slug]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesParamSlugParams {{
    pub slug: String,
}}

#[trellis::async_trait]
pub trait RouteResolvers: Send + Sync + 'static {{
    async fn resolve_root_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: RootParams,
    ) -> trellis::anyhow::Result<super::rr_root::PageView>;

    async fn resolve_notes_param_slug_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: NotesParamSlugParams,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::PageView>;
}}
"#
    );
    assert_eq!(fixture.read("src/routes/contracts.rs"), expected);
}

#[test]
fn test_static_route_registered_before_dynamic() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let registry = fixture.read("src/routes/registry.rs");

    let handlers = &registry[position(&registry, "pub fn handlers")..];
    assert!(position(handlers, "// /author/settings\n") < position(handlers, "// /author/[slug]\n"));
    assert!(position(handlers, "// /notes/[slug]\n") < position(handlers, "// /notes\n"));
    assert!(position(handlers, "// /notes\n") < position(handlers, "// /\n"));
}

#[test]
fn test_live_route_wiring() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let registry = fixture.read("src/routes/registry.rs");

    assert!(registry.contains("pub fn parse_notes_param_slug_live_params(path: &str)"));
    assert!(registry.contains(r#"match_path_pattern("/notes/[slug]/live", path)?"#));
    assert!(registry.contains(r#"selector_id: "results".to_string(),"#));
    assert!(registry.contains(r#"bad_request_message: "invalid datastar signal payload".to_string(),"#));
    assert_eq!(registry.matches("trellis::PageAndLiveRouteHandler").count(), 1);
    assert_eq!(registry.matches("trellis::PageOnlyRouteHandler").count(), 4);
}

#[test]
fn test_slug_params_are_validated() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let registry = fixture.read("src/routes/registry.rs");

    let parser = &registry[position(&registry, "pub fn parse_author_param_slug_params")..];
    let parser = &parser[..position(parser, "\n}\n")];
    assert!(parser.contains(r#"slug: captured.remove("slug")?,"#));
    assert!(parser.contains("trellis::router::is_valid_slug(&params.slug)"));
}

#[test]
fn test_layout_chain_outermost_first() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let registry = fixture.read("src/routes/registry.rs");

    assert!(registry.contains(
        "fn wrap_notes_param_slug_with_root_layout(view: &super::rr_notes_param_slug::PageView, child: Markup) -> Markup {\n    super::r_layout_root::layout(view, child)\n}"
    ));
    let handlers = &registry[position(&registry, "pub fn handlers")..];
    assert!(
        position(handlers, "wrap_notes_param_slug_with_root_layout as")
            < position(handlers, "wrap_notes_param_slug_with_notes_layout as")
    );
    assert!(!handlers.contains("wrap_author_settings_with_notes_layout"));
}

#[test]
fn test_not_found_pages_most_specific_first() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let registry = fixture.read("src/routes/registry.rs");

    assert!(
        position(&registry, r#"match_path_prefix("/notes", path)"#)
            < position(&registry, r#"match_path_prefix("/", path)"#)
    );
    assert!(registry.contains("return Some(super::r_not_found_notes::not_found(path));"));
}

#[test]
fn test_missing_contract_names_expected_path() {
    let fixture = Fixture::new();
    fixture.page("", "root").write("src/app/notes/page.rs", PAGE);

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::MissingResolverContract { ref route, .. } if route == "/notes"));
    let message = err.to_string();
    assert!(message.contains("notes"), "{message}");
    assert!(message.contains("types.rs"), "{message}");
    assert!(!fixture.gen_root().exists());
}

#[test]
fn test_missing_page_view() {
    let fixture = Fixture::new();
    fixture
        .write("src/app/page.rs", PAGE)
        .write("src/resolvers/root/types.rs", "pub struct Unrelated;\n");

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::MissingPageView { .. }));
    assert!(err.to_string().contains("PageView"));
}

#[test]
fn test_unqualified_view_type() {
    let fixture = Fixture::new();
    fixture
        .write("src/app/page.rs", PAGE)
        .write("src/resolvers/root/types.rs", "pub type PageView = PageModel;\n");

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::UnqualifiedViewType { ref found, .. } if found == "PageModel"));
}

#[test]
fn test_live_route_needs_selector() {
    let fixture = Fixture::new();
    fixture
        .write("src/app/page.rs", PAGE)
        .write("src/resolvers/root/types.rs", LIVE_CONTRACT);

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::MissingLiveSelector { .. }));
}

#[test]
fn test_conflicting_params_fail_before_writing() {
    let fixture = Fixture::new();
    fixture
        .page("author/[slug]", "author/param_slug")
        .page("author/[id]", "author/param_id")
        .write("src/routes/mod.rs", &format!("{GENERATED_MARKER}\n// previous output\n"));

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::Router(RouterError::PatternConflict { .. })));
    assert_eq!(
        fixture.read("src/routes/mod.rs"),
        format!("{GENERATED_MARKER}\n// previous output\n")
    );
}

#[test]
fn test_legacy_wildcard_directory() {
    let fixture = Fixture::new();
    fixture.write("src/app/author/_slug/page.rs", PAGE);

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(
        err,
        GenError::Segment {
            source: SegmentError::LegacyWildcardSyntax(_),
            ..
        }
    ));
}

#[test]
fn test_components_inside_route_rejected() {
    let fixture = Fixture::new();
    fixture
        .page("notes", "notes")
        .write("src/app/notes/components/card.rs", "pub fn card() {}\n");

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::RouteLocalComponent { ref path, .. } if path == "notes/components"));
    assert!(err.to_string().contains("components"));
}

#[test]
fn test_unsupported_template_name() {
    let fixture = Fixture::new();
    fixture.page("", "root").write("src/app/sidebar.rs", PAGE);

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::UnsupportedTemplate { ref path } if path == "sidebar.rs"));
}

#[test]
fn test_invalid_layout_rejected() {
    let fixture = Fixture::new();
    fixture.page("", "root").write(
        "src/app/layout.rs",
        "pub fn layout(view: &crate::view_models::PageModel, child: Markup) -> Markup { child }\n",
    );

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::InvalidLayoutSignature { .. }));
}

#[test]
fn test_stub_written_only_when_missing() {
    let fixture = Fixture::new();
    fixture.page("", "root").page("notes/[slug]", "notes/param_slug");

    let report = generate(&fixture.options()).unwrap();
    assert_eq!(report.stubs.len(), 2);

    let stub = fixture.read("src/resolvers/notes/param_slug/resolver.rs");
    assert!(!stub.starts_with(GENERATED_MARKER));
    assert!(stub.contains(r#"bail!("TODO: implement resolve_page for route /notes/[slug]")"#));

    fixture.write("src/resolvers/notes/param_slug/resolver.rs", "// hand-written\n");
    let report = generate(&fixture.options()).unwrap();
    assert!(report.stubs.is_empty());
    assert_eq!(fixture.read("src/resolvers/notes/param_slug/resolver.rs"), "// hand-written\n");
}

#[test]
fn test_live_stub_covers_live_methods() {
    let fixture = blog();
    generate(&fixture.options()).unwrap();
    let stub = fixture.read("src/resolvers/notes/param_slug/resolver.rs");

    assert!(stub.contains("use super::{AppContext, PageView, Params, LiveState};"));
    assert!(stub.contains("TODO: implement parse_live_state for route /notes/[slug]"));
    assert!(stub.contains("TODO: implement resolve_live for route /notes/[slug]"));
}

#[test]
fn test_check_reports_drift() {
    let fixture = blog();
    let before = check(&fixture.options()).unwrap();
    assert!(!before.is_clean());
    assert_eq!(before.missing_stubs.len(), 5);

    generate(&fixture.options()).unwrap();
    assert!(check(&fixture.options()).unwrap().is_clean());

    fixture.write("src/routes/registry.rs", &format!("{GENERATED_MARKER}\n"));
    fixture.write("src/routes/rr_gone.rs", &format!("{GENERATED_MARKER}\n"));
    let report = check(&fixture.options()).unwrap();
    assert_eq!(report.stale, vec![fixture.gen_root().join("registry.rs")]);
    assert_eq!(report.unexpected, vec![fixture.gen_root().join("rr_gone.rs")]);
    assert!(report.missing_stubs.is_empty());
}

#[test]
fn test_committed_fixture_is_current() {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixture");
    let opts = GenerateOptions::new(fixture.join("app"), fixture.join("resolvers"), fixture.join("routes"));

    let report = check(&opts).unwrap();
    assert!(report.is_clean(), "{report:?}");
}

#[test]
fn test_foreign_files_block_generation() {
    let fixture = blog();
    fixture.write("src/routes/handwritten.rs", "pub fn keep_me() {}\n");

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::ForeignFile { .. }));
    assert!(fixture.gen_root().join("handwritten.rs").exists());
}

#[test]
fn test_no_pages() {
    let fixture = Fixture::new();
    fixture.write("src/app/layout.rs", LAYOUT);
    assert!(matches!(generate(&fixture.options()), Err(GenError::NoPages(_))));
}

#[test]
fn test_routes_with_same_type_name_rejected() {
    let fixture = Fixture::new();
    fixture.page("aB", "aB").page("a-b", "a-b");

    let err = generate(&fixture.options()).unwrap_err();
    assert!(matches!(err, GenError::ModuleConflict { ref module, .. } if module == "ABParams"));
    assert!(!fixture.gen_root().exists());
}

#[test]
fn test_path_keyword_params_use_plain_fields() {
    let fixture = Fixture::new();
    fixture.page("x/[self]", "x/param_self");
    generate(&fixture.options()).unwrap();

    let contracts = fixture.read("src/routes/contracts.rs");
    assert!(contracts.contains("pub self_: String,"));
    assert!(!contracts.contains("r#self"));

    let registry = fixture.read("src/routes/registry.rs");
    assert!(!registry.contains("r#self"));
    assert!(registry.contains("self_"));
}
