//! Route discovery
//!
//! Walks the app directory and classifies every template file. Directory
//! names are route segments (`author/[slug]/page.rs`); the flat
//! `components/` directory at the app root holds shared components.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;
use trellis_router::{parse_route_dir, route_id, route_pattern, AppRouter, PathHierarchy, RouteSegment};
use walkdir::WalkDir;

use crate::error::{GenError, Result};
use crate::naming::{route_key, safe_identifier};

pub const COMPONENTS_DIR: &str = "components";

/// Role of a template file, from its file stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    Page,
    Layout,
    NotFound,
}

impl TemplateKind {
    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "page" => Some(TemplateKind::Page),
            "layout" => Some(TemplateKind::Layout),
            "not_found" => Some(TemplateKind::NotFound),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Page => "page",
            TemplateKind::Layout => "layout",
            TemplateKind::NotFound => "not_found",
        }
    }
}

/// One discovered template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// `author/[slug]`, `""` for root
    pub id: String,
    pub segments: Vec<RouteSegment>,
    pub kind: TemplateKind,
    /// Path relative to the app root, `/`-separated
    pub relative: String,
    /// Path on disk
    pub source: PathBuf,
    /// Generated module mounting the template: `r_page_author_param_slug`
    pub module: String,
}

impl RouteDefinition {
    pub fn pattern(&self) -> String {
        route_pattern(&self.segments)
    }

    pub fn key(&self) -> String {
        route_key(&self.segments)
    }
}

/// A template under the shared components directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedComponent {
    pub relative: String,
    pub source: PathBuf,
    /// `c_note_card`
    pub module: String,
}

/// Everything discovery found, in deterministic order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Page routes, most specific first
    pub pages: Vec<RouteDefinition>,
    /// Layouts keyed by route id
    pub layouts: BTreeMap<String, RouteDefinition>,
    /// Not-found templates keyed by route id
    pub not_founds: BTreeMap<String, RouteDefinition>,
    /// Sorted by module name
    pub components: Vec<SharedComponent>,
}

impl Manifest {
    /// Layouts wrapping `route`, root first
    ///
    /// Checks every path prefix of the route, so `author/[slug]` picks up
    /// layouts at `""`, `author`, and `author/[slug]`.
    pub fn layout_chain(&self, route: &RouteDefinition) -> Vec<&RouteDefinition> {
        let pattern = route.pattern();
        let mut prefixes: Vec<&str> = PathHierarchy::new(&pattern).collect();
        prefixes.reverse();
        prefixes
            .into_iter()
            .filter_map(|prefix| self.layouts.get(prefix.trim_start_matches('/')))
            .collect()
    }
}

/// Walks `app_root` and builds the route manifest
pub fn discover(app_root: &Path, template_ext: &str) -> Result<Manifest> {
    let mut manifest = Manifest::default();
    let mut modules: HashMap<String, String> = HashMap::new();
    let mut pages = Vec::new();

    let walker = WalkDir::new(app_root).min_depth(1).sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| GenError::Walk {
            path: app_root.to_path_buf(),
            source,
        })?;
        let relative = relative_slash_path(app_root, entry.path());
        let in_components = relative == COMPONENTS_DIR || relative.starts_with("components/");

        if entry.file_type().is_dir() {
            let name = entry.file_name().to_string_lossy();
            if in_components && entry.depth() > 1 {
                return Err(GenError::NestedComponentDir { path: relative });
            }
            if name == COMPONENTS_DIR && entry.depth() > 1 {
                return Err(GenError::RouteLocalComponent {
                    path: relative,
                    shared: format!("{}/{}", app_root.display(), COMPONENTS_DIR),
                });
            }
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(template_ext) {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();

        if in_components {
            let component = SharedComponent {
                module: format!("c_{}", safe_identifier(stem)),
                relative: relative.clone(),
                source: path.to_path_buf(),
            };
            claim_module(&mut modules, &component.module, &relative)?;
            manifest.components.push(component);
            continue;
        }

        let kind = TemplateKind::from_stem(stem).ok_or_else(|| GenError::UnsupportedTemplate {
            path: relative.clone(),
        })?;
        let dir = relative.rsplit_once('/').map_or("", |(dir, _)| dir);
        let segments = parse_route_dir(dir).map_err(|source| GenError::Segment {
            path: relative.clone(),
            source,
        })?;

        let route = RouteDefinition {
            id: route_id(&segments),
            module: format!("r_{}_{}", kind.as_str(), route_key(&segments)),
            kind,
            relative: relative.clone(),
            source: path.to_path_buf(),
            segments,
        };
        claim_module(&mut modules, &route.module, &relative)?;
        debug!(route = %route.id, kind = kind.as_str(), "discovered template");

        match kind {
            TemplateKind::Page => pages.push(route),
            TemplateKind::Layout => {
                manifest.layouts.insert(route.id.clone(), route);
            }
            TemplateKind::NotFound => {
                manifest.not_founds.insert(route.id.clone(), route);
            }
        }
    }

    if pages.is_empty() {
        return Err(GenError::NoPages(app_root.to_path_buf()));
    }

    // The router rejects structurally identical pages and fixes match order.
    let router = AppRouter::new(pages.iter().map(|page| page.relative.as_str()))?;
    let mut by_id: HashMap<String, RouteDefinition> = pages.into_iter().map(|page| (page.id.clone(), page)).collect();
    manifest.pages = router
        .routes()
        .iter()
        .filter_map(|route| by_id.remove(&route.id))
        .collect();

    manifest.components.sort_by(|a, b| a.module.cmp(&b.module));
    Ok(manifest)
}

fn claim_module(modules: &mut HashMap<String, String>, module: &str, relative: &str) -> Result<()> {
    if let Some(first) = modules.get(module) {
        return Err(GenError::ModuleConflict {
            module: module.to_string(),
            first: first.clone(),
            second: relative.to_string(),
        });
    }
    modules.insert(module.to_string(), relative.to_string());
    Ok(())
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
