//! # trellis-gen
//!
//! Build-time compiler for trellis route trees.
//!
//! Given an app directory of route templates and a parallel directory of
//! resolver contracts, [`generate`] writes a route registry module:
//!
//! ```text
//! src/app/                      src/resolvers/              src/routes/ (generated)
//!   layout.rs                     root/types.rs               mod.rs
//!   page.rs                       notes/types.rs              contracts.rs
//!   notes/page.rs                 notes/param_slug/types.rs   registry.rs
//!   notes/[slug]/page.rs                                      resolvers.rs
//!   components/note_card.rs                                   rr_<route>.rs
//! ```
//!
//! Generation validates the whole tree before touching the output
//! directory. [`check`] runs the same pipeline and compares instead of
//! writing.

pub mod contract;
pub mod discovery;
pub mod emit;
mod error;
pub mod meta;
pub mod naming;

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

pub use discovery::{discover, Manifest, RouteDefinition, TemplateKind};
pub use emit::GENERATED_MARKER;
pub use error::{GenError, Result};
pub use meta::{RouteMeta, RoutePlan};

pub const DEFAULT_VIEW_MODEL_NAMESPACE: &str = "view_models";
pub const DEFAULT_APP_CONTEXT_TYPE: &str = "crate::AppContext";
pub const DEFAULT_TEMPLATE_EXT: &str = "rs";
pub const DEFAULT_LIVE_BAD_REQUEST_MESSAGE: &str = "invalid datastar signal payload";

/// Where to read from and write to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub app_root: PathBuf,
    pub resolver_root: PathBuf,
    pub gen_root: PathBuf,
    /// Module every `PageView` must come from
    pub view_model_namespace: String,
    /// Type path handed to resolvers as `AppContext`
    pub app_context_type: String,
    pub template_ext: String,
    pub live_bad_request_message: String,
}

impl GenerateOptions {
    pub fn new(app_root: impl Into<PathBuf>, resolver_root: impl Into<PathBuf>, gen_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            resolver_root: resolver_root.into(),
            gen_root: gen_root.into(),
            view_model_namespace: DEFAULT_VIEW_MODEL_NAMESPACE.to_string(),
            app_context_type: DEFAULT_APP_CONTEXT_TYPE.to_string(),
            template_ext: DEFAULT_TEMPLATE_EXT.to_string(),
            live_bad_request_message: DEFAULT_LIVE_BAD_REQUEST_MESSAGE.to_string(),
        }
    }

    pub fn with_view_model_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.view_model_namespace = namespace.into();
        self
    }

    pub fn with_app_context_type(mut self, type_path: impl Into<String>) -> Self {
        self.app_context_type = type_path.into();
        self
    }

    pub fn with_template_ext(mut self, ext: impl Into<String>) -> Self {
        self.template_ext = ext.into();
        self
    }

    pub fn with_live_bad_request_message(mut self, message: impl Into<String>) -> Self {
        self.live_bad_request_message = message.into();
        self
    }

    /// Same options with every root made absolute against the working directory
    fn absolute(&self) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(GenError::io("."))?;
        let resolve = |path: &Path| if path.is_absolute() { path.to_path_buf() } else { cwd.join(path) };
        Ok(Self {
            app_root: resolve(&self.app_root),
            resolver_root: resolve(&self.resolver_root),
            gen_root: resolve(&self.gen_root),
            ..self.clone()
        })
    }
}

/// Result of a [`generate`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub routes: usize,
    pub live_routes: usize,
    /// Files written to the gen root
    pub files: Vec<PathBuf>,
    /// Resolver stubs created for routes that had none
    pub stubs: Vec<PathBuf>,
}

/// Result of a [`check`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Generated files that are missing or differ from a fresh render
    pub stale: Vec<PathBuf>,
    /// Files in the gen root that generation would not produce
    pub unexpected: Vec<PathBuf>,
    /// Resolver stubs generation would create
    pub missing_stubs: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty() && self.unexpected.is_empty() && self.missing_stubs.is_empty()
    }
}

/// Rendered output, not yet written
struct Rendered {
    plan: RoutePlan,
    files: BTreeMap<String, String>,
    stubs: Vec<(PathBuf, String)>,
}

/// Discovers routes and resolves every contract without emitting code
pub fn plan(opts: &GenerateOptions) -> Result<RoutePlan> {
    let manifest = discover(&opts.app_root, &opts.template_ext)?;
    meta::build_plan(
        &manifest,
        &meta::PlanSettings {
            resolver_root: &opts.resolver_root,
            view_model_namespace: &opts.view_model_namespace,
            live_bad_request_message: &opts.live_bad_request_message,
        },
    )
}

fn render(opts: &GenerateOptions) -> Result<Rendered> {
    let plan = plan(opts)?;
    let ctx = emit::EmitContext {
        app_root: &opts.app_root,
        gen_root: &opts.gen_root,
        app_context_type: &opts.app_context_type,
    };
    let files = emit::render(&plan, &ctx);
    let stubs = plan
        .routes
        .iter()
        .filter(|route| !route.resolver_path.exists())
        .map(|route| (route.resolver_path.clone(), emit::render_stub(route)))
        .collect();
    Ok(Rendered { plan, files, stubs })
}

/// Regenerates the route registry
///
/// The gen root is cleared and rewritten, but only after the tree validated
/// and only if every file already in it carries [`GENERATED_MARKER`].
pub fn generate(opts: &GenerateOptions) -> Result<GenerationReport> {
    let opts = opts.absolute()?;
    let rendered = render(&opts)?;
    ensure_generated_only(&opts.gen_root)?;

    if opts.gen_root.exists() {
        fs::remove_dir_all(&opts.gen_root).map_err(GenError::io(&opts.gen_root))?;
    }
    fs::create_dir_all(&opts.gen_root).map_err(GenError::io(&opts.gen_root))?;

    let mut report = GenerationReport {
        routes: rendered.plan.routes.len(),
        live_routes: rendered.plan.routes.iter().filter(|route| route.is_live()).count(),
        ..GenerationReport::default()
    };

    for (name, contents) in &rendered.files {
        let path = opts.gen_root.join(name);
        fs::write(&path, contents).map_err(GenError::io(&path))?;
        debug!(file = %path.display(), "wrote generated file");
        report.files.push(path);
    }

    for (path, contents) in &rendered.stubs {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(GenError::io(parent))?;
        }
        fs::write(path, contents).map_err(GenError::io(path))?;
        info!(file = %path.display(), "created resolver stub");
        report.stubs.push(path.clone());
    }

    info!(
        routes = report.routes,
        live = report.live_routes,
        gen_root = %opts.gen_root.display(),
        "generated route registry"
    );
    Ok(report)
}

/// Compares what [`generate`] would write against the tree on disk
pub fn check(opts: &GenerateOptions) -> Result<CheckReport> {
    let opts = opts.absolute()?;
    let rendered = render(&opts)?;
    let mut report = CheckReport::default();

    for (name, contents) in &rendered.files {
        let path = opts.gen_root.join(name);
        match fs::read_to_string(&path) {
            Ok(existing) if existing == *contents => {}
            _ => report.stale.push(path),
        }
    }

    let expected: BTreeSet<PathBuf> = rendered.files.keys().map(|name| opts.gen_root.join(name)).collect();
    report.unexpected = existing_files(&opts.gen_root)?
        .into_iter()
        .filter(|path| !expected.contains(path))
        .collect();
    report.missing_stubs = rendered.stubs.into_iter().map(|(path, _)| path).collect();

    debug!(clean = report.is_clean(), "checked route registry");
    Ok(report)
}

fn existing_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| GenError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Refuses to clear a directory holding anything generation did not write
fn ensure_generated_only(gen_root: &Path) -> Result<()> {
    for path in existing_files(gen_root)? {
        let generated = fs::read_to_string(&path)
            .map(|contents| contents.starts_with(GENERATED_MARKER))
            .unwrap_or(false);
        if !generated {
            return Err(GenError::ForeignFile {
                gen_root: gen_root.to_path_buf(),
                path,
            });
        }
    }
    Ok(())
}
