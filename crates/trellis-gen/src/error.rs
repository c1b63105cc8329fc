use std::path::PathBuf;

use thiserror::Error;
use trellis_router::{RouterError, SegmentError};

/// Generation failures
///
/// Every variant is fatal: generation validates the whole tree before it
/// writes anything, so an error leaves previous output untouched.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("invalid route segment in {path}: {source}")]
    Segment {
        path: String,
        #[source]
        source: SegmentError,
    },

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("unsupported route template {path}: expected page, layout, or not_found")]
    UnsupportedTemplate { path: String },

    #[error("component directory {path} is inside a route; shared components belong in {shared}")]
    RouteLocalComponent { path: String, shared: String },

    #[error("nested component directory {path} is not supported; keep shared components flat")]
    NestedComponentDir { path: String },

    #[error("generated module {module} is produced by both {first} and {second}")]
    ModuleConflict {
        module: String,
        first: String,
        second: String,
    },

    #[error("no page templates found under {}", .0.display())]
    NoPages(PathBuf),

    #[error("required resolver contract missing for route {route}: {}", expected.display())]
    MissingResolverContract { route: String, expected: PathBuf },

    #[error("resolver contract {} must declare `pub type PageView = ...`", path.display())]
    MissingPageView { path: PathBuf },

    #[error("PageView in {} must come from the {namespace} module, found {found}", path.display())]
    UnqualifiedViewType {
        path: PathBuf,
        namespace: String,
        found: String,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("template {} must define `fn {function}`", path.display())]
    MissingTemplateFunction { path: PathBuf, function: &'static str },

    #[error("template {} must declare `fn {function}` with `pub` visibility", path.display())]
    PrivateTemplateFunction { path: PathBuf, function: &'static str },

    #[error("layout template {}: {reason}", path.display())]
    InvalidLayoutSignature { path: PathBuf, reason: String },

    #[error("not-found template {}: {reason}", path.display())]
    InvalidNotFoundSignature { path: PathBuf, reason: String },

    #[error("live route {route} needs an element with both id and data-signals in {}", path.display())]
    MissingLiveSelector { route: String, path: PathBuf },

    #[error("route {route} declares parameter {name:?} more than once")]
    DuplicateParam { route: String, name: String },

    #[error("layout wrapper {name} would wrap both {first} and {second}")]
    LayoutWrapperConflict {
        name: String,
        first: String,
        second: String,
    },

    #[error("refusing to clear {}: {} was not generated by trellis-gen", gen_root.display(), path.display())]
    ForeignFile { gen_root: PathBuf, path: PathBuf },

    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> GenError {
        let path = path.into();
        move |source| GenError::Io { path, source }
    }
}

pub type Result<T, E = GenError> = std::result::Result<T, E>;
