//! # Map documents
//!
//! This module holds the in-memory form of a Quake III map file and the
//! machinery to build it: a tokenizer (`lexer`), a recursive descent
//! parser (`parser`), the merge and postprocess pass, and the writer.
//!
//! A map file is a list of entities.  Each entity carries key/value
//! strings and any number of brushes, where a brush is either a list of
//! planar faces or one bicubic patch.  The `worldspawn` entity is
//! special: it holds the static world geometry, there can be at most one
//! per map, and a map cannot be written without it.

pub mod lexer;
pub mod parser;
mod merge;
mod writer;

pub use lexer::Lexer;

/// Brushes textured with this shader are dropped during parsing.
pub const DISCARD_SHADER: &str = "common/discard";

#[derive(thiserror::Error,Debug)]
pub enum Error {
    #[error("{path}: {source}")]
    File { path: String, source: std::io::Error },
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{path}:{line}:{column}: expected {expected}, got {found}")]
    Syntax { path: String, line: usize, column: usize, expected: String, found: String },
    #[error("{path}:{line}:{column}: this entity is a worldspawn, but a worldspawn was already read earlier")]
    DuplicateWorldspawn { path: String, line: usize, column: usize },
    #[error("worldspawn is missing")]
    MissingWorldspawn
}

/// One bounding plane of a brush: three points spanning the plane,
/// a shader name, and the texture mapping parameters.
#[derive(Clone,Debug,PartialEq)]
pub struct Face {
    /// three 3-d points, row major
    pub plane: [f32;9],
    pub shader: String,
    /// shift x/y, rotation, scale x/y, then the three integer valued
    /// contents/surface/value flags
    pub texmap: [f32;8]
}

/// A bicubic patch: control points on an `xres` by `yres` grid.
#[derive(Clone,Debug,PartialEq)]
pub struct Patch {
    pub shader: String,
    /// points per row
    pub xres: usize,
    /// number of rows, written first in the file header
    pub yres: usize,
    /// `xres * yres` points, row major, each `x y z u v`
    pub points: Vec<[f32;5]>
}

/// A solid is either planar faces or one patch, never both.
#[derive(Clone,Debug,PartialEq)]
pub enum Brush {
    Faces(Vec<Face>),
    Patch(Patch)
}

#[derive(Clone,Debug,PartialEq)]
pub struct Entity {
    /// stored separately from the other keys for easier access later
    pub classname: Option<String>,
    /// every key/value pair except `classname`, in file order
    pub keys: Vec<(String,String)>,
    pub brushes: Vec<Brush>
}

impl Entity {
    pub fn new() -> Self {
        Self {
            classname: None,
            keys: Vec::new(),
            brushes: Vec::new()
        }
    }
}

/// A fully parsed map file, or the running result of merging several.
///
/// The counters track what was kept and what was dropped across parsing
/// and postprocessing; merging sums them field-wise.
#[derive(Clone,Debug,PartialEq)]
pub struct Map {
    pub worldspawn: Option<Entity>,
    pub entities: Vec<Entity>,
    /// does not include the worldspawn
    pub num_entities: usize,
    pub num_discarded_entities: usize,
    pub num_brushes: usize,
    pub num_discarded_brushes: usize,
    pub num_patches: usize,
    pub num_discarded_patches: usize
}

impl Map {
    pub fn new() -> Self {
        Self {
            worldspawn: None,
            entities: Vec::new(),
            num_entities: 0,
            num_discarded_entities: 0,
            num_brushes: 0,
            num_discarded_brushes: 0,
            num_patches: 0,
            num_discarded_patches: 0
        }
    }
    /// Parse one map file.  Any grammar violation aborts the whole file,
    /// nothing of it is kept.
    pub fn read_file(path: &str) -> Result<Self,Error> {
        let mut lexer = Lexer::open(path)?;
        parser::parse(&mut lexer)
    }
    /// One line of statistics in the form
    /// `PATH: N entities (N discarded), N brushes (N discarded), N patches (N discarded)`.
    /// The entity count includes the worldspawn.
    pub fn stats(&self, path: &str) -> String {
        let entities = self.num_entities + match self.worldspawn { Some(_) => 1, None => 0 };
        format!("{}: {} entit{} ({} discarded), {} brush{} ({} discarded), {} patch{} ({} discarded)",
            path,
            entities,if entities==1 {"y"} else {"ies"},
            self.num_discarded_entities,
            self.num_brushes,if self.num_brushes==1 {""} else {"es"},
            self.num_discarded_brushes,
            self.num_patches,if self.num_patches==1 {""} else {"es"},
            self.num_discarded_patches)
    }
}
