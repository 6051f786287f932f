//! # `mapcat` main library
//!
//! This library reads, merges, and writes Quake III Arena map files in
//! the idTech3 brush format.  A map file is a list of entities, each
//! holding key/value pairs and any amount of solid geometry (planar
//! brushes and bicubic patches).
//!
//! ## Architecture
//!
//! Everything is built around the `map::Map` document:
//! * `map::Lexer` splits a byte stream into tokens the way the
//!   Radiant family of editors does, including the quote and comment
//!   quirks
//! * `map::parser` turns the token stream into a `Map`, discarding
//!   geometry textured with `common/discard` as it goes
//! * the merge pass folds several postprocessed maps into one master,
//!   combining their worldspawns and filtering per-map entities
//! * the writer serializes the master in the canonical layout accepted
//!   by the editors and by the q3map compilers
//!
//! The `commands` module runs the command line interface on top of
//! these pieces.

pub mod map;
pub mod commands;

type STDRESULT = Result<(),Box<dyn std::error::Error>>;
