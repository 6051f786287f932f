//! # Map parser
//!
//! Recursive descent over the token stream.  Each production consumes
//! exactly the tokens it expects and the first mismatch aborts the whole
//! file, so a failed parse never yields a partial map.  The one
//! recoverable condition is a repeated `classname` inside an entity,
//! which is warned about and overwritten.

use std::io::Read;
use log::warn;
use super::{Lexer,Error,Map,Entity,Brush,Face,Patch,DISCARD_SHADER};

/// Parse a whole document: any number of entities down to the end of
/// the stream.
pub fn parse<R: Read>(lexer: &mut Lexer<R>) -> Result<Map,Error> {
    let mut map = Map::new();
    while lexer.expect_or_eof("{","the beginning of an entity")? {
        parse_entity(lexer,&mut map)?;
    }
    Ok(map)
}

fn parse_entity<R: Read>(lexer: &mut Lexer<R>, map: &mut Map) -> Result<(),Error> {
    let mut entity = Entity::new();

    // keys and values, up to the first brush or the end of the entity
    let mut more_brushes = loop {
        let tok = lexer.require("a key or the beginning of a brush \"{\" or the end of this entity \"}\"")?;
        match tok.as_str() {
            "{" => break true,
            "}" => break false,
            _ => parse_key(lexer,&mut entity,&tok)?
        }
    };

    // the opening brace of the first brush was consumed by the key loop
    while more_brushes {
        parse_brush(lexer,map,&mut entity)?;
        let tok = lexer.require("the beginning of a brush \"{\" or the end of this entity \"}\"")?;
        more_brushes = match tok.as_str() {
            "{" => true,
            "}" => false,
            _ => return Err(lexer.err_expected("the beginning of a brush \"{\" or the end of this entity \"}\"",Some(&tok)))
        };
    }

    if entity.classname.as_deref()==Some("worldspawn") {
        if map.worldspawn.is_some() {
            let (line,column) = lexer.token_position();
            return Err(Error::DuplicateWorldspawn {
                path: lexer.path().to_string(),
                line,
                column
            });
        }
        map.worldspawn = Some(entity);
    } else {
        map.entities.push(entity);
        map.num_entities += 1;
    }
    Ok(())
}

fn parse_key<R: Read>(lexer: &mut Lexer<R>, entity: &mut Entity, key: &str) -> Result<(),Error> {
    // classnames are stored separately for easier access later
    if key=="classname" {
        if entity.classname.is_some() {
            let (line,column) = lexer.token_position();
            warn!("{}:{}:{}: duplicate classname",lexer.path(),line,column);
        }
        entity.classname = Some(lexer.require("the classname")?);
        return Ok(());
    }
    let value = lexer.require("the key value")?;
    entity.keys.push((key.to_string(),value));
    Ok(())
}

fn parse_brush<R: Read>(lexer: &mut Lexer<R>, map: &mut Map, entity: &mut Entity) -> Result<(),Error> {
    const FIRST: &str = "the beginning of a face \"(\" or a patch \"patchDef2\" or the end of this brush \"}\"";
    const REST: &str = "the beginning of a face \"(\" or the end of this brush \"}\"";

    let mut tok = lexer.require(FIRST)?;
    if tok=="patchDef2" {
        let patch = parse_patch(lexer)?;
        lexer.expect("}","the end of this brush")?;
        if patch.shader==DISCARD_SHADER {
            map.num_discarded_patches += 1;
        } else {
            map.num_patches += 1;
            entity.brushes.push(Brush::Patch(patch));
        }
        return Ok(());
    }

    let mut faces: Vec<Face> = Vec::new();
    loop {
        match tok.as_str() {
            "(" => faces.push(parse_face(lexer)?),
            "}" => break,
            _ => return Err(lexer.err_expected(if faces.is_empty() {FIRST} else {REST},Some(&tok)))
        }
        tok = lexer.require(REST)?;
    }

    // one discard face drops the whole brush
    if faces.iter().any(|face| face.shader==DISCARD_SHADER) {
        map.num_discarded_brushes += 1;
    } else {
        map.num_brushes += 1;
        entity.brushes.push(Brush::Faces(faces));
    }
    Ok(())
}

fn parse_face<R: Read>(lexer: &mut Lexer<R>) -> Result<Face,Error> {
    let mut plane = [0.0f32;9];
    let mut texmap = [0.0f32;8];

    lexer.next_floats(&mut plane[0..3])?;
    lexer.expect(")","the end of this face's 1st vector")?;
    lexer.expect("(","the beginning of this face's 2nd vector")?;
    lexer.next_floats(&mut plane[3..6])?;
    lexer.expect(")","the end of this face's 2nd vector")?;
    lexer.expect("(","the beginning of this face's 3rd vector")?;
    lexer.next_floats(&mut plane[6..9])?;
    lexer.expect(")","the end of this face's 3rd vector")?;

    let shader = lexer.require("a shader name")?;
    lexer.next_floats(&mut texmap)?;

    Ok(Face { plane, shader, texmap })
}

fn parse_patch<R: Read>(lexer: &mut Lexer<R>) -> Result<Patch,Error> {
    lexer.expect("{","the beginning of this patch")?;
    let shader = lexer.require("a shader name")?;

    // the header holds the row count, the row length, and three literal
    // zeros that carry no information but must be present
    lexer.expect("(","the beginning of this patch's header")?;
    let yres = lexer.next_usize("a grid dimension")?;
    let xres = lexer.next_usize("a grid dimension")?;
    for _ in 0..3 {
        lexer.expect("0","a literal zero")?;
    }
    lexer.expect(")","the end of this patch's header")?;

    lexer.expect("(","the beginning of the point grid")?;
    let mut points: Vec<[f32;5]> = Vec::new();
    for _ in 0..yres {
        lexer.expect("(","the beginning of a grid row")?;
        for _ in 0..xres {
            lexer.expect("(","the beginning of a grid point")?;
            let mut point = [0.0f32;5];
            lexer.next_floats(&mut point)?;
            lexer.expect(")","the end of this grid point")?;
            points.push(point);
        }
        lexer.expect(")","the end of this grid row")?;
    }
    lexer.expect(")","the end of the point grid")?;
    lexer.expect("}","the end of this patch")?;

    Ok(Patch { shader, xres, yres, points })
}
