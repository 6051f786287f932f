//! # Map writer
//!
//! Serializes a map in the canonical layout: the worldspawn as entity 0,
//! then the listed entities, each under a numbered comment banner.  All
//! structural braces and parentheses are set off with whitespace so the
//! output tokenizes back into exactly the tree it was written from, and
//! floats are written with six decimal places except the three trailing
//! integer fields of a face.

use std::io::{Write,BufWriter};
use std::fs::File;
use super::{Map,Entity,Brush,Face,Patch,Error};

fn write_face<W: Write>(out: &mut W, face: &Face) -> Result<(),Error> {
    for i in (0..9).step_by(3) {
        if i>0 {
            write!(out," ")?;
        }
        write!(out,"( {:.6} {:.6} {:.6} )",face.plane[i],face.plane[i+1],face.plane[i+2])?;
    }

    write!(out," {}",face.shader)?;

    for i in 0..5 {
        write!(out," {:.6}",face.texmap[i])?;
    }
    // the last three values are integers
    for i in 5..8 {
        write!(out," {:.0}",face.texmap[i])?;
    }

    writeln!(out)?;
    Ok(())
}

fn write_patch<W: Write>(out: &mut W, patch: &Patch) -> Result<(),Error> {
    writeln!(out,"patchDef2")?;
    writeln!(out,"{{")?;
    writeln!(out,"{}",patch.shader)?;
    writeln!(out,"( {} {} 0 0 0 )",patch.yres,patch.xres)?;
    writeln!(out,"(")?;
    for row in 0..patch.yres {
        write!(out,"(")?;
        for col in 0..patch.xres {
            let point = &patch.points[row*patch.xres+col];
            write!(out," ( {:.6} {:.6} {:.6} {:.6} {:.6} )",
                point[0],point[1],point[2],point[3],point[4])?;
        }
        writeln!(out," )")?;
    }
    writeln!(out,")")?;
    writeln!(out,"}}")?;
    Ok(())
}

fn write_entity<W: Write>(out: &mut W, entity: &Entity) -> Result<(),Error> {
    if let Some(classname) = &entity.classname {
        writeln!(out,"\"classname\" \"{}\"",classname)?;
    }

    for (key,value) in &entity.keys {
        writeln!(out,"\"{}\" \"{}\"",key,value)?;
    }

    for (counter,brush) in entity.brushes.iter().enumerate() {
        writeln!(out,"// brush {}",counter)?;
        writeln!(out,"{{")?;
        match brush {
            Brush::Faces(faces) => {
                for face in faces {
                    write_face(out,face)?;
                }
            },
            Brush::Patch(patch) => write_patch(out,patch)?
        }
        writeln!(out,"}}")?;
    }

    Ok(())
}

impl Map {
    /// Serialize the whole map.  Fails before anything is written if
    /// there is no worldspawn.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(),Error> {
        let ws = self.worldspawn.as_ref().ok_or(Error::MissingWorldspawn)?;

        writeln!(out,"// entity 0")?;
        writeln!(out,"{{")?;
        write_entity(out,ws)?;
        writeln!(out,"}}")?;

        // worldspawn is #0
        for (counter,entity) in self.entities.iter().enumerate() {
            writeln!(out,"// entity {}",counter+1)?;
            writeln!(out,"{{")?;
            write_entity(out,entity)?;
            writeln!(out,"}}")?;
        }

        Ok(())
    }
    /// Serialize to a file.  A map without a worldspawn is rejected
    /// before the file is created, so a failed save never truncates an
    /// existing file.
    pub fn write_file(&self, path: &str) -> Result<(),Error> {
        if self.worldspawn.is_none() {
            return Err(Error::MissingWorldspawn);
        }

        let fp = match File::create(path) {
            Ok(fp) => fp,
            Err(e) => return Err(Error::File { path: path.to_string(), source: e })
        };
        let mut out = BufWriter::new(fp);

        match self.write_to(&mut out).and_then(|_| Ok(out.flush()?)) {
            Ok(()) => Ok(()),
            Err(Error::Io(source)) => Err(Error::File { path: path.to_string(), source }),
            Err(e) => Err(e)
        }
    }
}
