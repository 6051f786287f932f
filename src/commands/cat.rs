//! # The `cat` operation
//!
//! Reads every input map, postprocesses it, folds it into the running
//! master map, and saves the result.  The statistics lines name the
//! file they describe, with the postprocessed counts for each input and
//! the summed counts for the output.

use clap;
use log::{info,error};
use super::CommandError;
use crate::map::Map;
use crate::STDRESULT;

const RCH: &str = "unreachable was reached";

pub fn cat(cmd: &clap::ArgMatches) -> STDRESULT {
    let output = cmd.get_one::<String>("output").expect(RCH);
    let quiet = cmd.get_flag("quiet");

    let mut master = Map::new();
    for (counter,path) in cmd.get_many::<String>("input").expect(RCH).enumerate() {
        info!("reading {}",path);
        let mut map = match Map::read_file(path) {
            Ok(map) => map,
            Err(e) => {
                error!("{}",e);
                return Err(Box::new(CommandError::LoadFailed));
            }
        };
        map.postprocess(counter==0);
        if !quiet {
            println!("{}",map.stats(path));
        }
        master.merge(map);
    }

    if let Err(e) = master.write_file(output) {
        error!("{}",e);
        return Err(Box::new(CommandError::SaveFailed));
    }
    if !quiet {
        println!("{}",master.stats(output));
    }
    Ok(())
}
