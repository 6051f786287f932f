//! # Command Line Interface
//!
//! Argument handling lives here, the work is done in the `commands`
//! module.

use clap::{arg,crate_version,Command,ArgAction};
use clap::error::ErrorKind;
use env_logger;
use mapcat::commands;
use mapcat::commands::CommandError;

fn main() -> Result<(),Box<dyn std::error::Error>>
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"mapcat concatenates map files in the idTech3 brush format.
The worldspawn entities are folded into one, spawn and team entities
are kept only from the first input, and geometry textured with
common/discard is dropped.  Give a map the worldspawn key
mapcat_prefix to namespace its target and targetname values.
Set RUST_LOG environment variable to control logging level.
  levels: trace,debug,info,warn,error

Examples:
---------
merge two maps: `mapcat -o big.map arena.map annex.map`
quiet merge:    `mapcat -q -o big.map arena.map annex.map extra.map`
strip discards: `mapcat -o clean.map draft.map`";

    let main_cmd = Command::new("mapcat")
        .about("Concatenates Quake III map files into one.")
        .after_long_help(long_help)
        .version(crate_version!())
        .disable_version_flag(true)
        .arg(arg!(-v --version "print version and exit").action(ArgAction::Version))
        .arg(arg!(-q --quiet "suppress the statistics lines").action(ArgAction::SetTrue))
        .arg(arg!(-o --output <PATH> "path of the merged map to write").required(true).allow_hyphen_values(true))
        .arg(arg!(<input> ... "map files to concatenate"));

    let matches = match main_cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(e) if e.kind()==ErrorKind::DisplayHelp || e.kind()==ErrorKind::DisplayVersion => e.exit(),
        Err(e) => {
            eprintln!("{}",e);
            return Err(Box::new(CommandError::InvalidCommand));
        }
    };

    commands::cat::cat(&matches)
}
