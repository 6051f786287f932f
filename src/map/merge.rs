//! # Merging and postprocessing
//!
//! Postprocessing runs on every freshly parsed map before it is merged:
//! it strips entities that only make sense in the first input, pulls the
//! `mapcat_prefix` directive out of the worldspawn, and rewrites target
//! references with that prefix.  Merging then folds the postprocessed
//! map into the running master.

use log::debug;
use super::{Map,Entity};

/// worldspawn key that requests target renaming for its own file
const PREFIX_KEY: &str = "mapcat_prefix";

fn is_first_map_only(entity: &Entity) -> bool {
    match &entity.classname {
        Some(name) => name.starts_with("team_") || name.starts_with("info_"),
        None => false
    }
}

fn rewrite_targets(entity: &mut Entity, prefix: &str) {
    for (key,value) in entity.keys.iter_mut() {
        if key=="target" || key=="targetname" {
            value.insert_str(0,prefix);
        }
    }
}

impl Map {
    /// Per-file pass, to be run after parsing and before merging.
    /// `first` tells whether this is the first input of the run:
    /// `team_` and `info_` entities are kept only in the first one.
    pub fn postprocess(&mut self, first: bool) {
        if !first {
            let before = self.entities.len();
            self.entities.retain(|entity| !is_first_map_only(entity));
            let dropped = before - self.entities.len();
            self.num_entities -= dropped;
            self.num_discarded_entities += dropped;
        }

        if let Some(prefix) = self.take_prefix() {
            if let Some(ws) = self.worldspawn.as_mut() {
                rewrite_targets(ws,prefix.as_str());
            }
            for entity in self.entities.iter_mut() {
                rewrite_targets(entity,prefix.as_str());
            }
        }
    }
    /// Remove every `mapcat_prefix` key from the worldspawn and return
    /// the value of the last one.  Earlier occurrences are dropped
    /// without taking effect.
    fn take_prefix(&mut self) -> Option<String> {
        let ws = self.worldspawn.as_mut()?;
        let mut prefix = None;
        ws.keys.retain(|(key,value)| {
            if key==PREFIX_KEY {
                prefix = Some(value.clone());
                return false;
            }
            true
        });
        prefix
    }
    /// Fold `slave` into `self`.  The first worldspawn seen in the run
    /// is kept whole; worldspawns of later maps only contribute their
    /// brushes, their keys and classname are dropped.  Everything else
    /// is appended in order and the counters are summed.
    pub fn merge(&mut self, mut slave: Map) {
        match self.worldspawn.take() {
            None => {
                if slave.worldspawn.is_some() {
                    debug!("adopting the worldspawn");
                }
                self.worldspawn = slave.worldspawn;
            },
            Some(mut ws) => {
                if let Some(mut slave_ws) = slave.worldspawn {
                    debug!("folding {} worldspawn brushes into the master",slave_ws.brushes.len());
                    ws.brushes.append(&mut slave_ws.brushes);
                }
                self.worldspawn = Some(ws);
            }
        }

        self.entities.append(&mut slave.entities);

        self.num_entities += slave.num_entities;
        self.num_discarded_entities += slave.num_discarded_entities;
        self.num_brushes += slave.num_brushes;
        self.num_discarded_brushes += slave.num_discarded_brushes;
        self.num_patches += slave.num_patches;
        self.num_discarded_patches += slave.num_discarded_patches;
    }
}
