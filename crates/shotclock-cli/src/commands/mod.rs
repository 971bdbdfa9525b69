pub mod config;
pub mod group;
pub mod play;
pub mod sound;

use shotclock_core::{Database, GroupStore};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<GroupStore<Database>, Box<dyn std::error::Error>> {
    Ok(GroupStore::new(Database::open()?))
}
