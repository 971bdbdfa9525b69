use clap::Subcommand;
use shotclock_core::{AlarmSound, Group, GroupEditor, SilentBackend};

use super::{open_store, CmdResult};

#[derive(Subcommand)]
pub enum GroupAction {
    /// List saved groups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new group
    Create {
        /// Group name
        #[arg(long)]
        name: String,
        /// Member name, in turn order (repeatable)
        #[arg(long = "member")]
        members: Vec<String>,
        /// Countdown per turn in seconds; enables the timer
        #[arg(long)]
        timer: Option<String>,
        /// Alarm sound when the countdown hits zero
        #[arg(long, default_value = "sound1")]
        alarm: AlarmSound,
    },
    /// Print one group as JSON
    Show {
        /// Group ID
        id: String,
    },
    /// Delete a group
    Delete {
        /// Group ID
        id: String,
    },
}

pub fn run(action: GroupAction) -> CmdResult {
    let store = open_store()?;

    match action {
        GroupAction::List { json } => {
            let groups = store.load_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else if groups.is_empty() {
                println!("No groups yet. Add one to get started 🍻");
            } else {
                for group in &groups {
                    print_group(group);
                }
            }
        }
        GroupAction::Create {
            name,
            members,
            timer,
            alarm,
        } => {
            // The store is the only output here; the preview player stays
            // silent.
            let mut editor = GroupEditor::new(SilentBackend);
            editor.set_name(name);
            for (i, member) in members.into_iter().enumerate() {
                if i > 0 {
                    editor.add_member_field();
                }
                editor.set_member(i, member);
            }
            if let Some(text) = timer {
                editor.set_timer_enabled(true);
                editor.set_timer_text(text);
            }
            editor.select_alarm(alarm);
            let saved = editor.save(&store);
            editor.close();

            match saved? {
                Some(group) => {
                    eprintln!("Group created: {}", group.id);
                    println!("{}", serde_json::to_string_pretty(&group)?);
                }
                None => eprintln!("Group name is empty; nothing saved"),
            }
        }
        GroupAction::Show { id } => match store.find(&id) {
            Some(group) => println!("{}", serde_json::to_string_pretty(&group)?),
            None => return Err(format!("group not found: {id}").into()),
        },
        GroupAction::Delete { id } => {
            if store.delete_by_id(&id)? {
                println!("Deleted group {id}");
            } else {
                println!("No group with id {id}; nothing deleted");
            }
        }
    }
    Ok(())
}

fn print_group(group: &Group) {
    let created = group.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d");
    println!("{}  ({})", group.name, group.id);
    println!("  created {created} · members: {}", group.members.len());
    if let Some(summary) = group.timer_summary() {
        println!("  {summary}");
    }
}
