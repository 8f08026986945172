//! The `list` and `defaults` commands.

use appblocker_core::{BlockListStore, ListPaths, ProcessKiller, SystemProcessTable};

/// Print the user block list, creating it from defaults if absent.
pub async fn user(paths: ListPaths, json: bool) -> anyhow::Result<()> {
    let store = BlockListStore::new(paths);
    let default = store.load_default().await?;
    let mut killer = ProcessKiller::new(SystemProcessTable::new());
    let list = store.load_user(&default, &mut killer).await?;
    print_list(&list, json);
    Ok(())
}

/// Print the effective default block list.
pub async fn defaults(paths: ListPaths, json: bool) -> anyhow::Result<()> {
    let store = BlockListStore::new(paths);
    let list = store.load_default().await?;
    print_list(&list, json);
    Ok(())
}

fn print_list(list: &[String], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(list).unwrap_or_default());
    } else if list.is_empty() {
        println!("(empty)");
    } else {
        for app in list {
            println!("{}", app);
        }
    }
}
