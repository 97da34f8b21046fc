use super::title_store;
use crate::output::Output;
use crate::SavedCommands;
use catalog_models::Title;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub fn run_saved(cmd: SavedCommands, output: &Output) -> Result<()> {
    let store = title_store();

    match cmd {
        SavedCommands::Show { id } => {
            let title = store.load(id).map_err(|e| eyre!("{:#}", e))?;
            match title {
                Some(title) => {
                    output.title_detail(&title);
                    if let Ok(Some(saved_at)) = store.saved_at(id) {
                        output.info(format!("Saved {}", saved_at.format("%Y-%m-%d %H:%M UTC")));
                    }
                }
                None => output.warn(format!("No saved title with id {}", id)),
            }
        }
        SavedCommands::Clear { id } => {
            let removed = store.clear(id).map_err(|e| eyre!("{}", e))?;
            if !output.is_human() {
                output.json(&json!({ "type": "cleared", "id": id, "removed": removed }));
            } else if removed {
                output.success(format!("Cleared saved title {}", id));
            } else {
                output.warn(format!("No saved title with id {}", id));
            }
        }
    }

    Ok(())
}

/// Persist the title with `id` out of a freshly listed page
pub fn save_from(titles: &[Title], id: i64, output: &Output) -> Result<()> {
    let Some(title) = titles.iter().find(|t| t.id == id) else {
        output.warn(format!("Title {} is not in the listed results, nothing saved", id));
        return Ok(());
    };

    let store = title_store();
    store.save(title).map_err(|e| eyre!("Failed to save title {}: {}", id, e))?;
    output.success(format!("Saved '{}' ({})", title.title, store.dir().display()));
    Ok(())
}
