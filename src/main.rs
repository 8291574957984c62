mod engine;
mod models;
mod run;
mod session;
mod store;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let mut args: Vec<String> = std::env::args().collect();
    let profile = take_profile_flag(&mut args);

    let Some(identity) = session::current_identity(profile.as_deref()) else {
        anyhow::bail!("No profile identity. Pass --profile <name> or set SPENDGUARD_PROFILE");
    };

    let store_path = get_store_path()?;
    let store = store::Store::open(&store_path)?;
    let state = store.load_state(&identity)?.unwrap_or_default();

    match args.len() {
        1 => run::as_tui(&identity, state, &store),
        _ => run::as_cli(&args, &identity, state, &store),
    }
}

/// Pull `--profile <name>` out of the argument list so command dispatch
/// only sees positional arguments.
fn take_profile_flag(args: &mut Vec<String>) -> Option<String> {
    let idx = args.iter().position(|a| a == "--profile")?;
    if idx + 1 >= args.len() {
        args.remove(idx);
        return None;
    }
    let name = args.remove(idx + 1);
    args.remove(idx);
    Some(name)
}

fn get_store_path() -> Result<std::path::PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendguard", "SpendGuard")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendguard.db"))
}
