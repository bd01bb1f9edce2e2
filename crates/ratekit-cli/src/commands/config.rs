use clap::Subcommand;
use ratekit_core::Profile;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "rating.days_until_prompt", "host.app_name")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let profile = Profile::load_or_default();
            match profile.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut profile = Profile::load_or_default();
            profile.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let profile = Profile::load_or_default();
            let json = serde_json::to_string_pretty(&profile)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let profile = Profile::default();
            profile.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
