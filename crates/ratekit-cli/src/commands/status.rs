use chrono::Utc;
use ratekit_core::{eligibility, FileStore, Profile, TrackingSnapshot};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let profile = Profile::load_or_default();
    let store = FileStore::open_default()?;
    let snapshot = TrackingSnapshot::read(&store);

    let now = Utc::now();
    let eligible = eligibility::is_eligible(&snapshot, &profile.rating, now);
    let appropriate = eligibility::is_prompt_appropriate(&snapshot, true, false);

    let status = serde_json::json!({
        "tracking": snapshot,
        "eligible": eligible,
        "appropriate": appropriate,
    });
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
