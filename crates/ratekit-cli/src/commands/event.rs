pub fn run(no_prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = super::build_coordinator()?;
    coordinator.record_significant_event(!no_prompt);
    coordinator.wait_idle();

    let snapshot = coordinator.snapshot();
    println!("significant event count: {}", snapshot.significant_event_count);
    Ok(())
}
