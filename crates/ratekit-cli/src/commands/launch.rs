pub fn run(no_prompt: bool) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = super::build_coordinator()?;
    coordinator.record_launch(!no_prompt);
    coordinator.wait_idle();

    let snapshot = coordinator.snapshot();
    println!("use count: {}", snapshot.use_count);
    Ok(())
}
