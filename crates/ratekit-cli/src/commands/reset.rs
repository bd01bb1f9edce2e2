use ratekit_core::FileStore;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::open_default()?;
    store.clear()?;
    println!("tracking state cleared");
    Ok(())
}
