use locus_core::LocationService;
use std::path::Path;

pub fn run(
    service: &LocationService,
    dir: &Path,
    all: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let names = service.list_directory(dir, all)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else if names.is_empty() {
        println!("(empty)");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}
