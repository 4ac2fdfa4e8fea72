use locus_core::LocationService;

pub fn run(service: &LocationService, ids: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut failed = 0;
    for id in ids {
        match service.check_validity(id) {
            Ok(()) => println!("ok      {id}"),
            Err(e) => {
                failed += 1;
                tracing::debug!(id = %id, error = %e, "validity check failed");
                println!("invalid {id}: {e}");
            }
        }
    }

    if failed > 0 {
        return Err(format!("{failed} of {} identifiers are not valid", ids.len()).into());
    }
    Ok(())
}
