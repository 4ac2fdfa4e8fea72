use locus_core::LocationService;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Length")]
    length: String,
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    }
}

pub fn run(service: &LocationService, ids: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows = Vec::with_capacity(ids.len());
    for id in ids {
        let source = if service.mapped_handle(id).is_some() {
            "<mapped handle>".to_string()
        } else {
            service.mapped_id(id)
        };

        let length = match service.resolve(id) {
            Ok(handle) => {
                let length = handle.length().map(format_size);
                // only close handles we opened ourselves
                if service.mapped_handle(id).is_none() {
                    handle.close()?;
                }
                length.unwrap_or_else(|e| format!("error: {e}"))
            }
            Err(e) => format!("error: {e}"),
        };

        rows.push(StatRow {
            id: id.clone(),
            source,
            length,
        });
    }

    println!("{}", Table::new(rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
