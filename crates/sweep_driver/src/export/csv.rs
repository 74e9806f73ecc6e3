use crate::summary::SweepSummary;

pub(crate) fn export_to_csv_impl(
    summary: &SweepSummary,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "index",
        "repetition",
        "parameters",
        "artifact",
        "status",
        "exit_code",
        "duration_ms",
        "error",
    ])?;

    for record in &summary.records {
        let parameters = record
            .descriptor
            .values
            .iter()
            .map(|v| format!("{}={}", v.name, v.value))
            .collect::<Vec<_>>()
            .join(";");

        wtr.write_record([
            record.descriptor.index.to_string(),
            record.descriptor.repetition.to_string(),
            parameters,
            record
                .artifact
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            record.status.as_str().to_string(),
            record
                .status
                .exit_code()
                .map(|c| c.to_string())
                .unwrap_or_default(),
            record.duration_ms.to_string(),
            record.status.error().unwrap_or_default().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
