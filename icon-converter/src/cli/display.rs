use anyhow::Context as _;
use icon_converter::catalog::IconRecord;
use icon_converter::pipeline::PlannedAction;
use icon_converter::Summary;

pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
	let output = serde_json::to_string_pretty(value).context("failed to display response")?;
	println!("{}", output.trim());
	Ok(())
}

pub fn summary(summary: &Summary, as_json: bool) -> anyhow::Result<()> {
	if as_json {
		return json(summary);
	}

	println!("{summary}");
	Ok(())
}

pub fn records(records: &[IconRecord], as_json: bool) -> anyhow::Result<()> {
	if as_json {
		return json(records);
	}

	println!("{:>8}  {:<40}  SOURCE", "ID", "FILE");
	for record in records {
		println!("{:>8}  {:<40}  {}", record.id, record.file_name, record.source_url);
	}
	println!("{} pending", records.len());

	Ok(())
}

pub fn plan(actions: &[PlannedAction], as_json: bool) -> anyhow::Result<()> {
	if as_json {
		return json(actions);
	}

	println!("{:>8}  {:<12}  {:<40}  DETAIL", "ID", "ACTION", "FILE");
	for action in actions {
		let (name, file_name, detail) = match action {
			PlannedAction::Convert {
				file_name, target_url, ..
			} => ("convert", file_name, target_url.clone()),
			PlannedAction::Passthrough { file_name, url, .. } => ("passthrough", file_name, url.clone()),
			PlannedAction::Unsupported {
				file_name, extension, ..
			} => (
				"unsupported",
				file_name,
				extension.as_deref().map_or_else(|| "no extension".to_owned(), |ext| format!(".{ext}")),
			),
			PlannedAction::Unresolvable {
				file_name, source_url, ..
			} => ("unresolvable", file_name, source_url.clone()),
		};

		println!("{:>8}  {:<12}  {:<40}  {}", action.id(), name, file_name, detail);
	}

	Ok(())
}
