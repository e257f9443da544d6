use super::key;
use crate::catalog::IconRecord;
use crate::store::ObjectStore;
use crate::transcode::SourceFormat;

/// What a run would do with a record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlannedAction {
	Convert {
		id: i32,
		file_name: String,
		source_key: String,
		target_key: String,
		target_url: String,
	},
	Passthrough {
		id: i32,
		file_name: String,
		url: String,
	},
	Unsupported {
		id: i32,
		file_name: String,
		extension: Option<String>,
	},
	Unresolvable {
		id: i32,
		file_name: String,
		source_url: String,
	},
}

impl PlannedAction {
	pub fn for_record(record: &IconRecord, store: &impl ObjectStore) -> Self {
		let id = record.id;
		let file_name = record.file_name.clone();

		match SourceFormat::from_file_name(&record.file_name) {
			SourceFormat::Png => Self::Passthrough {
				id,
				file_name,
				url: record.source_url.clone(),
			},
			SourceFormat::Unsupported(extension) => Self::Unsupported { id, file_name, extension },
			SourceFormat::Dds => match key::source_key(&record.source_url, store.name()) {
				Some(source_key) => {
					let target_key = key::target_key(&source_key);
					Self::Convert {
						id,
						file_name,
						target_url: store.public_url(&target_key),
						source_key,
						target_key,
					}
				}
				None => Self::Unresolvable {
					id,
					file_name,
					source_url: record.source_url.clone(),
				},
			},
		}
	}

	pub fn id(&self) -> i32 {
		match self {
			Self::Convert { id, .. }
			| Self::Passthrough { id, .. }
			| Self::Unsupported { id, .. }
			| Self::Unresolvable { id, .. } => *id,
		}
	}
}
