use url::Url;

/// Resolves a record's source URL to a key in `bucket`.
///
/// Virtual-hosted URLs (`https://{bucket}.s3.{region}.amazonaws.com/{key}`)
/// and CDN URLs use the whole path. Path-style URLs
/// (`https://{endpoint}/{bucket}/{key}`) have the bucket segment removed.
pub fn source_key(source_url: &str, bucket: &str) -> Option<String> {
	let url = Url::parse(source_url.trim()).ok()?;

	if url.cannot_be_a_base() || url.host_str().is_none() {
		return None;
	}

	let path = urlencoding::decode(url.path()).ok()?;
	let path = path.trim_start_matches('/');

	let key = match path.split_once('/') {
		Some((first, rest)) if !bucket.is_empty() && first == bucket => rest,
		_ => path,
	};

	if key.is_empty() || key.ends_with('/') {
		return None;
	}

	Some(key.to_owned())
}

/// The key the converted asset is stored under.
pub fn target_key(source_key: &str) -> String {
	match source_key.len().checked_sub(4) {
		Some(stem) if source_key.is_char_boundary(stem) && source_key[stem..].eq_ignore_ascii_case(".dds") => {
			format!("{}.png", &source_key[..stem])
		}
		_ => format!("{source_key}.png"),
	}
}
