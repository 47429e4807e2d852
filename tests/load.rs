#[cfg(test)]
mod tests {
	use std::fs;

	use epc::{Epc, EpcError};

	#[test]
	fn reads_a_script() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mission.epc");
		fs::write(&path, "files \"hi\"\n").unwrap();
		assert_eq!(Epc::load(&path).unwrap(), "files \"hi\"\n");
	}

	#[test]
	fn missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let err = Epc::load(dir.path().join("ghost.epc")).unwrap_err();
		assert!(matches!(err, EpcError::Load(_)));
		assert_eq!(err.title(), "LOAD ERROR");
		assert!(err.to_string().starts_with("Load error: Failed to resolve"), "{err}");
	}

	#[test]
	fn directory_is_not_a_script() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("folder.epc");
		fs::create_dir(&path).unwrap();
		let err = Epc::load(&path).unwrap_err();
		assert!(err.to_string().ends_with("is not a file"), "{err}");
	}

	#[test]
	fn extension_is_checked_before_reading() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("mission.js");
		fs::write(&path, "files \"hi\"\n").unwrap();
		let err = Epc::load(&path).unwrap_err();
		assert!(err.to_string().ends_with("is not a .epc file"), "{err}");
	}

	#[test]
	fn run_file_reports_load_errors() {
		let err = Epc::new().run_file("nowhere/mission.epc").unwrap_err();
		assert!(matches!(err, EpcError::Load(_)));
	}
}
