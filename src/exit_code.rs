use crate::error::PrefsError;

pub fn exit_code_for_error(err: &PrefsError) -> i32 {
    match err {
        PrefsError::Config(_) => 2,
        PrefsError::InvalidSetting { .. } => 3,
        PrefsError::NotFound(_) => 4,
        PrefsError::PermissionDenied(_) | PrefsError::FileNotFound(_) => 37,
        PrefsError::Io(_) => 23,
        PrefsError::Json(_) => 26,
        PrefsError::Storage(err) => storage_exit_code(err),
        PrefsError::Host(_) => 55,
    }
}

fn storage_exit_code(err: &rusqlite::Error) -> i32 {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => 75,
            rusqlite::ErrorCode::CannotOpen | rusqlite::ErrorCode::PermissionDenied => 37,
            _ => 70,
        },
        _ => 70,
    }
}

#[cfg(test)]
mod tests {
    use super::exit_code_for_error;
    use crate::error::PrefsError;

    #[test]
    fn exit_code_maps_invalid_setting() {
        let err = PrefsError::InvalidSetting {
            key: "proxy".to_string(),
            detail: "bad".to_string(),
        };
        assert_eq!(exit_code_for_error(&err), 3);
    }

    #[test]
    fn exit_code_maps_missing_entry() {
        let err = PrefsError::NotFound("c_deadbeef".to_string());
        assert_eq!(exit_code_for_error(&err), 4);
    }

    #[test]
    fn exit_code_maps_access_errors() {
        assert_eq!(
            exit_code_for_error(&PrefsError::PermissionDenied("dir".to_string())),
            37
        );
        assert_eq!(
            exit_code_for_error(&PrefsError::FileNotFound("dir".to_string())),
            37
        );
    }
}
