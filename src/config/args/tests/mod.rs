mod options;

#[test]
fn default_object_key_test() {
    use super::*;

    assert_eq!(
        default_object_key(Path::new("./dir/archive.tar.gz")).unwrap(),
        "archive.tar.gz"
    );
    assert_eq!(
        default_object_key(Path::new("/var/backup/db.dump")).unwrap(),
        "db.dump"
    );
    assert_eq!(default_object_key(Path::new("README")).unwrap(), "README");
    assert!(default_object_key(Path::new("/")).is_err());
}

#[test]
#[cfg(target_family = "unix")]
fn default_object_key_non_utf8_file_name() {
    use super::*;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let path = Path::new("/var/backup").join(OsStr::from_bytes(b"db\xff.dump"));

    assert_eq!(default_object_key(&path).unwrap_err(), NON_UTF8_FILE_NAME);
}

#[test]
#[cfg(target_family = "unix")]
fn default_object_key_uses_symlink_name() {
    use super::*;

    let dir = tempfile::tempdir().unwrap();
    let target_path = dir.path().join("target.bin");
    std::fs::write(&target_path, b"data").unwrap();
    let link_path = dir.path().join("link.bin");
    std::os::unix::fs::symlink(&target_path, &link_path).unwrap();

    let args = vec![
        "s3upload",
        "--access-key",
        "my_access_key",
        "--secret-access-key",
        "my_secret_access_key",
        "--endpoint-url",
        "https://s3.us-east-1.example.com",
        "--region",
        "us-east-1",
        "--bucket",
        "my-bucket",
        link_path.to_str().unwrap(),
    ];

    let config = build_config_from_args(args).unwrap();

    assert_eq!(config.target.key, "link.bin");
}
