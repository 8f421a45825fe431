use std::fs;
use std::os::unix::fs::PermissionsExt;

use lxshim_cgroup::*;
use lxshim_core::Error;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn paths(spec: &ContainerSpec) -> Vec<&str> {
    spec.devices().iter().map(|d| d.path.as_str()).collect()
}

#[test]
fn test_default_devices_on_empty_spec() {
    init_tracing();
    let mut spec = ContainerSpec::default();

    ensure_default_devices(&mut spec).unwrap();

    assert_eq!(
        paths(&spec),
        [
            "/dev/null",
            "/dev/zero",
            "/dev/full",
            "/dev/random",
            "/dev/urandom",
            "/dev/tty"
        ]
    );
    assert!(!paths(&spec).contains(&"/dev/ptmx"));
    assert_eq!(spec.device_rules().len(), 8);
    assert!(spec.device_rules().iter().all(|r| r.allow));

    for device in spec.devices() {
        assert_eq!(device.file_mode, Some(0o666));
        assert_eq!(device.uid, Some(0));
        assert_eq!(device.gid, Some(0));
    }
}

#[test]
fn test_default_devices_keep_declared_device() {
    let mut spec = ContainerSpec::default();
    let mut null = Device::char("/dev/null", 1, 3);
    null.file_mode = Some(0o600);
    spec.linux.devices.push(null.clone());

    ensure_default_devices(&mut spec).unwrap();

    let nulls: Vec<_> = spec
        .devices()
        .iter()
        .filter(|d| d.path == "/dev/null")
        .collect();
    assert_eq!(nulls, [&null]);
    assert_eq!(spec.devices().len(), 6);

    // 5 added devices + 2 pty rules
    assert_eq!(spec.device_rules().len(), 7);
    let rules: Vec<String> = spec.device_rules().iter().map(ToString::to_string).collect();
    assert!(rules.contains(&"c 5:* rwm".to_string()));
    assert!(rules.contains(&"c 88:* rwm".to_string()));
    assert!(!rules.contains(&"c 1:3 rwm".to_string()));
}

#[test]
fn test_default_devices_use_process_user() {
    let mut spec = ContainerSpec::default();
    spec.process.user.uid = 1000;
    spec.process.user.gid = 1001;

    ensure_default_devices(&mut spec).unwrap();

    assert!(spec.devices().iter().all(|d| d.uid == Some(1000) && d.gid == Some(1001)));
}

#[test]
fn test_default_devices_twice_adds_only_rules() {
    let mut spec = ContainerSpec::default();

    ensure_default_devices(&mut spec).unwrap();
    ensure_default_devices(&mut spec).unwrap();

    assert_eq!(spec.devices().len(), 6);
    assert_eq!(spec.device_rules().len(), 10);
}

#[test]
fn test_is_device_enabled_ignores_numbers() {
    let mut spec = ContainerSpec::default();
    spec.linux.devices.push(Device::char("/dev/tty", 5, 0));

    assert!(is_device_enabled(&spec, &Device::char("/dev/tty", 136, 1)));
    assert!(!is_device_enabled(&spec, &Device::char("/dev/tty0", 5, 0)));
}

#[test]
fn test_write_devices_without_devices() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");

    write_devices(&dst, &ContainerSpec::default()).unwrap();

    assert!(!dst.exists());
    assert!(read_devices(&dst).unwrap().is_empty());
}

#[test]
fn test_write_devices_format() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");

    let mut spec = ContainerSpec::default();
    spec.process.user.uid = 1000;
    spec.process.user.gid = 1000;
    spec.linux.devices.push(Device {
        file_mode: Some(0o666),
        uid: Some(0),
        gid: Some(0),
        ..Device::char("/dev/zero", 1, 5)
    });
    spec.linux.devices.push(Device {
        typ: DeviceType::Block,
        ..Device::char("/dev/loop0", 7, 0)
    });

    write_devices(&dst, &spec).unwrap();

    assert_eq!(
        fs::read_to_string(&dst).unwrap(),
        "/dev/zero c 1 5 0666 0:0\n/dev/loop0 b 7 0 0600 1000:1000\n"
    );
    let mode = fs::metadata(&dst).unwrap().permissions().mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn test_write_devices_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");

    let mut spec = ContainerSpec::default();
    ensure_default_devices(&mut spec).unwrap();

    write_devices(&dst, &spec).unwrap();
    let first = fs::read_to_string(&dst).unwrap();

    let err = write_devices(&dst, &spec).unwrap_err();
    assert!(matches!(err, Error::DeviceTableExists { ref path } if path == &dst));
    assert_eq!(fs::read_to_string(&dst).unwrap(), first);
}

#[test]
fn test_write_devices_missing_parent() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("missing").join("devices.txt");

    let mut spec = ContainerSpec::default();
    ensure_default_devices(&mut spec).unwrap();

    let err = write_devices(&dst, &spec).unwrap_err();
    assert!(matches!(err, Error::DeviceTableWrite { .. }));
}

#[test]
fn test_write_devices_rejects_whitespace_path() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");

    let mut spec = ContainerSpec::default();
    add_device(
        &mut spec,
        Device::char("/dev/my disk", 8, 0),
        0o660,
        0,
        0,
        DeviceAccess::ALL,
    );

    let err = write_devices(&dst, &spec).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }), "unexpected error: {err}");
    assert!(!dst.exists());
}

#[test]
fn test_read_back_device_table() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");

    let mut spec = ContainerSpec::default();
    spec.process.user.uid = 42;
    spec.process.user.gid = 43;
    ensure_default_devices(&mut spec).unwrap();
    write_devices(&dst, &spec).unwrap();

    let table = read_devices(&dst).unwrap();
    assert_eq!(table.len(), 6);
    assert_eq!(table[5].path, "/dev/tty");
    assert_eq!((table[5].major, table[5].minor), (5, 0));
    assert!(table.iter().all(|e| e.mode == 0o666 && e.uid == 42 && e.gid == 43));
}

#[test]
fn test_read_malformed_table() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("devices.txt");
    fs::write(&dst, "/dev/null c 1 3 0666 0:0\n/dev/zero c one 5 0666 0:0\n").unwrap();

    let err = read_devices(&dst).unwrap_err();
    assert!(matches!(err, Error::DeviceTableParse { line: 2, .. }));
}
