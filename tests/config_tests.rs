use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

use tidal_browse_adapter::config::Config;

#[test]
fn config_from_path_parses_toml() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("cfg.toml");
    let mut f = File::create(&cfg_path).unwrap();
    let toml = r#"
service_prefix = "hifi"
service_name = "HiFi"
username = "me@example.com"
password = "secret"
country_code = "NO"
mpd_host = "music.local"
mpd_port = 6601
log_dir = "/tmp"
"#;
    f.write_all(toml.as_bytes()).unwrap();
    let cfg = Config::from_path(&cfg_path).expect("parse config");
    assert_eq!(cfg.service_prefix, "hifi");
    assert_eq!(cfg.credentials(), Some(("me@example.com", "secret")));
    assert_eq!(cfg.country_code, "NO");
    assert_eq!(cfg.mpd_address(), "music.local:6601");
    assert_eq!(cfg.log_dir.to_str().unwrap(), "/tmp");
    // untouched keys keep their defaults
    assert_eq!(cfg.sound_quality, "HI_RES");
    assert_eq!(cfg.api_base, "https://api.tidal.com/v1");
}

#[test]
fn prefix_with_slash_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("cfg.toml");
    std::fs::write(&cfg_path, "service_prefix = \"a/b\"\n").unwrap();
    assert!(Config::from_path(&cfg_path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    let td = tempdir().unwrap();
    assert!(Config::from_path(&td.path().join("nope.toml")).is_err());
}
