//! Remote sources mirrored into the store.

use std::fs;

use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::{Scripts, Styles};
use assetpipe_lib::types::{ScriptRequest, StyleRequest};

use super::common::{TestEnv, artifact_name};

#[test]
fn remote_style_is_fetched_once() {
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/reset.css")
    .with_status(200)
    .with_body("html { margin: 0; }")
    .expect(1)
    .create();

  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let request = StyleRequest::new("cdn", format!("{}/reset.css", server.url()));

  let first = styles.add(&mut host, &request).unwrap();
  let second = styles.add(&mut host, &request).unwrap();

  mock.assert();
  assert_eq!(artifact_name(&first), artifact_name(&second));
  assert!(second.artifact().unwrap().cache_hit);

  let mirrors: Vec<String> = env
    .artifacts()
    .into_iter()
    .filter(|name| name.starts_with("cached-"))
    .collect();
  assert_eq!(mirrors.len(), 1);
  assert!(mirrors[0].ends_with("-reset.css.css"), "got {}", mirrors[0]);
}

#[test]
fn deleted_mirror_is_fetched_again() {
  let mut server = mockito::Server::new();
  let mock = server
    .mock("GET", "/lib.js")
    .with_status(200)
    .with_body("var x = 1;")
    .expect(2)
    .create();

  let env = TestEnv::new();
  let scripts = Scripts::new(env.config());
  let mut host = MemoryHost::new();
  let request = ScriptRequest::new("lib", format!("{}/lib.js", server.url()));

  scripts.add(&mut host, &request).unwrap();
  for name in env.artifacts().iter().filter(|name| name.starts_with("cached-")) {
    fs::remove_file(env.store_dir().join(name)).unwrap();
  }
  scripts.add(&mut host, &request).unwrap();

  mock.assert();
}

#[test]
fn failed_download_fails_the_call() {
  let mut server = mockito::Server::new();
  let _mock = server.mock("GET", "/gone.css").with_status(404).create();

  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();

  let err = styles
    .add(&mut host, &StyleRequest::new("gone", format!("{}/gone.css", server.url())))
    .unwrap_err();

  assert!(!err.is_not_found());
  assert!(err.to_string().contains("404"), "got {err}");
  assert!(host.styles.is_empty());
}
