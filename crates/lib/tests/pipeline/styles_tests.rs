//! Style pipeline with the `grass` engine.

use std::fs;

use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::{Outcome, Styles};
use assetpipe_lib::types::StyleRequest;
use serde_json::json;
use serial_test::serial;
use tracing_test::traced_test;

use super::common::{CurrentDirGuard, TestEnv, artifact_name, source, touch_forward, vars};

const MAIN: &str = r#"@import "colors";

body {
  color: $color;
  padding: $spacing;
}

.accent {
  border-width: $accent-width;
}
"#;

const PARTIAL: &str = "$accent-width: 1px !default;\n";

fn theme_request(env: &TestEnv, spacing: &str) -> StyleRequest {
  let main = env.write("theme/main.scss", MAIN);
  env.write("theme/_colors.scss", PARTIAL);
  StyleRequest::new("theme", source(&main)).with_variables(vars(json!({"color": "#000", "spacing": spacing})))
}

#[test]
fn compiles_with_injected_variables_and_partials() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();

  let outcome = styles.add(&mut host, &theme_request(&env, "10px")).unwrap();
  let artifact = outcome.artifact().unwrap();

  assert!(artifact.name.starts_with("theme-main-scss-"), "got {}", artifact.name);
  assert!(artifact.name.ends_with(".css"));
  assert_eq!(
    artifact.url,
    format!("https://example.com/uploads/compiled-scss-and-js/{}", artifact.name)
  );

  let css = fs::read_to_string(&artifact.path).unwrap();
  assert!(css.contains("10px"), "got {css}");
  assert!(css.contains("1px"), "got {css}");
  assert!(!css.contains('$'), "got {css}");
  assert_eq!(host.style("theme").unwrap().url, artifact.url);
  assert_eq!(host.enqueued_styles, vec!["theme".to_string()]);
}

#[test]
fn repeated_registration_reuses_artifact() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let request = theme_request(&env, "10px");

  let first = styles.add(&mut host, &request).unwrap();
  let before = fs::metadata(&first.artifact().unwrap().path).unwrap().modified().unwrap();
  let second = styles.add(&mut host, &request).unwrap();
  let after = fs::metadata(&second.artifact().unwrap().path).unwrap().modified().unwrap();

  assert!(second.artifact().unwrap().cache_hit);
  assert_eq!(artifact_name(&first), artifact_name(&second));
  assert_eq!(before, after);
  assert_eq!(env.artifacts().len(), 1);
}

#[test]
fn variable_change_replaces_artifact() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();

  let first = styles.add(&mut host, &theme_request(&env, "10px")).unwrap();
  let second = styles.add(&mut host, &theme_request(&env, "20px")).unwrap();

  assert_ne!(artifact_name(&first), artifact_name(&second));
  assert_eq!(env.artifacts(), vec![artifact_name(&second)]);
  let css = fs::read_to_string(&second.artifact().unwrap().path).unwrap();
  assert!(css.contains("20px"), "got {css}");
}

#[test]
fn editing_a_partial_replaces_artifact() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let request = theme_request(&env, "10px");

  let first = styles.add(&mut host, &request).unwrap();
  let partial = env.write("theme/_colors.scss", "$accent-width: 7px !default;\n");
  touch_forward(&partial, 10);
  let second = styles.add(&mut host, &request).unwrap();

  assert_ne!(artifact_name(&first), artifact_name(&second));
  assert_eq!(env.artifacts(), vec![artifact_name(&second)]);
  let css = fs::read_to_string(&second.artifact().unwrap().path).unwrap();
  assert!(css.contains("7px"), "got {css}");
}

#[test]
fn plain_css_is_compiled_as_is() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let reset = env.write("vendor/reset.css", "html { margin: 0; }\n");

  let outcome = styles.add(&mut host, &StyleRequest::new("reset", source(&reset))).unwrap();

  assert!(artifact_name(&outcome).starts_with("reset-reset-css-"));
  let css = fs::read_to_string(&outcome.artifact().unwrap().path).unwrap();
  assert!(css.contains("margin:0"), "got {css}");
}

#[test]
#[traced_test]
fn undefined_variable_is_reported_in_debug_mode() {
  let env = TestEnv::new();
  let styles = Styles::new(env.debug_config());
  let mut host = MemoryHost::new();
  let broken = env.write("broken/main.scss", "body {\n  color: $undefined;\n}\n");

  let outcome = styles.add(&mut host, &StyleRequest::new("broken", source(&broken))).unwrap();

  assert_eq!(outcome, Outcome::Unavailable);
  assert!(host.styles.is_empty());
  assert!(env.artifacts().is_empty());
  assert!(logs_contain("could not be compiled"));
  assert!(logs_contain("Undefined variable"));
}

#[test]
#[traced_test]
fn undefined_variable_is_hidden_without_debug() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let valid = env.write("broken/valid.scss", "body {\n  margin: 0;\n}\n");
  let broken = env.write("broken/main.scss", "body {\n  color: $undefined;\n}\n");

  let control = styles.add(&mut host, &StyleRequest::new("valid", source(&valid))).unwrap();
  assert!(control.is_registered());

  let outcome = styles.add(&mut host, &StyleRequest::new("broken", source(&broken))).unwrap();

  assert!(!outcome.is_registered());
  assert!(host.style("broken").is_none());
  assert_eq!(env.artifacts(), vec![artifact_name(&control)]);
  assert!(logs_contain("One or more SCSS files could not be compiled"));
  assert!(!logs_contain("Undefined variable"));
}

#[test]
fn failed_compile_keeps_previous_artifact() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let request = theme_request(&env, "10px");

  let first = styles.add(&mut host, &request).unwrap();
  let main = env.write("theme/main.scss", "body { color: $missing; }\n");
  touch_forward(&main, 10);
  let second = styles.add(&mut host, &request).unwrap();

  assert_eq!(second, Outcome::Unavailable);
  assert_eq!(env.artifacts(), vec![artifact_name(&first)]);
}

#[test]
fn missing_source_fails_the_call() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let missing = env.temp.path().join("src/nope.scss");

  let err = styles
    .add(&mut host, &StyleRequest::new("nope", source(&missing)))
    .unwrap_err();

  assert!(err.is_not_found());
  assert!(err.to_string().contains("does not exist"));
}

#[test]
fn concurrent_registrations_produce_one_artifact() {
  let env = TestEnv::new();
  let styles = Styles::new(env.config());
  let request = theme_request(&env, "10px");

  let names: Vec<String> = std::thread::scope(|scope| {
    let workers: Vec<_> = (0..4)
      .map(|_| {
        scope.spawn(|| {
          let mut host = MemoryHost::new();
          artifact_name(&styles.add(&mut host, &request).unwrap())
        })
      })
      .collect();
    workers.into_iter().map(|w| w.join().unwrap()).collect()
  });

  assert!(names.iter().all(|name| name == &names[0]));
  assert_eq!(env.artifacts(), vec![names[0].clone()]);
}

#[test]
#[serial]
fn source_outside_working_directory_is_compiled() {
  let env = TestEnv::new();
  let main = env.write("theme/main.scss", "body { margin: 1px; }\n");
  let elsewhere = env.temp.path().join("elsewhere");
  fs::create_dir_all(&elsewhere).unwrap();
  fs::write(elsewhere.join("main.scss"), "body { margin: 2px; }\n").unwrap();
  let _cwd = CurrentDirGuard::change_to(&elsewhere);

  let styles = Styles::new(env.config());
  let mut host = MemoryHost::new();
  let outcome = styles.add(&mut host, &StyleRequest::new("theme", source(&main))).unwrap();

  let css = fs::read_to_string(&outcome.artifact().expect("style should compile").path).unwrap();
  assert!(css.contains("1px"), "got {css}");
  assert!(!css.contains("2px"), "got {css}");
}
