//! Script pipeline with the `minifier` engine.

use std::fs;

use assetpipe_lib::host::MemoryHost;
use assetpipe_lib::pipeline::Scripts;
use assetpipe_lib::types::ScriptRequest;
use serde_json::json;

use super::common::{TestEnv, artifact_name, source, touch_forward, vars};

const APP: &str = r#"
// greet the user
function greet(name) {
  var message = "Hello, " + name;
  console.log(message);
}

greet(window.app_vars.user);
"#;

#[test]
fn minifies_registers_and_localizes() {
  let env = TestEnv::new();
  let scripts = Scripts::new(env.config());
  let mut host = MemoryHost::new();
  let app = env.write("js/app.js", APP);
  let request = ScriptRequest::new("app", source(&app)).with_variables(vars(json!({"user": "ada"})));

  let outcome = scripts.add(&mut host, &request).unwrap();
  let artifact = outcome.artifact().unwrap();

  assert!(artifact.name.starts_with("app-app-js-"), "got {}", artifact.name);
  let minified = fs::read_to_string(&artifact.path).unwrap();
  assert!(minified.len() < APP.len());
  assert!(!minified.contains("greet the user"));
  assert!(minified.contains("console.log"));

  let registration = host.script("app").unwrap();
  assert_eq!(registration.dependencies, vec!["jquery".to_string()]);
  assert!(registration.in_footer);
  assert_eq!(host.localizations[0].object_name, "app_vars");
  assert_eq!(host.localizations[0].payload, vars(json!({"user": "ada"})));
  assert_eq!(host.enqueued_scripts, vec!["app".to_string()]);
}

#[test]
fn edit_replaces_artifact() {
  let env = TestEnv::new();
  let scripts = Scripts::new(env.config());
  let mut host = MemoryHost::new();
  let app = env.write("js/app.js", APP);
  let request = ScriptRequest::new("app", source(&app));

  let first = scripts.add(&mut host, &request).unwrap();
  let again = scripts.add(&mut host, &request).unwrap();
  assert!(again.artifact().unwrap().cache_hit);

  env.write("js/app.js", "console.log( 'v2' );\n");
  touch_forward(&app, 10);
  let second = scripts.add(&mut host, &request).unwrap();

  assert_ne!(artifact_name(&first), artifact_name(&second));
  assert_eq!(env.artifacts(), vec![artifact_name(&second)]);
}

#[test]
fn scripts_and_styles_share_the_store() {
  let env = TestEnv::new();
  let scripts = Scripts::new(env.config());
  let styles = assetpipe_lib::pipeline::Styles::new(env.config());
  let mut host = MemoryHost::new();
  let app = env.write("site/main.js", "console.log(1);\n");
  let main = env.write("site/main.scss", "body { margin: 0; }\n");

  let script = scripts.add(&mut host, &ScriptRequest::new("site", source(&app))).unwrap();
  let style = styles
    .add(
      &mut host,
      &assetpipe_lib::types::StyleRequest::new("site", source(&main)),
    )
    .unwrap();

  let mut expected = vec![artifact_name(&script), artifact_name(&style)];
  expected.sort();
  assert_eq!(env.artifacts(), expected);
}
