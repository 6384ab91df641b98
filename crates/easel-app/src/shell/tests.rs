use std::fs;
use std::path::{Path, PathBuf};

use easel_common::{channels, AppState, EaselError, PanelId, SessionId, WindowError, WindowId};
use easel_config::ShellConfig;
use easel_package::FsScriptHost;
use easel_window::{CloseOutcome, HeadlessFactory, HeadlessLog, IpcMessage};
use serde_json::{json, Value};
use tempfile::TempDir;

use super::Shell;

struct Fixture {
    dir: TempDir,
    shell: Shell,
    log: HeadlessLog,
    main: WindowId,
}

fn id(s: &str) -> PanelId {
    s.parse().unwrap()
}

fn write_package(root: &Path, manifest: Value) -> PathBuf {
    let name = manifest["name"].as_str().unwrap();
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("package.json"), manifest.to_string()).unwrap();
    dir
}

impl Fixture {
    /// Shell with `console` autoloaded and `inspector` (which depends on
    /// `console`) available on the search path.
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let packages = dir.path().join("packages");
        let console = write_package(
            &packages,
            json!({
                "name": "console",
                "hosts": { "easel": ">=0.1.0" },
                "panels": {
                    "main": { "view": "main.html", "title": "Console", "width": 500, "height": 400 },
                    "log": { "type": "float", "view": "log.html" }
                }
            }),
        );
        write_package(
            &packages,
            json!({
                "name": "inspector",
                "dependencies": ["console"],
                "panels": { "main": { "view": "index.html" } }
            }),
        );

        let mut config = ShellConfig::default();
        config.packages.search_paths = vec![packages];
        config.packages.autoload = vec![console];
        config.profiles.global_dir = Some(dir.path().join("global"));
        config.profiles.local_dir = Some(dir.path().join("local"));
        config.profiles.project_dir = Some(dir.path().join("project"));

        let factory = HeadlessFactory::new();
        let log = factory.log();
        let mut shell = Shell::new(config, Box::new(factory), Box::new(FsScriptHost));
        let main = shell.start();

        Self {
            dir,
            shell,
            log,
            main,
        }
    }

    fn package(&self, name: &str) -> PathBuf {
        self.dir.path().join("packages").join(name)
    }

    fn post(&mut self, window: WindowId, msg: Value) -> Result<(), EaselError> {
        self.shell.dispatch_ipc(window, &msg.to_string())
    }

    fn replies_to(&self, window: WindowId, session: u64) -> Vec<IpcMessage> {
        self.log
            .sent_to(window)
            .into_iter()
            .filter(|m| m.channel == channels::REPLY_TO_PAGE && m.session == Some(SessionId(session)))
            .collect()
    }
}

#[test]
fn start_opens_main_window_and_autoloads() {
    let fx = Fixture::new();

    assert_eq!(fx.shell.state(), AppState::Running);
    assert_eq!(fx.shell.windows().main_window(), Some(fx.main));
    assert!(fx.shell.packages().is_loaded("console"));

    let loaded: Vec<_> = fx
        .log
        .sent_to(fx.main)
        .into_iter()
        .filter(|m| m.channel == channels::PACKAGE_LOADED)
        .collect();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].args, vec![json!("console")]);
}

#[test]
fn notifications_reach_every_window() {
    let mut fx = Fixture::new();
    let panel_window = fx.shell.open_panel(&id("console.main"), vec![]).unwrap();

    let inspector = fx.package("inspector");
    fx.shell.load_package(&inspector).unwrap();

    for window in [fx.main, panel_window] {
        let msgs = fx.log.sent_to(window);
        assert!(msgs
            .iter()
            .any(|m| m.channel == channels::PACKAGE_LOADED && m.args == vec![json!("inspector")]));
    }
}

#[test]
fn every_notification_of_a_large_load_reaches_pages() {
    let mut fx = Fixture::new();
    let packages = fx.dir.path().join("packages");
    let deps: Vec<String> = (0..300).map(|i| format!("dep{i:03}")).collect();
    for name in &deps {
        write_package(&packages, json!({ "name": name }));
    }
    let app = write_package(&packages, json!({ "name": "bundle", "dependencies": deps }));

    fx.shell.load_package(&app).unwrap();

    let loaded: Vec<Value> = fx
        .log
        .sent_to(fx.main)
        .into_iter()
        .filter(|m| m.channel == channels::PACKAGE_LOADED)
        .filter_map(|m| m.args.first().cloned())
        .collect();
    assert!(loaded.contains(&json!("dep000")));
    assert!(loaded.contains(&json!("dep299")));
    assert!(loaded.contains(&json!("bundle")));
    assert_eq!(loaded.len(), 302);
}

#[test]
fn unloading_a_package_closes_its_panels() {
    let mut fx = Fixture::new();
    let inspector = fx.package("inspector");
    fx.shell.load_package(&inspector).unwrap();
    let console_window = fx.shell.open_panel(&id("console.main"), vec![]).unwrap();
    let inspector_window = fx.shell.open_panel(&id("inspector.main"), vec![]).unwrap();

    let unloaded = fx.shell.unload_package(&fx.package("console"));

    assert_eq!(unloaded, vec!["inspector", "console"]);
    assert!(fx.shell.panels().is_empty());
    assert!(fx.shell.windows().get(console_window).is_none());
    assert!(fx.shell.windows().get(inspector_window).is_none());
    assert!(fx.shell.windows().get(fx.main).is_some());

    let unloaded_seen: Vec<_> = fx
        .log
        .sent_to(fx.main)
        .into_iter()
        .filter(|m| m.channel == channels::PACKAGE_UNLOADED)
        .map(|m| m.args)
        .collect();
    assert_eq!(unloaded_seen, vec![vec![json!("inspector")], vec![json!("console")]]);
}

#[test]
fn panel_open_over_ipc_replies_with_window() {
    let mut fx = Fixture::new();
    fx.post(
        fx.main,
        json!({"channel": "panel:open", "args": ["console.log", "--tail"], "session": 5}),
    )
    .unwrap();

    let window = fx.shell.panels().find_window(&id("console.log")).unwrap();
    let replies = fx.replies_to(fx.main, 5);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].args, vec![json!(window.0)]);
}

#[test]
fn panel_ready_replays_argv_and_notifies() {
    let mut fx = Fixture::new();
    let window = fx
        .shell
        .open_panel(&id("console.main"), vec![json!("--verbose")])
        .unwrap();

    fx.post(window, json!({"channel": "panel:ready", "args": ["console.main"]}))
        .unwrap();

    let run: Vec<_> = fx
        .log
        .sent_to(window)
        .into_iter()
        .filter(|m| m.channel == channels::PANEL_RUN)
        .collect();
    assert_eq!(run.len(), 1);
    assert_eq!(run[0].args, vec![json!("console.main"), json!("--verbose")]);
    assert!(fx.shell.windows().get(window).unwrap().is_loaded());
    assert!(fx
        .log
        .channels_sent_to(fx.main)
        .contains(&channels::PANEL_READY.to_string()));
}

#[test]
fn wait_for_close_replies_when_panel_closes() {
    let mut fx = Fixture::new();
    fx.shell.open_panel(&id("console.main"), vec![]).unwrap();

    fx.post(
        fx.main,
        json!({"channel": "panel:wait-for-close", "args": ["console.main"], "session": 9}),
    )
    .unwrap();
    assert!(fx.replies_to(fx.main, 9).is_empty());

    fx.post(fx.main, json!({"channel": "panel:close", "args": ["console.main"]}))
        .unwrap();

    let replies = fx.replies_to(fx.main, 9);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].args.is_empty());
}

#[test]
fn wait_for_close_on_closed_panel_replies_at_once() {
    let mut fx = Fixture::new();
    fx.post(
        fx.main,
        json!({"channel": "panel:wait-for-close", "args": ["console.main"], "session": 2}),
    )
    .unwrap();
    assert_eq!(fx.replies_to(fx.main, 2).len(), 1);
}

#[test]
fn query_info_replies_with_manifest_or_null() {
    let mut fx = Fixture::new();
    fx.post(
        fx.main,
        json!({"channel": "panel:query-info", "args": ["console.main"], "session": 1}),
    )
    .unwrap();
    fx.post(
        fx.main,
        json!({"channel": "panel:query-info", "args": ["console.missing"], "session": 2}),
    )
    .unwrap();

    let found = fx.replies_to(fx.main, 1);
    assert_eq!(found[0].args[0]["title"], json!("Console"));
    assert_eq!(found[0].args[0]["view"], json!("main.html"));

    let missing = fx.replies_to(fx.main, 2);
    assert_eq!(missing[0].args, vec![Value::Null]);
}

#[test]
fn failed_open_replies_with_error() {
    let mut fx = Fixture::new();
    let err = fx
        .post(
            fx.main,
            json!({"channel": "panel:open", "args": ["console.nope"], "session": 9}),
        )
        .unwrap_err();
    assert!(matches!(err, EaselError::Panel(_)));

    let replies = fx.replies_to(fx.main, 9);
    assert_eq!(replies.len(), 1);
    assert_eq!(
        replies[0].args,
        vec![Value::Null, json!("panel info not found: console.nope")]
    );

    fx.post(
        fx.main,
        json!({"channel": "window:open", "args": ["about", {"kind": "sideways"}], "session": 10}),
    )
    .unwrap_err();
    let replies = fx.replies_to(fx.main, 10);
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].args[0], Value::Null);
    assert!(replies[0].args[1].as_str().unwrap().contains("window:open"));
}

#[test]
fn failed_fire_and_forget_message_gets_no_reply() {
    let mut fx = Fixture::new();
    let before = fx.log.sent_to(fx.main).len();
    fx.post(fx.main, json!({"channel": "panel:open", "args": ["console.nope"]}))
        .unwrap_err();
    assert_eq!(fx.log.sent_to(fx.main).len(), before);
}

#[test]
fn query_without_session_is_rejected() {
    let mut fx = Fixture::new();
    let err = fx
        .post(fx.main, json!({"channel": "panel:query-info", "args": ["console.main"]}))
        .unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::InvalidArgument(_))));
}

#[test]
fn malformed_and_unknown_messages_are_rejected() {
    let mut fx = Fixture::new();
    let before = fx.log.events().len();

    let err = fx.shell.dispatch_ipc(fx.main, "{not json").unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::InvalidArgument(_))));

    let err = fx.post(fx.main, json!({"channel": "panel:run", "args": []})).unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::InvalidArgument(_))));

    let err = fx
        .post(fx.main, json!({"channel": "panel:open", "args": ["no-dot"]}))
        .unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::InvalidArgument(_))));

    let err = fx
        .post(WindowId(999), json!({"channel": "window:focus"}))
        .unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::WindowNotFound(_))));

    assert_eq!(fx.log.events().len(), before);
}

#[test]
fn undeclared_panel_is_reported() {
    let mut fx = Fixture::new();
    let err = fx
        .post(fx.main, json!({"channel": "panel:open", "args": ["console.nope"]}))
        .unwrap_err();
    assert!(matches!(err, EaselError::Panel(_)));
    assert!(fx.shell.panels().is_empty());
}

#[test]
fn reply_from_page_resolves_request() {
    use std::sync::{Arc, Mutex};

    let mut fx = Fixture::new();
    let got = Arc::new(Mutex::new(None));
    let sink = got.clone();
    let session = fx
        .shell
        .windows
        .send_request_to_page(
            fx.main,
            "editor:query-selection",
            vec![],
            Box::new(move |args| *sink.lock().unwrap() = Some(args)),
        )
        .unwrap();

    fx.post(
        fx.main,
        json!({"channel": "editor:reply-from-page", "args": ["hello"], "session": session.0}),
    )
    .unwrap();

    assert_eq!(*got.lock().unwrap(), Some(vec![json!("hello")]));
}

#[test]
fn window_open_creates_and_loads() {
    let mut fx = Fixture::new();
    fx.post(
        fx.main,
        json!({
            "channel": "window:open",
            "args": ["about", {"kind": "float", "url": "packages://console/about.html", "width": 300, "height": 200}],
            "session": 4
        }),
    )
    .unwrap();

    let reply = &fx.replies_to(fx.main, 4)[0];
    let window = WindowId(reply.args[0].as_u64().unwrap());
    let editor = fx.shell.windows().get(window).unwrap();
    assert_eq!(editor.name(), "about");
    assert_eq!(editor.url(), Some("packages://console/about.html"));
    assert_eq!(editor.bounds().width, 300.0);
    assert_eq!(editor.bounds().height, 200.0);
}

#[test]
fn layout_round_trips_through_profile() {
    let mut fx = Fixture::new();
    let layout = json!({"type": "dock-area-h", "children": ["console.main"]});
    fx.post(fx.main, json!({"channel": "window:save-layout", "args": [layout.clone()]}))
        .unwrap();
    fx.post(fx.main, json!({"channel": "window:query-layout", "session": 6}))
        .unwrap();

    assert_eq!(fx.replies_to(fx.main, 6)[0].args, vec![layout]);
    assert!(fx.dir.path().join("local").join("layout.windows.json").exists());
}

#[test]
fn window_operations_over_ipc() {
    let mut fx = Fixture::new();
    fx.post(fx.main, json!({"channel": "window:resize", "args": [1024, 768]}))
        .unwrap();
    assert_eq!(fx.shell.windows().get(fx.main).unwrap().bounds().width, 1024.0);

    let err = fx
        .post(fx.main, json!({"channel": "window:resize", "args": ["wide", 768]}))
        .unwrap_err();
    assert!(matches!(err, EaselError::Window(WindowError::InvalidArgument(_))));

    fx.post(fx.main, json!({"channel": "window:load", "args": ["packages://console/main.html", 1]}))
        .unwrap();
    let editor = fx.shell.windows().get(fx.main).unwrap();
    assert_eq!(editor.url(), Some("packages://console/main.html"));
    assert_eq!(editor.argv(), &[json!(1)]);

    fx.post(fx.main, json!({"channel": "window:center"})).unwrap();
    fx.post(fx.main, json!({"channel": "window:inspect-at", "args": [10, 20]}))
        .unwrap();
    fx.post(fx.main, json!({"channel": "window:focus"})).unwrap();
}

#[test]
fn closing_main_window_requests_exit() {
    let mut fx = Fixture::new();
    let panel_window = fx.shell.open_panel(&id("console.main"), vec![]).unwrap();

    assert_eq!(fx.shell.close_window(panel_window).unwrap(), CloseOutcome::Closed);
    assert!(fx.shell.panels().is_empty());
    assert!(!fx.shell.should_exit());

    assert_eq!(fx.shell.close_window(fx.main).unwrap(), CloseOutcome::MainClosed);
    assert!(fx.shell.should_exit());
}

#[test]
fn shutdown_closes_everything_in_order() {
    let mut fx = Fixture::new();
    let inspector = fx.package("inspector");
    fx.shell.load_package(&inspector).unwrap();
    let panel_window = fx.shell.open_panel(&id("inspector.main"), vec![]).unwrap();

    fx.shell.shutdown();

    assert_eq!(fx.shell.state(), AppState::ShuttingDown);
    assert!(fx.shell.windows().is_empty());
    assert!(fx.shell.panels().is_empty());
    assert!(fx.shell.packages().loaded_names().is_empty());
    assert!(fx.shell.windows().window_state("inspector.main").is_some());
    assert!(fx.dir.path().join("local").join("layout.windows.json").exists());
    assert!(fx
        .dir
        .path()
        .join("local")
        .join("layout.inspector.main.json")
        .exists());
    assert!(fx.log.sent_to(panel_window).iter().all(|m| m.channel != channels::PACKAGE_UNLOADED));
}

#[test]
fn shutdown_is_idempotent() {
    let mut fx = Fixture::new();
    fx.shell.shutdown();
    let events = fx.log.events().len();

    fx.shell.shutdown();

    assert_eq!(fx.log.events().len(), events);
    assert!(fx.shell.should_exit());
}
