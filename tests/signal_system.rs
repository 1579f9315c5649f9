//! End-to-end suite for the dispatch contract: construction, ordered
//! fan-out, short-circuit, exception policy, unplug/release semantics, and
//! registry behavior.

use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use speakers::{ConfigError, Registry, Speaker};

type Calls = Arc<Mutex<Vec<&'static str>>>;

fn recorder() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

#[test]
fn test_construction_yields_one_empty_channel_per_normalized_action() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("AwesomeSauce", &["do this", "do that"], &registry);

    assert_eq!(sp.name(), "awesomesauce");
    assert_eq!(sp.actions().collect::<Vec<_>>(), ["do_this", "do_that"]);
    for action in ["do this", "do_this", "do that"] {
        let accessor = sp.action(action).unwrap();
        assert!(accessor.is_empty());
    }
    assert_eq!(
        sp.to_string(),
        "Speaker(name=awesomesauce, actions=[do_this, do_that], total_hooks=0)"
    );
}

#[test]
fn test_empty_action_list_is_a_valid_declaration() {
    let registry = Registry::new();
    let sp = Speaker::<(), i32>::with_registry("Testing", &[], &registry);

    assert_eq!(sp.actions().count(), 0);
    // every shout is empty, never an error
    assert_eq!(sp.shout("anything", &()).unwrap(), None);
    // the speaker is still registered and releasable
    assert!(registry.get("Testing").is_some());
    registry.release_all();
    assert_eq!(sp.total_hooks(), 0);
}

#[test]
fn test_listeners_run_in_registration_order() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("order", &["go"], &registry);
    let calls = recorder();

    for name in ["l1", "l2", "l3"] {
        let calls = Arc::clone(&calls);
        sp.plug("go", name, move |_, _| {
            calls.lock().unwrap().push(name);
            Ok(None)
        })
        .unwrap();
    }

    let reply = sp.shout("go", &()).unwrap();
    assert_eq!(reply, None);
    assert_eq!(*calls.lock().unwrap(), ["l1", "l2", "l3"]);
}

#[test]
fn test_first_non_empty_reply_short_circuits() {
    let registry = Registry::new();
    let sp = Speaker::<(), i32>::with_registry("sc", &["go"], &registry);
    let calls = recorder();

    let c = Arc::clone(&calls);
    sp.plug("go", "l1", move |_, _| {
        c.lock().unwrap().push("l1");
        Ok(Some(10))
    })
    .unwrap();
    let c = Arc::clone(&calls);
    sp.plug("go", "l2", move |_, _| {
        c.lock().unwrap().push("l2");
        Ok(Some(20))
    })
    .unwrap();

    assert_eq!(sp.shout("go", &()).unwrap(), Some(10));
    assert_eq!(*calls.lock().unwrap(), ["l1"]);
}

#[test]
fn test_build_scenario_later_listener_supplies_the_value() {
    let registry = Registry::new();
    let build =
        Speaker::<(), i32>::with_registry("Build", &["started", "finished"], &registry);
    let calls = recorder();

    let c = Arc::clone(&calls);
    build
        .plug("started", "f", move |_, _| {
            c.lock().unwrap().push("f");
            Ok(None)
        })
        .unwrap();
    let c = Arc::clone(&calls);
    build
        .plug("started", "g", move |_, _| {
            c.lock().unwrap().push("g");
            Ok(Some(5))
        })
        .unwrap();

    assert_eq!(build.shout("started", &()).unwrap(), Some(5));
    assert_eq!(*calls.lock().unwrap(), ["f", "g"]);
}

#[test]
fn test_listeners_receive_speaker_and_args() {
    let registry = Registry::new();
    let before = Speaker::<Vec<String>>::with_registry("before", &["file created"], &registry);

    before
        .plug("file created", "obeyer", |speaker, args| {
            assert_eq!(speaker.name(), "before");
            assert_eq!(args, &["foo/bar".to_string()]);
            Ok(None)
        })
        .unwrap();

    before
        .shout("file created", &vec!["foo/bar".to_string()])
        .unwrap();
}

#[test]
fn test_hooks_have_keys() {
    let registry = Registry::new();
    let before =
        Speaker::<(), i32>::with_registry("before", &["file created"], &registry);

    let hook = before
        .plug("file created", "obeyer", |_, _| Ok(None))
        .unwrap();

    assert!(
        hook.key()
            .starts_with("before:file_created[tests.signal_system:obeyer:"),
        "unexpected key: {}",
        hook.key()
    );
    assert_eq!(hook.key(), format!(
        "before:file_created[tests.signal_system:obeyer:{}]",
        hook.line()
    ));
    let display = hook.to_string();
    assert!(display.starts_with("Hook(name=\"obeyer\", line=\""));
    assert!(display.ends_with("file=\"tests/signal_system.rs\")"));
}

#[test]
fn test_unhandled_listener_error_propagates_unchanged_and_halts() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("on", &["file created"], &registry);
    let calls = recorder();

    sp.plug("file created", "thrower", |_, _| {
        Err(io::Error::other("You got served").into())
    })
    .unwrap();
    let c = Arc::clone(&calls);
    sp.plug("file created", "never", move |_, _| {
        c.lock().unwrap().push("never");
        Ok(None)
    })
    .unwrap();

    let err = sp.shout("file created", &()).unwrap_err();
    let io_err = err.downcast_ref::<io::Error>().expect("original error type");
    assert_eq!(io_err.to_string(), "You got served");
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_custom_handler_reply_participates_in_short_circuit() {
    let registry = Registry::new();
    let sp = Speaker::<Vec<String>, i32>::with_registry("on", &["file created"], &registry);
    let calls = recorder();

    sp.exception_handler("rescuer", |speaker, error, args| {
        assert_eq!(speaker.name(), "on");
        assert!(error.downcast_ref::<io::Error>().is_some());
        assert_eq!(args, &["YAY".to_string()]);
        Ok(Some(7))
    })
    .unwrap();

    sp.plug("file created", "thrower", |_, _| {
        Err(io::Error::other("You got served").into())
    })
    .unwrap();
    let c = Arc::clone(&calls);
    sp.plug("file created", "starved", move |_, _| {
        c.lock().unwrap().push("starved");
        Ok(None)
    })
    .unwrap();

    let reply = sp.shout("file created", &vec!["YAY".to_string()]).unwrap();
    assert_eq!(reply, Some(7));
    // the handler's value short-circuits exactly like a listener's
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_custom_handler_empty_reply_continues_dispatch() {
    let registry = Registry::new();
    let sp = Speaker::<(), i32>::with_registry("on", &["go"], &registry);

    sp.exception_handler("swallower", |_, _, _| Ok(None)).unwrap();
    sp.plug("go", "thrower", |_, _| Err("boom".into())).unwrap();
    sp.plug("go", "survivor", |_, _| Ok(Some(3))).unwrap();

    assert_eq!(sp.shout("go", &()).unwrap(), Some(3));
}

#[test]
fn test_failing_handler_aborts_the_shout() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("on", &["go"], &registry);
    let calls = recorder();

    sp.exception_handler("doubler", |_, _, _| Err("handler gave up".into()))
        .unwrap();
    sp.plug("go", "thrower", |_, _| Err("boom".into())).unwrap();
    let c = Arc::clone(&calls);
    sp.plug("go", "never", move |_, _| {
        c.lock().unwrap().push("never");
        Ok(None)
    })
    .unwrap();

    let err = sp.shout("go", &()).unwrap_err();
    assert_eq!(err.to_string(), "handler gave up");
    assert!(calls.lock().unwrap().is_empty());
}

#[test]
fn test_second_exception_handler_always_fails() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("on", &["go"], &registry);

    sp.exception_handler("first", |_, _, _| Ok(None)).unwrap();
    let err = sp
        .exception_handler("second", |_, _, _| Ok(None))
        .unwrap_err();

    match &err {
        ConfigError::HandlerTaken {
            attempted,
            existing,
            ..
        } => {
            assert_eq!(attempted, "second");
            assert_eq!(existing, "first");
        }
        other => panic!("expected HandlerTaken, got {other:?}"),
    }
    assert!(err.to_string().contains("already has first assigned"));
}

#[test]
fn test_unplug_removes_every_matching_registration() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("dup", &["go"], &registry);
    let calls = recorder();

    let c = Arc::clone(&calls);
    let hook = sp
        .plug("go", "counted", move |_, _| {
            c.lock().unwrap().push("counted");
            Ok(None)
        })
        .unwrap();
    let twin = sp.replug(&hook).unwrap(); // adjacent duplicate, shared identity
    sp.replug(&twin).unwrap();

    sp.shout("go", &()).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 3);

    sp.unplug("go", &hook);
    sp.shout("go", &()).unwrap();
    assert_eq!(calls.lock().unwrap().len(), 3, "all three entries removed");
}

#[test]
fn test_unplug_of_unregistered_hook_is_a_noop() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("noop", &["go"], &registry);

    let hook = sp.plug("go", "stays", |_, _| Ok(None)).unwrap();
    sp.unplug("go", &hook);
    // a second unplug finds nothing; so does unplugging on another action
    sp.unplug("go", &hook);
    sp.unplug("missing", &hook);
    assert_eq!(sp.total_hooks(), 0);
}

#[test]
fn test_listener_can_unplug_itself_mid_shout() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("self", &["go"], &registry);
    let calls = recorder();

    let slot: Arc<OnceLock<speakers::Hook<()>>> = Arc::new(OnceLock::new());
    let c = Arc::clone(&calls);
    let s = Arc::clone(&slot);
    let hook = sp
        .plug("go", "one_shot", move |speaker, _| {
            c.lock().unwrap().push("one_shot");
            if let Some(me) = s.get() {
                speaker.unplug("go", me);
            }
            Ok(None)
        })
        .unwrap();
    slot.set(hook).ok();

    // snapshot semantics: the first shout still runs the full list once
    sp.shout("go", &()).unwrap();
    sp.shout("go", &()).unwrap();
    assert_eq!(*calls.lock().unwrap(), ["one_shot"]);
}

#[test]
fn test_release_scopes_to_one_action_or_whole_speaker() {
    let registry = Registry::new();
    let sp = Speaker::<()>::with_registry("rel", &["a", "b"], &registry);
    sp.plug("a", "h1", |_, _| Ok(None)).unwrap();
    sp.plug("a", "h2", |_, _| Ok(None)).unwrap();
    sp.plug("b", "h3", |_, _| Ok(None)).unwrap();

    sp.release(Some("a"));
    assert!(sp.action("a").unwrap().is_empty());
    assert_eq!(sp.action("b").unwrap().len(), 1);

    sp.plug("a", "h4", |_, _| Ok(None)).unwrap();
    sp.release(None);
    assert_eq!(sp.total_hooks(), 0);
}

#[test]
fn test_two_speakers_release_independently() {
    let registry = Registry::new();
    let one = Speaker::<()>::with_registry("one", &["go"], &registry);
    let two = Speaker::<()>::with_registry("two", &["go"], &registry);
    one.plug("go", "h", |_, _| Ok(None)).unwrap();
    two.plug("go", "h", |_, _| Ok(None)).unwrap();

    one.release(None);

    assert_eq!(one.total_hooks(), 0);
    assert_eq!(two.total_hooks(), 1);
}

#[test]
fn test_undeclared_action_shout_is_empty_not_an_error() {
    let registry = Registry::new();
    let sp = Speaker::<(), i32>::with_registry("quiet", &["known"], &registry);
    sp.plug("known", "h", |_, _| Ok(Some(1))).unwrap();

    assert_eq!(sp.shout("unknown", &()).unwrap(), None);
}

#[test]
fn test_global_registry_release_all() {
    // unique names: the global registry is shared across the test binary
    let a = Speaker::<()>::new("global_release_a", &["go"]);
    let b = Speaker::<()>::new("global_release_b", &["go"]);
    a.plug("go", "h", |_, _| Ok(None)).unwrap();
    b.plug("go", "h", |_, _| Ok(None)).unwrap();

    assert!(Registry::global().get("global_release_a").is_some());
    speakers::release_all();

    assert_eq!(a.total_hooks(), 0);
    assert_eq!(b.total_hooks(), 0);
}
