use keybindings::backends::virtual_input::{RecordingHost, VirtualDevice, VirtualKeyboard};
use keybindings::{
    Axis, BindingsConfig, DeviceHandle, DeviceListener, Error, LastConnectedAssigner,
    SinglePlayerAssigner, Value, Vec2, Vec3,
};
use std::sync::Arc;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(100);

const BINDINGS: &str = r#"
[gameplay.jump]
_type = "button"
_device_order = ["gamepad", "keyboard"]
gamepad = "face_a"
keyboard = "space"

[gameplay.steer]
_type = "axis"
_device_order = ["gamepad", "keyboard"]
gamepad = "left_x"
keyboard = "a,d"

[gameplay.move]
_type = "axis2d"
_device_order = ["gamepad", "keyboard"]
gamepad = "left_x:exp=2.0,left_y"
keyboard = "a,d,s,w"

[gameplay.fly]
_type = "axis3d"
_device_order = ["spatial_mouse", "keyboard"]
spatial_mouse = "x,y,z"
keyboard = "a,d,s,w,q,e"

[gameplay.fire]
_type = "trigger"
_device_order = ["keyboard"]
keyboard = "f"

[gameplay.scroll]
_type = "repeater:0.5,0.2"
_device_order = ["keyboard"]
keyboard = "down"

[menu.confirm]
_type = "button"
_device_order = ["gamepad"]
gamepad = "left_trigger:button>=0.5"
"#;

fn setup() -> (DeviceListener, Arc<VirtualKeyboard>, Arc<RecordingHost>) {
    let config = BindingsConfig::from_toml_str(BINDINGS).unwrap();
    let keyboard = Arc::new(VirtualKeyboard::new());
    let host = RecordingHost::new();
    let assigner = SinglePlayerAssigner::new(host.clone(), []);
    let listener = DeviceListener::new(&config, assigner, keyboard.clone()).unwrap();
    (listener, keyboard, host)
}

fn gamepad(id: &str) -> Arc<VirtualDevice> {
    let pad = VirtualDevice::new(id, "Test Gamepad", "gamepad");
    pad.set_axis(Axis::LeftX, 0.0);
    pad.set_axis(Axis::LeftY, 0.0);
    pad.set_axis(Axis::LeftTrigger, 0.0);
    pad.release_button("face_a");
    Arc::new(pad)
}

fn read(listener: &mut DeviceListener, context: &str, input: &str) -> Option<Value> {
    listener.read_context(context, None, FRAME).unwrap()[input]
}

#[test]
fn falls_back_to_keyboard_and_back_to_gamepad() {
    let (mut listener, keyboard, _) = setup();
    keyboard.press("space");
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(true)));

    let pad = gamepad("pad-1");
    let handle: DeviceHandle = pad.clone();
    listener.connect(handle.clone());
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(false)));
    pad.press_button("face_a");
    keyboard.release("space");
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(true)));

    listener.disconnect(&handle);
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(false)));

    listener.connect(handle);
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(true)));
}

#[test]
fn absent_when_no_candidate_is_available() {
    let (mut listener, _, _) = setup();
    assert_eq!(read(&mut listener, "menu", "confirm"), None);

    let pad = gamepad("pad-1");
    pad.set_axis(Axis::LeftTrigger, 0.9);
    listener.connect(pad);
    assert_eq!(read(&mut listener, "menu", "confirm"), Some(Value::Button(true)));
}

#[test]
fn key_pairs_form_signed_axes() {
    let (mut listener, keyboard, _) = setup();
    let cases = [
        ((true, false), -1.0),
        ((false, true), 1.0),
        ((true, true), 0.0),
        ((false, false), 0.0),
    ];
    for ((a, d), expected) in cases {
        keyboard.set("a", a);
        keyboard.set("d", d);
        assert_eq!(
            read(&mut listener, "gameplay", "steer"),
            Some(Value::Axis(expected)),
            "a={a} d={d}"
        );
    }
}

#[test]
fn key_quads_and_sextets_form_vectors() {
    let (mut listener, keyboard, _) = setup();
    keyboard.press("d");
    keyboard.press("s");
    assert_eq!(
        read(&mut listener, "gameplay", "move"),
        Some(Value::Axis2d(Vec2::new(1.0, -1.0)))
    );

    keyboard.press("e");
    assert_eq!(
        read(&mut listener, "gameplay", "fly"),
        Some(Value::Axis3d(Vec3::new(1.0, -1.0, 1.0)))
    );
}

#[test]
fn analog_sticks_pass_through_filters() {
    let (mut listener, _, _) = setup();
    let pad = gamepad("pad-1");
    pad.set_axis(Axis::LeftX, -0.5);
    pad.set_axis(Axis::LeftY, 0.75);
    listener.connect(pad);
    assert_eq!(read(&mut listener, "gameplay", "steer"), Some(Value::Axis(-0.5)));
    assert_eq!(
        read(&mut listener, "gameplay", "move"),
        Some(Value::Axis2d(Vec2::new(-0.25, 0.75)))
    );
}

#[test]
fn trigger_fires_once_per_press() {
    let (mut listener, keyboard, _) = setup();
    let mut fired = Vec::new();
    for held in [false, true, true, true, false, true] {
        keyboard.set("f", held);
        fired.push(read(&mut listener, "gameplay", "fire") == Some(Value::Button(true)));
    }
    assert_eq!(fired, [false, true, false, false, false, true]);
}

#[test]
fn repeater_refires_while_held() {
    let (mut listener, keyboard, _) = setup();
    keyboard.press("down");
    let mut fires = 0;
    for _ in 0..=10 {
        if read(&mut listener, "gameplay", "scroll") == Some(Value::Button(true)) {
            fires += 1;
        }
    }
    // Initial press plus re-fires at 0.2s and 0.7s.
    assert_eq!(fires, 3);

    keyboard.release("down");
    assert_eq!(read(&mut listener, "gameplay", "scroll"), Some(Value::Button(false)));
}

#[test]
fn single_player_second_gamepad_replaces_first() {
    let (mut listener, _, host) = setup();
    let first = gamepad("pad-1");
    let second = gamepad("pad-2");
    second.press_button("face_a");

    listener.connect(first);
    listener.connect(second);
    let devices = listener.available_devices(None);
    assert_eq!(devices.len(), 1);
    assert_eq!(devices["gamepad"].id(), "pad-2");
    assert_eq!(host.attached(), ["pad-2"]);
    assert_eq!(read(&mut listener, "gameplay", "jump"), Some(Value::Button(true)));
}

#[test]
fn last_connected_ignores_newcomers_until_release() {
    let config = BindingsConfig::from_toml_str(BINDINGS).unwrap();
    let keyboard = Arc::new(VirtualKeyboard::new());
    let host = RecordingHost::new();
    let mut listener =
        DeviceListener::new(&config, LastConnectedAssigner::new(host.clone()), keyboard).unwrap();

    let a: DeviceHandle = gamepad("pad-a");
    let b: DeviceHandle = gamepad("pad-b");
    listener.connect(a.clone());
    listener.connect(b.clone());
    assert_eq!(listener.available_devices(None)["gamepad"].id(), "pad-a");

    listener.disconnect(&a);
    assert!(listener.available_devices(None).is_empty());
    listener.connect(b);
    assert_eq!(listener.available_devices(None)["gamepad"].id(), "pad-b");
    assert_eq!(host.attached(), ["pad-b"]);
}

#[test]
fn missing_control_on_device_is_an_error() {
    let (mut listener, _, _) = setup();
    let bare: DeviceHandle = Arc::new(VirtualDevice::new("bare", "No Controls", "gamepad"));
    listener.connect(bare);
    let err = listener
        .read_context("gameplay", None, FRAME)
        .unwrap_err();
    assert!(matches!(err, Error::DeviceLookup { .. }));
}

#[test]
fn get_config_is_idempotent() {
    let (listener, _, _) = setup();
    let first = listener.get_config();
    assert_eq!(first, BindingsConfig::from_toml_str(BINDINGS).unwrap());

    let text = first.to_toml_string().unwrap();
    let reparsed = BindingsConfig::from_toml_str(&text).unwrap();
    let rebuilt = DeviceListener::new(
        &reparsed,
        LastConnectedAssigner::new(RecordingHost::new()),
        Arc::new(VirtualKeyboard::new()),
    )
    .unwrap();
    assert_eq!(rebuilt.get_config(), first);

    let contexts: Vec<&str> = rebuilt.context_names().collect();
    assert_eq!(contexts, ["gameplay", "menu"]);
    let inputs: Vec<&str> = rebuilt
        .context("gameplay")
        .unwrap()
        .inputs()
        .map(|i| i.name())
        .collect();
    assert_eq!(inputs, ["jump", "steer", "move", "fly", "fire", "scroll"]);
}

#[test]
fn invalid_configs_fail_at_load() {
    let keyboard = Arc::new(VirtualKeyboard::new());
    let cases = [
        // Two floats cannot make a button.
        "[c.i]\n_type = \"button\"\n_device_order = [\"gamepad\"]\ngamepad = \"left_x,left_y\"\n",
        // Device order entry without a mapping.
        "[c.i]\n_type = \"axis\"\n_device_order = [\"gamepad\"]\nkeyboard = \"a,d\"\n",
        // Unknown filter.
        "[c.i]\n_type = \"axis\"\n_device_order = [\"gamepad\"]\ngamepad = \"left_x:smooth\"\n",
        // Unknown kind.
        "[c.i]\n_type = \"slider\"\n_device_order = [\"keyboard\"]\nkeyboard = \"a\"\n",
        // Nothing to pick from.
        "[c.i]\n_type = \"button\"\n_device_order = []\nkeyboard = \"space\"\n",
    ];
    for text in cases {
        let config = BindingsConfig::from_toml_str(text).unwrap();
        let result = DeviceListener::new(
            &config,
            LastConnectedAssigner::new(RecordingHost::new()),
            keyboard.clone(),
        );
        assert!(result.is_err(), "{text}");
    }

    let no_order = "[c.jump]\n_type = \"button\"\nkeyboard = \"space\"\n";
    assert!(matches!(
        BindingsConfig::from_toml_str(no_order),
        Err(Error::TomlDe(_))
    ));
}

#[test]
fn underscore_keys_are_not_candidates() {
    let text = r#"
[c.jump]
_type = "button"
_device_order = ["keyboard"]
_comment = "space bar only"
keyboard = "space"
"#;
    let config = BindingsConfig::from_toml_str(text).unwrap();
    let keyboard = Arc::new(VirtualKeyboard::new());
    let mut listener = DeviceListener::new(
        &config,
        LastConnectedAssigner::new(RecordingHost::new()),
        keyboard.clone(),
    )
    .unwrap();

    keyboard.press("space");
    assert_eq!(read(&mut listener, "c", "jump"), Some(Value::Button(true)));
    let jump = listener.context("c").unwrap().get("jump").unwrap();
    assert!(jump.mapping("_comment").is_none());
    assert_eq!(listener.get_config(), config);
}
