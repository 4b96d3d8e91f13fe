use keybindings::backends::virtual_input::{RecordingHost, VirtualDevice, VirtualKeyboard};
use keybindings::{Axis, BindingsConfig, DeviceHandle, DeviceListener, SinglePlayerAssigner};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const BINDINGS: &str = r#"
[demo_context.simple_button]
_type = "button"
_device_order = ["gamepad", "flight_stick", "keyboard"]
gamepad = "face_a"
flight_stick = "trigger"
keyboard = "q"

[demo_context.axis_to_button]
_type = "button"
_device_order = ["gamepad"]
gamepad = "left_x:button>=0.75"

[demo_context.trigger]
_type = "trigger"
_device_order = ["keyboard"]
keyboard = "q"

[demo_context.repeater]
_type = "repeater:0.5,0.2"
_device_order = ["keyboard"]
keyboard = "q"

[demo_context.demo_axis_full]
_type = "axis"
_device_order = ["gamepad", "flight_stick", "keyboard"]
gamepad = "left_x"
flight_stick = "roll"
keyboard = "a,d"

[demo_context.demo_axis_2d]
_type = "axis2d"
_device_order = ["gamepad", "keyboard"]
gamepad = "left_x:exp=2.0,left_y:exp=0.5"
keyboard = "a,d,s,w"

[demo_context.demo_axis_3d]
_type = "axis3d"
_device_order = ["spatial_mouse", "keyboard"]
spatial_mouse = "x,y,z"
keyboard = "a,d,s,w,q,e"
"#;

fn main() -> keybindings::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("keybindings=debug"))
        .init();

    let config = BindingsConfig::from_toml_str(BINDINGS)?;
    let keyboard = Arc::new(VirtualKeyboard::new());
    let host = RecordingHost::new();
    let assigner = SinglePlayerAssigner::new(host, []);
    let mut listener = DeviceListener::new(&config, assigner, keyboard.clone())?;

    println!("{}", listener.get_config().to_json_string()?);

    let frame = Duration::from_millis(100);

    // Keyboard only: hold q and d.
    keyboard.press("q");
    keyboard.press("d");
    for tick in 0..8 {
        let state = listener.read_context("demo_context", None, frame)?;
        print_state(tick, &state);
    }

    // Plug in a gamepad; it takes priority for every input that lists it first.
    let pad = VirtualDevice::new("virtual:demo", "Demo Virtual Gamepad", "gamepad");
    pad.set_axis(Axis::LeftX, 0.8);
    pad.set_axis(Axis::LeftY, -0.25);
    pad.press_button("face_a");
    let pad: DeviceHandle = Arc::new(pad);
    listener.connect(pad.clone());

    let state = listener.read_context("demo_context", None, frame)?;
    print_state(8, &state);

    listener.disconnect(&pad);
    let state = listener.read_context("demo_context", None, frame)?;
    print_state(9, &state);
    println!("{}", serde_json::to_string(&state)?);

    Ok(())
}

fn print_state(tick: u32, state: &keybindings::ContextState) {
    let parts: Vec<String> = state
        .iter()
        .map(|(name, value)| match value {
            Some(v) => format!("{name}={v}"),
            None => format!("{name}=-"),
        })
        .collect();
    println!("[{tick:02}] {}", parts.join(" "));
}
